use std::error::Error as StdError;

use super::*;

// Config operations go out over the request's default protocol, so the
// compiled-in HTTP stack must be able to speak https. Port 1 on
// loopback is closed: a TLS-capable stack fails at the connection
// attempt, never at URL scheme validation.
#[tokio::test]
async fn test_default_https_protocol_is_usable() {
    let request = ApiRequest::new(HttpMethod::Get, "127.0.0.1", "/diamond-server/config.co")
        .with_port(1);
    assert_eq!(request.protocol, "https");

    let err = reqwest::Client::new()
        .get(request.url())
        .send()
        .await
        .unwrap_err();

    let mut messages = Vec::new();
    let mut source: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(e) = source {
        messages.push(e.to_string());
        source = e.source();
    }
    assert!(
        messages.iter().all(|m| !m.contains("scheme is not http")),
        "{messages:?}"
    );
}
