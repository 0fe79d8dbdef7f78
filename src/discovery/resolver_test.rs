use std::collections::HashSet;
use std::sync::Arc;

use super::*;
use crate::transport::ApiResponse;
use crate::transport::MockHttpTransport;
use crate::transport::RetryingExecutor;
use crate::Error;
use crate::NetworkError;
use crate::RetryPolicy;

fn resolver_with(mock: MockHttpTransport) -> EndpointResolver {
    let executor = Arc::new(RetryingExecutor::new(Arc::new(mock)));
    EndpointResolver::new("acm.aliyun.test", executor, RetryPolicy::default())
}

#[tokio::test]
async fn test_refresh_replaces_host_pool() {
    let mut mock = MockHttpTransport::new();
    mock.expect_send().times(1).returning(|request| {
        assert_eq!(request.path, "/diamond-server/diamond");
        assert_eq!(request.port, Some(8080));
        Ok(ApiResponse {
            status: 200,
            body: b" 10.0.0.1 \n10.0.0.2\n\n".to_vec(),
        })
    });

    let resolver = resolver_with(mock);
    resolver.refresh(None).await;
    assert_eq!(*resolver.snapshot(), vec!["10.0.0.1", "10.0.0.2"]);
}

#[tokio::test]
async fn test_refresh_with_unit_uses_unit_path() {
    let mut mock = MockHttpTransport::new();
    mock.expect_send().times(1).returning(|request| {
        assert_eq!(request.path, "/diamond-server/diamond-unit-center");
        assert_eq!(request.query, vec![("nofix".to_string(), "1".to_string())]);
        Ok(ApiResponse {
            status: 200,
            body: b"10.1.0.1".to_vec(),
        })
    });

    let resolver = resolver_with(mock);
    resolver.refresh(Some("center")).await;
    assert_eq!(*resolver.snapshot(), vec!["10.1.0.1"]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_pool() {
    let mut mock = MockHttpTransport::new();
    mock.expect_send()
        .returning(|_| Err(NetworkError::Transport("refused".to_string()).into()));

    let resolver = resolver_with(mock);
    resolver.set_hosts(vec!["10.0.0.9".to_string()]);
    resolver.refresh(None).await;
    // Stale-but-available beats empty.
    assert_eq!(*resolver.snapshot(), vec!["10.0.0.9"]);
}

#[tokio::test]
async fn test_pick_host_on_empty_pool_fails() {
    let resolver = resolver_with(MockHttpTransport::new());
    let err = resolver.pick_host().unwrap_err();
    assert!(matches!(err, Error::Network(NetworkError::EmptyServerList)));
}

#[tokio::test]
async fn test_pick_host_covers_all_hosts() {
    let resolver = resolver_with(MockHttpTransport::new());
    resolver.set_hosts(vec![
        "10.0.0.1".to_string(),
        "10.0.0.2".to_string(),
        "10.0.0.3".to_string(),
    ]);

    let mut seen = HashSet::new();
    for _ in 0..100 {
        seen.insert(resolver.pick_host().unwrap());
    }
    assert_eq!(seen.len(), 3);
}

#[tokio::test]
async fn test_current_unit_trims_response() {
    let mut mock = MockHttpTransport::new();
    mock.expect_send().times(1).returning(|request| {
        assert_eq!(request.path, "/env");
        Ok(ApiResponse {
            status: 200,
            body: b"center\n".to_vec(),
        })
    });

    let resolver = resolver_with(mock);
    assert_eq!(resolver.current_unit().await.unwrap(), "center");
}

#[tokio::test]
async fn test_all_units_splits_lines() {
    let mut mock = MockHttpTransport::new();
    mock.expect_send().times(1).returning(|request| {
        assert_eq!(request.path, "/diamond-server/unit-list");
        Ok(ApiResponse {
            status: 200,
            body: b"center\nunit-a\nunit-b\n".to_vec(),
        })
    });

    let resolver = resolver_with(mock);
    let units = resolver.all_units().await.unwrap();
    assert_eq!(units, vec!["center", "unit-a", "unit-b"]);
}
