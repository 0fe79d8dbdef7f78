#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use diamond_client::decode_form;
use diamond_client::fingerprint;
use diamond_client::ApiRequest;
use diamond_client::ApiResponse;
use diamond_client::BackoffPolicy;
use diamond_client::ConfigClient;
use diamond_client::ConfigListener;
use diamond_client::FormVariant;
use diamond_client::HttpTransport;
use diamond_client::ReqwestTransport;
use diamond_client::RetryPolicy;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio::time::timeout;
use warp::http::Method;
use warp::http::Response;
use warp::path::FullPath;
use warp::Filter;

type Store = Arc<Mutex<HashMap<(String, String), String>>>;

static LOGGER: once_cell::sync::OnceCell<()> = once_cell::sync::OnceCell::new();

/// This will ensure `env_logger` is only initialized once.
pub fn enable_logger() {
    LOGGER.get_or_init(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// In-process diamond service: discovery plus the config endpoints,
/// with real long-poll holds (shortened to keep tests fast).
pub struct MockDiamond {
    pub addr: SocketAddr,
    store: Store,
}

impl MockDiamond {
    pub async fn start() -> Self {
        let store: Store = Arc::new(Mutex::new(HashMap::new()));
        let handler_store = store.clone();

        let routes = warp::any()
            .and(warp::method())
            .and(warp::path::full())
            .and(
                warp::query::raw()
                    .or_else(|_| async { Ok::<(String,), Infallible>((String::new(),)) }),
            )
            .and(warp::body::bytes())
            .and_then(move |method, path, query, body| {
                handle(handler_store.clone(), method, path, query, body)
            });

        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        Self { addr, store }
    }

    /// Client wired to this server for every request, discovery
    /// included.
    pub fn client(&self) -> ConfigClient {
        ConfigClient::builder()
            .endpoint("acm.aliyun.test")
            .namespace("it-ns")
            .access_key("ak")
            .secret_key("sk")
            .retry_policy(RetryPolicy {
                max_attempts: 2,
                timeout_ms: 5_000,
                backoff: BackoffPolicy::No,
            })
            .transport(Arc::new(RedirectTransport {
                addr: self.addr,
                inner: ReqwestTransport::new(),
            }))
            .build()
            .expect("client should build")
    }

    pub fn seed(
        &self,
        data_id: &str,
        group: &str,
        content: &str,
    ) {
        self.store
            .lock()
            .unwrap()
            .insert((data_id.to_string(), group.to_string()), content.to_string());
    }
}

/// Rewrites every outgoing request onto the mock server's address so
/// the hosts the discovery route hands out never have to be real.
struct RedirectTransport {
    addr: SocketAddr,
    inner: ReqwestTransport,
}

#[async_trait]
impl HttpTransport for RedirectTransport {
    async fn send(
        &self,
        mut request: ApiRequest,
    ) -> diamond_client::Result<ApiResponse> {
        request.protocol = "http";
        request.host = self.addr.ip().to_string();
        request.port = Some(self.addr.port());
        self.inner.send(request).await
    }
}

async fn handle(
    store: Store,
    method: Method,
    path: FullPath,
    query: String,
    body: Bytes,
) -> Result<Response<Vec<u8>>, Infallible> {
    let query = decode_form(&query, FormVariant::Form);
    let query_get = |name: &str| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    let response = match (method.as_str(), path.as_str()) {
        ("GET", "/diamond-server/diamond") => text("127.0.0.1"),
        ("GET", "/diamond-server/config.co") => {
            let key = (
                query_get("dataId").unwrap_or_default(),
                query_get("group").unwrap_or_default(),
            );
            match store.lock().unwrap().get(&key) {
                Some(content) => text(content),
                None => status(404, "config data not exist"),
            }
        }
        ("POST", "/diamond-server/config.co") => {
            let body = String::from_utf8_lossy(&body).into_owned();
            let fields = decode_form(&body, FormVariant::Form);
            match fields.iter().find(|(k, _)| k == "Probe-Modify-Request") {
                Some((_, payload)) => probe(store, payload).await,
                None => status(400, "missing probe payload"),
            }
        }
        ("POST", "/diamond-server/basestone.do")
            if query_get("method").as_deref() == Some("syncUpdateAll") =>
        {
            let body = String::from_utf8_lossy(&body).into_owned();
            let fields = decode_form(&body, FormVariant::Encode);
            let field = |name: &str| {
                fields
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            };
            store
                .lock()
                .unwrap()
                .insert((field("dataId"), field("group")), field("content"));
            text("OK")
        }
        ("POST", "/diamond-server/datum.do") => {
            let body = String::from_utf8_lossy(&body).into_owned();
            let fields = decode_form(&body, FormVariant::Encode);
            let field = |name: &str| {
                fields
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            };
            store
                .lock()
                .unwrap()
                .remove(&(field("dataId"), field("group")));
            text("OK")
        }
        _ => status(404, "unknown route"),
    };
    Ok(response)
}

/// Hold the probe until the entry's fingerprint diverges from the
/// probed one, up to a short window, then report no change.
async fn probe(
    store: Store,
    payload: &str,
) -> Response<Vec<u8>> {
    let words: Vec<&str> = payload.split('\u{2}').collect();
    let (data_id, group) = (words[0], words[1]);
    let probed_md5 = words[2].trim_end_matches('\u{1}');
    let key = (data_id.to_string(), group.to_string());

    for _ in 0..20 {
        let current = store
            .lock()
            .unwrap()
            .get(&key)
            .map(|content| fingerprint(content))
            .unwrap_or_default();
        if current != probed_md5 {
            return text(&format!("{data_id}\u{2}{group}\u{1}"));
        }
        sleep(Duration::from_millis(25)).await;
    }
    text("")
}

fn text(body: &str) -> Response<Vec<u8>> {
    Response::builder()
        .status(200)
        .body(body.as_bytes().to_vec())
        .unwrap()
}

fn status(
    code: u16,
    body: &str,
) -> Response<Vec<u8>> {
    Response::builder()
        .status(code)
        .body(body.as_bytes().to_vec())
        .unwrap()
}

pub fn channel_listener() -> (ConfigListener, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let listener: ConfigListener = Arc::new(move |content: &str| {
        tx.send(content.to_string()).ok();
    });
    (listener, rx)
}

pub async fn recv(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("listener channel closed")
}
