use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
#[cfg(test)]
use mockall::predicate::*;
use tracing::debug;

use super::ApiRequest;
use super::ApiResponse;
use super::HttpMethod;
use crate::Result;

/// Boundary to the raw HTTP stack.
///
/// Implementations perform exactly one round trip with no retry logic;
/// the envelope around it lives in
/// [`RetryingExecutor`](super::RetryingExecutor).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse>;
}

/// Production transport backed by a pooled reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse> {
        let url = request.url();
        debug!("send {} {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        // The body arrives incrementally; accumulate the whole stream
        // before decoding so multi-byte GBK sequences stay intact.
        let mut body = Vec::new();
        let mut response = response;
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
        }

        Ok(ApiResponse { status, body })
    }
}
