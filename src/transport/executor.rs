use std::sync::Arc;

use tokio::time::sleep;
use tokio::time::timeout;
use tracing::warn;

use super::ApiRequest;
use super::ApiResponse;
use super::HttpTransport;
use crate::Error;
use crate::NetworkError;
use crate::Result;
use crate::RetryPolicy;

/// Retry/backoff/timeout envelope around a single logical call.
///
/// The request is rebuilt, not replayed, on every attempt: the
/// timestamp and signature headers are time-dependent and the server
/// rejects stale ones.
pub(crate) struct RetryingExecutor {
    transport: Arc<dyn HttpTransport>,
}

impl RetryingExecutor {
    pub(crate) fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Build and send a request, retrying on transport failures,
    /// per-attempt timeouts and 5xx statuses until the policy's
    /// attempt budget runs out.
    ///
    /// # Errors
    /// - [`NetworkError::Client`] on a 4xx status, immediately
    /// - [`NetworkError::RetryExhausted`] once the budget is consumed,
    ///   carrying the last attempted request and the final attempt's
    ///   failure ([`NetworkError::Server`], [`NetworkError::Timeout`]
    ///   or a transport error) as its source
    /// - any non-retryable error from `build` or the transport, as is
    pub(crate) async fn execute<F>(
        &self,
        policy: &RetryPolicy,
        build: F,
    ) -> Result<ApiResponse>
    where
        F: Fn() -> Result<ApiRequest>,
    {
        let attempts = policy.max_attempts.max(1);
        let mut last_request = None;
        let mut last_error = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = policy.backoff.delay();
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }

            let request = build()?;
            last_request = Some(request.clone());

            match timeout(policy.timeout(), self.transport.send(request)).await {
                Ok(Ok(response)) => {
                    if response.is_5xx() {
                        warn!(
                            "attempt {}/{} got server status {}",
                            attempt + 1,
                            attempts,
                            response.status
                        );
                        last_error = Some(NetworkError::Server {
                            status: response.status,
                        });
                        continue;
                    }
                    if response.is_4xx() {
                        return Err(NetworkError::Client {
                            status: response.status,
                            body: response.text(),
                        }
                        .into());
                    }
                    return Ok(response);
                }
                Ok(Err(Error::Network(e))) if e.retryable() => {
                    warn!("attempt {}/{} failed: {}", attempt + 1, attempts, e);
                    last_error = Some(e);
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    warn!(
                        "attempt {}/{} timed out after {:?}",
                        attempt + 1,
                        attempts,
                        policy.timeout()
                    );
                    last_error = Some(NetworkError::Timeout(policy.timeout()));
                }
            }
        }

        match (last_request, last_error) {
            (Some(request), Some(error)) => Err(NetworkError::RetryExhausted {
                last_request: Box::new(request),
                last_error: Box::new(error),
            }
            .into()),
            // attempts >= 1, so build() failed on the first pass and
            // already returned above
            _ => Err(NetworkError::Transport("no attempt was made".to_string()).into()),
        }
    }
}
