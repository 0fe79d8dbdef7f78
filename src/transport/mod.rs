//! HTTP transport seam and the retry envelope.
//!
//! [`HttpTransport`] is the single boundary to the network: it sends a
//! fully-built [`ApiRequest`] and returns the status plus buffered
//! body. [`RetryingExecutor`] is the sole place retry, backoff and
//! per-attempt timeout semantics live.

mod executor;
mod http;
mod request;

pub use http::*;
pub use request::*;

pub(crate) use executor::*;

#[cfg(test)]
mod http_test;
