//! Diamond client error hierarchy
//!
//! Defines error types for the configuration service client,
//! categorized by where they arise: parameter validation, the network
//! envelope, and response decoding.

use std::time::Duration;

use crate::transport::ApiRequest;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid dataId/group/tenant or incomplete client configuration;
    /// raised before any network call
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transport, server and retry failures
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Malformed response bodies; never retried
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required client configuration field is missing
    #[error("config.{0} must be passed in")]
    MissingField(&'static str),

    /// Parameter contains characters outside the allowed set
    #[error("[{field}] only allow digital, letter and symbols in [ \"_\", \"-\", \".\", \":\" ], but got {value}")]
    InvalidParameter { field: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Connection-level failure; retryable
    #[error("transport error: {0}")]
    Transport(String),

    /// Per-attempt timeout elapsed; retryable
    #[error("request timeout after {0:?}")]
    Timeout(Duration),

    /// Server returned a 5xx status; retryable
    #[error("server error: status {status}")]
    Server { status: u16 },

    /// Server returned a 4xx status; surfaced immediately
    #[error("client error: status {status}: {body}")]
    Client { status: u16, body: String },

    /// Retry budget consumed; carries the last attempted request and
    /// the failure that ended the final attempt
    #[error("unable to retry: {} {}", last_request.method, last_request.path)]
    RetryExhausted {
        last_request: Box<ApiRequest>,
        #[source]
        last_error: Box<NetworkError>,
    },

    /// Host pool has no entries to pick from
    #[error("server list is empty!")]
    EmptyServerList,

    /// Host-list refresh failed; logged by the resolver, prior list retained
    #[error("refresh server list error: {0}")]
    Discovery(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Response body was expected to be JSON but did not parse
    #[error("return value must be json: {0}")]
    InvalidJson(String),
}

impl NetworkError {
    /// Whether the retry envelope may re-attempt after this error.
    pub(crate) fn retryable(&self) -> bool {
        matches!(
            self,
            NetworkError::Transport(_) | NetworkError::Timeout(_) | NetworkError::Server { .. }
        )
    }
}

// ============== Conversion Implementations ============== //
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        NetworkError::Transport(err.to_string()).into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::InvalidJson(err.to_string()).into()
    }
}
