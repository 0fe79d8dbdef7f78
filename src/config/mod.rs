//! Client configuration.
//!
//! All state is captured in an immutable [`ClientConfig`] passed to
//! each component at construction. Per-call overrides (tenant, unit,
//! retry settings) travel as explicit parameters, never by mutating
//! the client.

mod retry;
pub use retry::*;


use crate::constants::DEFAULT_LONGPOLL_TIMEOUT_MS;

/// Connection and credential settings for one diamond client.
///
/// Built through [`ClientBuilder`](crate::ClientBuilder), which
/// validates that the required fields are present.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Address-server host used for unit discovery
    pub endpoint: String,

    /// Default namespace (tenant) for all operations
    pub namespace: String,

    /// Access key carried in the `spas-accesskey` header
    pub access_key: String,

    /// Secret key used for HMAC request signing
    pub secret_key: String,

    /// Deployment unit to resolve hosts for; `None` means the current
    /// unit as reported by the address server
    pub unit: Option<String>,

    /// Server-side hold window for long-poll probes, in milliseconds
    /// Default: 30000
    pub longpoll_timeout_ms: u64,

    /// Retry settings applied to every network call unless overridden
    /// per call
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            namespace: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            unit: None,
            longpoll_timeout_ms: DEFAULT_LONGPOLL_TIMEOUT_MS,
            retry: RetryPolicy::default(),
        }
    }
}
