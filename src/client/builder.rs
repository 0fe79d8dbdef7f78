use std::sync::Arc;

use super::ConfigApi;
use super::ConfigClient;
use crate::subscription::SubscriptionEngine;
use crate::transport::HttpTransport;
use crate::transport::ReqwestTransport;
use crate::ClientConfig;
use crate::ConfigError;
use crate::Result;
use crate::RetryPolicy;

pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    /// Create a new builder with default config
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Address-server host used for discovery (required)
    pub fn endpoint(
        mut self,
        endpoint: impl Into<String>,
    ) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Default namespace for all operations (required)
    pub fn namespace(
        mut self,
        namespace: impl Into<String>,
    ) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Access key for request signing (required)
    pub fn access_key(
        mut self,
        access_key: impl Into<String>,
    ) -> Self {
        self.config.access_key = access_key.into();
        self
    }

    /// Secret key for request signing (required)
    pub fn secret_key(
        mut self,
        secret_key: impl Into<String>,
    ) -> Self {
        self.config.secret_key = secret_key.into();
        self
    }

    /// Pin all operations to a deployment unit (default: the unit the
    /// address server reports for this machine)
    pub fn unit(
        mut self,
        unit: impl Into<String>,
    ) -> Self {
        self.config.unit = Some(unit.into());
        self
    }

    /// Server-side hold window for long-poll probes (default: 30s)
    pub fn longpoll_timeout_ms(
        mut self,
        timeout_ms: u64,
    ) -> Self {
        self.config.longpoll_timeout_ms = timeout_ms;
        self
    }

    /// Retry settings for every network call (default: 3 attempts,
    /// 10s per attempt, no backoff)
    pub fn retry_policy(
        mut self,
        policy: RetryPolicy,
    ) -> Self {
        self.config.retry = policy;
        self
    }

    /// Completely replaces the default configuration
    ///
    /// Discards all previous settings configured through the
    /// individual methods.
    pub fn set_config(
        mut self,
        config: ClientConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Swap the HTTP stack; mainly for tests against a local server.
    pub fn transport(
        mut self,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client with current configuration
    ///
    /// # Errors
    /// [`ConfigError::MissingField`] when a required credential or the
    /// endpoint is absent.
    pub fn build(self) -> Result<ConfigClient> {
        let required = [
            ("endpoint", &self.config.endpoint),
            ("namespace", &self.config.namespace),
            ("accessKey", &self.config.access_key),
            ("secretKey", &self.config.secret_key),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::MissingField(field).into());
            }
        }

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        let api = Arc::new(ConfigApi::new(self.config, transport));
        let engine = Arc::new(SubscriptionEngine::new(api.clone()));
        Ok(ConfigClient { api, engine })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
