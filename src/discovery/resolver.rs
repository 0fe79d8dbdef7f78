use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tracing::debug;
use tracing::error;

use crate::codec;
use crate::constants::DEFAULT_UNIT_SERVER_PATH;
use crate::constants::DISCOVERY_PORT;
use crate::constants::DISCOVERY_TIMEOUT_MS;
use crate::constants::ENV_PATH;
use crate::constants::UNIT_LIST_PATH;
use crate::transport::ApiRequest;
use crate::transport::HttpMethod;
use crate::transport::RetryingExecutor;
use crate::NetworkError;
use crate::Result;
use crate::RetryPolicy;

/// Maintains the backend host list for the client's unit.
///
/// `refresh` replaces the pool wholesale; `pick_host` reads a snapshot
/// and returns a uniformly-random entry. A failed refresh keeps the
/// previous pool: stale-but-available hosts beat no hosts.
pub(crate) struct EndpointResolver {
    endpoint: String,
    executor: Arc<RetryingExecutor>,
    policy: RetryPolicy,
    hosts: ArcSwap<Vec<String>>,
}

impl EndpointResolver {
    pub(crate) fn new(
        endpoint: impl Into<String>,
        executor: Arc<RetryingExecutor>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            executor,
            policy: policy.with_timeout_ms(DISCOVERY_TIMEOUT_MS),
            hosts: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Re-fetch the host list for `unit` (or the default unit) and
    /// atomically replace the pool. Failures are logged and leave the
    /// previous pool untouched.
    pub(crate) async fn refresh(
        &self,
        unit: Option<&str>,
    ) {
        match self.fetch_host_list(unit).await {
            Ok(hosts) => {
                debug!("server list refreshed: {} hosts", hosts.len());
                self.hosts.store(Arc::new(hosts));
            }
            Err(e) => {
                error!("refresh server list error: {e}");
            }
        }
    }

    async fn fetch_host_list(
        &self,
        unit: Option<&str>,
    ) -> Result<Vec<String>> {
        let path = match unit {
            Some(unit) => format!("/diamond-server/diamond-unit-{unit}"),
            None => DEFAULT_UNIT_SERVER_PATH.to_string(),
        };
        let endpoint = self.endpoint.clone();
        let with_nofix = unit.is_some();
        let response = self
            .executor
            .execute(&self.policy, || {
                let mut request = ApiRequest::new(HttpMethod::Get, &endpoint, &path)
                    .with_protocol("http")
                    .with_port(DISCOVERY_PORT);
                if with_nofix {
                    request = request.query("nofix", "1");
                }
                Ok(request)
            })
            .await
            .map_err(|e| NetworkError::Discovery(e.to_string()))?;

        Ok(codec::to_array(&response.text()))
    }

    /// Uniformly-random host from the current pool.
    ///
    /// # Errors
    /// [`NetworkError::EmptyServerList`] when no refresh has succeeded
    /// yet.
    pub(crate) fn pick_host(&self) -> Result<String> {
        let hosts = self.hosts.load();
        if hosts.is_empty() {
            return Err(NetworkError::EmptyServerList.into());
        }
        let mut rng = StdRng::from_entropy();
        let i = rng.gen_range(0..hosts.len());
        Ok(hosts[i].clone())
    }

    /// Unit the calling machine is deployed in, as reported by the
    /// address server.
    pub(crate) async fn current_unit(&self) -> Result<String> {
        let endpoint = self.endpoint.clone();
        let response = self
            .executor
            .execute(&self.policy, || {
                Ok(ApiRequest::new(HttpMethod::Get, &endpoint, ENV_PATH)
                    .with_protocol("http")
                    .with_port(DISCOVERY_PORT))
            })
            .await?;
        Ok(response.text().trim().to_string())
    }

    /// All known deployment units.
    pub(crate) async fn all_units(&self) -> Result<Vec<String>> {
        let endpoint = self.endpoint.clone();
        let response = self
            .executor
            .execute(&self.policy, || {
                Ok(ApiRequest::new(HttpMethod::Get, &endpoint, UNIT_LIST_PATH)
                    .with_protocol("http")
                    .with_port(DISCOVERY_PORT)
                    .query("nofix", "1"))
            })
            .await?;
        Ok(codec::to_array(&response.text()))
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Arc<Vec<String>> {
        self.hosts.load_full()
    }

    #[cfg(test)]
    pub(crate) fn set_hosts(
        &self,
        hosts: Vec<String>,
    ) {
        self.hosts.store(Arc::new(hosts));
    }
}
