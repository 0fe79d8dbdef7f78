use std::sync::Arc;

use serde_json::Value;

use crate::auth::RequestSigner;
use crate::codec;
use crate::codec::FormVariant;
use crate::constants::ADMIN_PATH;
use crate::constants::BASESTONE_PATH;
use crate::constants::CONFIG_PATH;
use crate::constants::DATUM_PATH;
use crate::constants::FORM_CONTENT_TYPE;
use crate::constants::HEADER_EXCONFIGINFO;
use crate::constants::HEADER_LONGPOLL_TIMEOUT;
use crate::constants::LONGPOLL_REQUEST_TIMEOUT_MS;
use crate::discovery::EndpointResolver;
use crate::subscription::ConfigKey;
use crate::transport::ApiRequest;
use crate::transport::HttpMethod;
use crate::transport::HttpTransport;
use crate::transport::RetryingExecutor;
use crate::ClientConfig;
use crate::ProtocolError;
use crate::Result;

/// Raw diamond operations: one method per service endpoint.
///
/// Shared by the public [`ConfigClient`](super::ConfigClient) facade
/// and the subscription engine's poll loops. Every call goes through
/// the retry envelope; a fresh host is picked from the pool on each
/// attempt.
pub(crate) struct ConfigApi {
    pub(crate) config: ClientConfig,
    pub(crate) signer: RequestSigner,
    pub(crate) executor: Arc<RetryingExecutor>,
    pub(crate) resolver: EndpointResolver,
}

impl ConfigApi {
    pub(crate) fn new(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let executor = Arc::new(RetryingExecutor::new(transport));
        let signer = RequestSigner::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            config.namespace.clone(),
        );
        let resolver = EndpointResolver::new(config.endpoint.clone(), executor.clone(), config.retry);
        Self {
            config,
            signer,
            executor,
            resolver,
        }
    }

    fn tenant<'a>(
        &'a self,
        tenant: Option<&'a str>,
    ) -> &'a str {
        tenant.unwrap_or(&self.config.namespace)
    }

    /// GET `/diamond-server/config.co` — current content of one entry.
    pub(crate) async fn get_config(
        &self,
        data_id: &str,
        group: &str,
        tenant: Option<&str>,
    ) -> Result<String> {
        let tenant = self.tenant(tenant).to_string();
        let response = self
            .executor
            .execute(&self.config.retry, || {
                let host = self.resolver.pick_host()?;
                let request = ApiRequest::new(HttpMethod::Get, host, CONFIG_PATH)
                    .query("dataId", data_id)
                    .query("group", group)
                    .query("tenant", &tenant);
                Ok(self.signer.apply(request, None))
            })
            .await?;
        Ok(response.text())
    }

    /// Re-fetch used by poll loops: refreshes the host pool for the
    /// client's unit first, mirroring the public get path.
    pub(crate) async fn fetch_config(
        &self,
        key: &ConfigKey,
    ) -> Result<String> {
        self.resolver.refresh(self.config.unit.as_deref()).await;
        self.get_config(&key.data_id, &key.group, None).await
    }

    /// POST `/diamond-server/config.co` long-poll probe.
    ///
    /// The server holds the request up to `longpoll_timeout_ms` and
    /// answers with the changed keys, or an empty body for no change.
    pub(crate) async fn probe(
        &self,
        key: &ConfigKey,
        content_md5: &str,
    ) -> Result<String> {
        let tenant = self.config.namespace.clone();
        let payload = codec::probe_payload(
            &key.data_id,
            &key.group,
            content_md5,
            (!tenant.is_empty()).then_some(tenant.as_str()),
        );
        let longpoll_ms = self.config.longpoll_timeout_ms.to_string();
        let policy = self.config.retry.with_timeout_ms(LONGPOLL_REQUEST_TIMEOUT_MS);

        let response = self
            .executor
            .execute(&policy, || {
                let host = self.resolver.pick_host()?;
                let body = codec::encode_form(
                    &[("Probe-Modify-Request", payload.as_str())],
                    FormVariant::Form,
                );
                let request = ApiRequest::new(HttpMethod::Post, host, CONFIG_PATH)
                    .header(HEADER_LONGPOLL_TIMEOUT, &longpoll_ms)
                    .header("content-type", FORM_CONTENT_TYPE)
                    .header("content-length", body.len().to_string())
                    .body(body);
                Ok(self.signer.apply(request, Some(FormVariant::Form)))
            })
            .await?;
        Ok(response.text())
    }

    /// POST `/diamond-server/basestone.do?method=syncUpdateAll`.
    pub(crate) async fn publish_config(
        &self,
        data_id: &str,
        group: &str,
        content: &str,
        tenant: Option<&str>,
    ) -> Result<bool> {
        let tenant = self.tenant(tenant).to_string();
        let response = self
            .executor
            .execute(&self.config.retry, || {
                let host = self.resolver.pick_host()?;
                let body = codec::encode_form(
                    &[
                        ("dataId", data_id),
                        ("group", group),
                        ("content", content),
                        ("tenant", &tenant),
                    ],
                    FormVariant::Encode,
                );
                let request = ApiRequest::new(HttpMethod::Post, host, BASESTONE_PATH)
                    .query("method", "syncUpdateAll")
                    .header("content-type", FORM_CONTENT_TYPE)
                    .header("content-length", body.len().to_string())
                    .body(body);
                Ok(self.signer.apply(request, Some(FormVariant::Encode)))
            })
            .await?;
        Ok(response.text().contains("OK"))
    }

    /// POST `/diamond-server/datum.do?method=deleteAllDatums`.
    pub(crate) async fn delete_config(
        &self,
        data_id: &str,
        group: &str,
        tenant: Option<&str>,
    ) -> Result<bool> {
        let tenant = self.tenant(tenant).to_string();
        let response = self
            .executor
            .execute(&self.config.retry, || {
                let host = self.resolver.pick_host()?;
                let body = codec::encode_form(
                    &[("dataId", data_id), ("group", group), ("tenant", &tenant)],
                    FormVariant::Encode,
                );
                let request = ApiRequest::new(HttpMethod::Post, host, DATUM_PATH)
                    .query("method", "deleteAllDatums")
                    .header("content-type", FORM_CONTENT_TYPE)
                    .header("content-length", body.len().to_string())
                    .body(body);
                Ok(self.signer.apply(request, Some(FormVariant::Encode)))
            })
            .await?;
        Ok(response.text().contains("OK"))
    }

    /// POST `/diamond-server/config.co?method=batchGetConfig`.
    pub(crate) async fn batch_get_config(
        &self,
        data_ids: &[String],
        group: &str,
        tenant: Option<&str>,
    ) -> Result<Value> {
        self.batch(CONFIG_PATH, "batchGetConfig", data_ids, group, tenant).await
    }

    /// POST `/diamond-server/admin.do?method=batchQuery`.
    pub(crate) async fn batch_query(
        &self,
        data_ids: &[String],
        group: &str,
        tenant: Option<&str>,
    ) -> Result<Value> {
        self.batch(ADMIN_PATH, "batchQuery", data_ids, group, tenant).await
    }

    async fn batch(
        &self,
        path: &'static str,
        method: &'static str,
        data_ids: &[String],
        group: &str,
        tenant: Option<&str>,
    ) -> Result<Value> {
        let tenant = self.tenant(tenant).to_string();
        let joined = codec::join_words(data_ids);
        let response = self
            .executor
            .execute(&self.config.retry, || {
                let host = self.resolver.pick_host()?;
                let body = codec::encode_form(
                    &[("dataIds", joined.as_str()), ("group", group), ("tenant", &tenant)],
                    FormVariant::Form,
                );
                let request = ApiRequest::new(HttpMethod::Post, host, path)
                    .query("method", method)
                    .header("content-type", FORM_CONTENT_TYPE)
                    .header(HEADER_EXCONFIGINFO, "true")
                    .header("content-length", body.len().to_string())
                    .body(body);
                Ok(self.signer.apply(request, Some(FormVariant::Form)))
            })
            .await?;
        parse_json(&response.text())
    }

    /// GET `/diamond-server/basestone.do?method=getAllConfigByTenant`
    /// — one page of the tenant's entries.
    pub(crate) async fn get_all_config_by_tenant(
        &self,
        page_no: u32,
        page_size: u32,
        tenant: Option<&str>,
    ) -> Result<Value> {
        let tenant = self.tenant(tenant).to_string();
        let page_no = page_no.to_string();
        let page_size = page_size.to_string();
        let response = self
            .executor
            .execute(&self.config.retry, || {
                let host = self.resolver.pick_host()?;
                let request = ApiRequest::new(HttpMethod::Get, host, BASESTONE_PATH)
                    .query("pageNo", &page_no)
                    .query("pageSize", &page_size)
                    .query("method", "getAllConfigByTenant")
                    .query("tenant", &tenant);
                Ok(self.signer.apply(request, None))
            })
            .await?;
        parse_json(&response.text())
    }
}

fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|_| ProtocolError::InvalidJson(text.to_string()).into())
}
