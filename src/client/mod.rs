//! Public client surface for the diamond configuration service
//!
//! Provides the entry points for working with remote configuration:
//! - [`ConfigClient`] - Main entry point for all operations
//! - [`ClientBuilder`] - Validated client construction
//!
//! # Basic Usage
//! ```no_run
//! use diamond_client::ConfigClient;
//! use diamond_client::ConfigListener;
//! use diamond_client::RequestOptions;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let client = ConfigClient::builder()
//!         .endpoint("acm.aliyun.com")
//!         .namespace("81***9-bf***90")
//!         .access_key("4c***aV")
//!         .secret_key("UjLem***2Vr")
//!         .build()
//!         .unwrap();
//!
//!     let content = client
//!         .get_config("app.properties", "DEFAULT_GROUP", RequestOptions::default())
//!         .await
//!         .unwrap();
//!     println!("current content: {content}");
//!
//!     let listener: ConfigListener = Arc::new(|content| println!("changed: {content}"));
//!     client
//!         .subscribe("app.properties", "DEFAULT_GROUP", listener)
//!         .await
//!         .unwrap();
//! }
//! ```

mod api;
mod builder;
mod validate;

pub use builder::*;

pub(crate) use api::ConfigApi;


use std::sync::Arc;

use serde_json::Value;

use crate::constants::TENANT_PAGE_SIZE;
use crate::subscription::ConfigKey;
use crate::subscription::ConfigListener;
use crate::subscription::SubscriptionEngine;
use crate::Result;

/// Per-call overrides; the client defaults apply where unset.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Resolve hosts for this deployment unit instead of the client's
    pub unit: Option<String>,

    /// Address the entry under this tenant instead of the namespace
    pub tenant: Option<String>,
}

/// Main entry point for the diamond configuration service
///
/// One instance serves any number of concurrent operations and
/// subscriptions. Created through [`builder()`](ConfigClient::builder).
pub struct ConfigClient {
    pub(super) api: Arc<ConfigApi>,
    pub(super) engine: Arc<SubscriptionEngine>,
}

impl ConfigClient {
    /// Create a configured client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    fn unit<'a>(
        &'a self,
        options: &'a RequestOptions,
    ) -> Option<&'a str> {
        options.unit.as_deref().or(self.api.config.unit.as_deref())
    }

    /// Fetch the current content of one entry.
    pub async fn get_config(
        &self,
        data_id: &str,
        group: &str,
        options: RequestOptions,
    ) -> Result<String> {
        validate::check_param("dataId", data_id)?;
        validate::check_param("group", group)?;
        self.api.resolver.refresh(self.unit(&options)).await;
        self.api.get_config(data_id, group, options.tenant.as_deref()).await
    }

    /// Create or overwrite one entry. Returns whether the server
    /// acknowledged the write.
    pub async fn publish_config(
        &self,
        data_id: &str,
        group: &str,
        content: &str,
        options: RequestOptions,
    ) -> Result<bool> {
        validate::check_param("dataId", data_id)?;
        validate::check_param("group", group)?;
        self.api.resolver.refresh(self.unit(&options)).await;
        self.api
            .publish_config(data_id, group, content, options.tenant.as_deref())
            .await
    }

    /// Remove one entry. Returns whether the server acknowledged the
    /// removal.
    pub async fn delete_config(
        &self,
        data_id: &str,
        group: &str,
        options: RequestOptions,
    ) -> Result<bool> {
        validate::check_param("dataId", data_id)?;
        validate::check_param("group", group)?;
        self.api.resolver.refresh(self.unit(&options)).await;
        self.api
            .delete_config(data_id, group, options.tenant.as_deref())
            .await
    }

    /// Fetch several entries of one group in a single round trip.
    pub async fn batch_get_config(
        &self,
        data_ids: &[String],
        group: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        validate::check_data_ids(data_ids)?;
        validate::check_param("group", group)?;
        self.api.resolver.refresh(self.unit(&options)).await;
        self.api
            .batch_get_config(data_ids, group, options.tenant.as_deref())
            .await
    }

    /// Query the status of several entries without their content.
    pub async fn batch_query(
        &self,
        data_ids: &[String],
        group: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        validate::check_data_ids(data_ids)?;
        validate::check_param("group", group)?;
        self.api.resolver.refresh(self.unit(&options)).await;
        self.api
            .batch_query(data_ids, group, options.tenant.as_deref())
            .await
    }

    /// One page of the tenant's entries, as returned by the server.
    pub async fn get_all_config_by_tenant(
        &self,
        page_no: u32,
        page_size: u32,
        options: RequestOptions,
    ) -> Result<Value> {
        self.api.resolver.refresh(self.unit(&options)).await;
        self.api
            .get_all_config_by_tenant(page_no, page_size, options.tenant.as_deref())
            .await
    }

    /// Every entry of the tenant, walked page by page.
    pub async fn get_configs(
        &self,
        options: RequestOptions,
    ) -> Result<Vec<Value>> {
        self.api.resolver.refresh(self.unit(&options)).await;

        let tenant = options.tenant.as_deref();
        let mut configs = Vec::new();
        let mut page_no = 1;
        loop {
            let page = self
                .api
                .get_all_config_by_tenant(page_no, TENANT_PAGE_SIZE, tenant)
                .await?;
            let total = page["totalCount"].as_u64().unwrap_or(0) as usize;
            let items = page["pageItems"].as_array().cloned().unwrap_or_default();
            if items.is_empty() {
                break;
            }
            configs.extend(items);
            if configs.len() >= total {
                break;
            }
            page_no += 1;
        }
        Ok(configs)
    }

    /// Watch one entry for changes.
    ///
    /// The listener receives the current content once after
    /// registration and again on every change. Keep the handle you
    /// registered with if you plan to unsubscribe it specifically.
    pub async fn subscribe(
        &self,
        data_id: &str,
        group: &str,
        listener: ConfigListener,
    ) -> Result<()> {
        validate::check_param("dataId", data_id)?;
        validate::check_param("group", group)?;
        let key = ConfigKey::new(data_id, group, self.api.config.unit.as_deref());
        self.engine.subscribe(key, listener).await
    }

    /// Stop watching an entry.
    ///
    /// With a listener handle, only that registration is dropped (every
    /// instance of it); with `None`, all listeners for the entry go and
    /// its poll loop winds down.
    pub fn unsubscribe(
        &self,
        data_id: &str,
        group: &str,
        listener: Option<&ConfigListener>,
    ) {
        let key = ConfigKey::new(data_id, group, self.api.config.unit.as_deref());
        self.engine.unsubscribe(&key, listener);
    }

    /// Unit the calling machine is deployed in.
    pub async fn get_current_unit(&self) -> Result<String> {
        self.api.resolver.current_unit().await
    }

    /// All known deployment units.
    pub async fn get_all_units(&self) -> Result<Vec<String>> {
        self.api.resolver.all_units().await
    }
}
