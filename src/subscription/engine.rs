use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::sleep;
use tracing::debug;
use tracing::warn;

use super::CachedConfig;
use super::ConfigKey;
use super::ConfigListener;
use super::ListenerSet;
use crate::client::ConfigApi;
use crate::codec;
use crate::constants::POLL_ERROR_BACKOFF_MS;
use crate::Result;

/// One live watch on a key: how many listener registrations hold it
/// open, and which poll loop owns it.
///
/// The epoch pins a loop to the entry it was spawned for. A key that is
/// fully unsubscribed and immediately re-subscribed gets a new entry
/// with a new epoch; the old loop notices the mismatch at its next
/// iteration boundary and exits instead of double-polling.
struct SubscriptionEntry {
    count: usize,
    epoch: u64,
}

/// Multiplexes listener registrations onto one long-poll loop per key.
///
/// All maps are sharded; no lock is ever held across an await point.
pub(crate) struct SubscriptionEngine {
    api: Arc<ConfigApi>,
    registry: DashMap<ConfigKey, SubscriptionEntry>,
    cache: DashMap<ConfigKey, CachedConfig>,
    listeners: ListenerSet,
    next_epoch: AtomicU64,
}

impl SubscriptionEngine {
    pub(crate) fn new(api: Arc<ConfigApi>) -> Self {
        Self {
            api,
            registry: DashMap::new(),
            cache: DashMap::new(),
            listeners: ListenerSet::default(),
            next_epoch: AtomicU64::new(0),
        }
    }

    /// Register `listener` for changes of `key`.
    ///
    /// The first registration for a key fetches the current value,
    /// seeds the cache and spawns the poll loop; later registrations
    /// only bump the refcount. A listener never observes the initial
    /// value synchronously from this call: cached content is delivered
    /// from a spawned task.
    pub(crate) async fn subscribe(
        self: &Arc<Self>,
        key: ConfigKey,
        listener: ConfigListener,
    ) -> Result<()> {
        self.listeners.add(key.clone(), listener.clone());

        let warm = self.cache.get(&key).map(|c| c.value().clone());
        if let Some(cached) = &warm {
            let content = cached.content.clone();
            let listener = listener.clone();
            tokio::spawn(async move { listener(&content) });
        }

        let epoch = match self.registry.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().count += 1;
                return Ok(());
            }
            Entry::Vacant(vacant) => {
                let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
                vacant.insert(SubscriptionEntry { count: 1, epoch });
                epoch
            }
        };

        let mut prime_error = None;
        if warm.is_none() {
            match self.api.fetch_config(&key).await {
                Ok(content) => {
                    let fingerprint = codec::fingerprint(&content);
                    self.cache.insert(
                        key.clone(),
                        CachedConfig {
                            content: content.clone(),
                            fingerprint,
                        },
                    );
                    self.notify(&key, &content);
                }
                Err(e) => {
                    // Roll this registration back; subscribers that
                    // piled on during the failed fetch keep the entry
                    // alive and are served by the loop below.
                    self.listeners.remove(&key, &listener);
                    if self.release(&key, 1) == 0 {
                        return Err(e);
                    }
                    prime_error = Some(e);
                }
            }
        }

        let engine = Arc::clone(self);
        let loop_key = key.clone();
        tokio::spawn(async move { engine.poll_loop(loop_key, epoch).await });

        match prime_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop listener registrations for `key`.
    ///
    /// With a listener handle, every matching instance is removed and
    /// the refcount drops by that many. With `None`, all listeners go
    /// and the entry is torn down outright. Either way the poll loop
    /// exits at its next iteration boundary once the refcount hits
    /// zero.
    pub(crate) fn unsubscribe(
        &self,
        key: &ConfigKey,
        listener: Option<&ConfigListener>,
    ) {
        match listener {
            Some(listener) => {
                let removed = self.listeners.remove(key, listener);
                if removed > 0 {
                    self.release(key, removed);
                }
            }
            None => {
                self.listeners.remove_all(key);
                self.registry.remove(key);
            }
        }
    }

    /// Decrement the refcount by `n`, removing the entry at zero.
    /// Returns the remaining count.
    fn release(
        &self,
        key: &ConfigKey,
        n: usize,
    ) -> usize {
        match self.registry.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let remaining = {
                    let entry = occupied.get_mut();
                    entry.count = entry.count.saturating_sub(n);
                    entry.count
                };
                if remaining == 0 {
                    occupied.remove();
                }
                remaining
            }
            Entry::Vacant(_) => 0,
        }
    }

    async fn poll_loop(
        self: Arc<Self>,
        key: ConfigKey,
        epoch: u64,
    ) {
        debug!("poll loop started for {}/{}", key.data_id, key.group);
        loop {
            let active = match self.registry.get(&key) {
                Some(entry) => entry.epoch == epoch && entry.count > 0,
                None => false,
            };
            if !active {
                break;
            }

            let fingerprint = self
                .cache
                .get(&key)
                .map(|c| c.fingerprint.clone())
                .unwrap_or_default();

            let signal = match self.api.probe(&key, &fingerprint).await {
                Ok(signal) => signal,
                Err(e) => {
                    warn!("probe for {}/{} failed: {e}", key.data_id, key.group);
                    sleep(Duration::from_millis(POLL_ERROR_BACKOFF_MS)).await;
                    continue;
                }
            };
            if signal.is_empty() {
                continue;
            }

            match self.api.fetch_config(&key).await {
                Ok(content) => {
                    let next = codec::fingerprint(&content);
                    // The probe can fire for a change that reverts
                    // before the refetch lands; only a fingerprint
                    // move counts as a change.
                    if next != fingerprint {
                        self.cache.insert(
                            key.clone(),
                            CachedConfig {
                                content: content.clone(),
                                fingerprint: next,
                            },
                        );
                        self.notify(&key, &content);
                    }
                }
                Err(e) => {
                    warn!("refetch for {}/{} failed: {e}", key.data_id, key.group);
                    sleep(Duration::from_millis(POLL_ERROR_BACKOFF_MS)).await;
                }
            }
        }
        debug!("poll loop stopped for {}/{}", key.data_id, key.group);
    }

    fn notify(
        &self,
        key: &ConfigKey,
        content: &str,
    ) {
        for listener in self.listeners.snapshot(key) {
            listener(content);
        }
    }

    #[cfg(test)]
    pub(crate) fn refcount(
        &self,
        key: &ConfigKey,
    ) -> Option<usize> {
        self.registry.get(key).map(|e| e.count)
    }
}
