use std::sync::Arc;

use dashmap::DashMap;

use super::ConfigKey;

/// Callback invoked with the new content whenever a watched entry
/// changes. Identity (for targeted unsubscribe) is the `Arc` pointer,
/// so hold on to the same handle you subscribed with.
pub type ConfigListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Per-key listener registrations.
///
/// The same callback handle may be registered more than once; removal
/// by handle drops every matching instance and reports how many went.
#[derive(Default)]
pub(crate) struct ListenerSet {
    inner: DashMap<ConfigKey, Vec<ConfigListener>>,
}

impl ListenerSet {
    pub(crate) fn add(
        &self,
        key: ConfigKey,
        listener: ConfigListener,
    ) {
        self.inner.entry(key).or_default().push(listener);
    }

    /// Remove every instance of `listener` under `key`; returns the
    /// number removed.
    pub(crate) fn remove(
        &self,
        key: &ConfigKey,
        listener: &ConfigListener,
    ) -> usize {
        let Some(mut listeners) = self.inner.get_mut(key) else {
            return 0;
        };
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        before - listeners.len()
    }

    /// Drop all listeners for `key`; returns the number removed.
    pub(crate) fn remove_all(
        &self,
        key: &ConfigKey,
    ) -> usize {
        self.inner.remove(key).map(|(_, l)| l.len()).unwrap_or(0)
    }

    /// Snapshot of the current listeners, so notification never runs
    /// under the map lock.
    pub(crate) fn snapshot(
        &self,
        key: &ConfigKey,
    ) -> Vec<ConfigListener> {
        self.inner.get(key).map(|l| l.value().clone()).unwrap_or_default()
    }
}
