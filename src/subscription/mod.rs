//! Change subscription.
//!
//! Many callers can watch the same configuration entry; the engine
//! multiplexes them onto a single long-poll loop per key, refcounted by
//! listener registrations. Loops shut down cooperatively once the last
//! listener leaves.

mod engine;
mod listener;

pub use listener::*;

pub(crate) use engine::*;


use crate::constants::CURRENT_UNIT;

/// Identity of one watched configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    pub data_id: String,
    pub group: String,
    pub unit: String,
}

impl ConfigKey {
    pub fn new(
        data_id: impl Into<String>,
        group: impl Into<String>,
        unit: Option<&str>,
    ) -> Self {
        Self {
            data_id: data_id.into(),
            group: group.into(),
            unit: unit.unwrap_or(CURRENT_UNIT).to_string(),
        }
    }
}

/// Last known value of a watched entry, kept alongside its fingerprint
/// so probes and refetch comparisons never re-hash stale content.
#[derive(Debug, Clone)]
pub(crate) struct CachedConfig {
    pub(crate) content: String,
    pub(crate) fingerprint: String,
}
