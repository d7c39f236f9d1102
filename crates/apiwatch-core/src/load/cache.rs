use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::ErrorLog;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct CachedLog {
    pub log: Arc<ErrorLog>,
    pub fetched_at: DateTime<Utc>,
}

/// Fetched logs keyed by source identifier, valid for a fixed TTL.
#[derive(Debug, Clone)]
pub struct SourceCache {
    ttl: TimeDelta,
    entries: HashMap<String, CachedLog>,
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL_SECS)
    }
}

impl SourceCache {
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Missing entries count as stale.
    #[must_use]
    pub fn is_stale(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .get(key)
            .is_none_or(|entry| now.signed_duration_since(entry.fetched_at) >= self.ttl)
    }

    /// Fresh entry only.
    #[must_use]
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CachedLog> {
        if self.is_stale(key, now) {
            return None;
        }
        self.entries.get(key).cloned()
    }

    /// Stores a snapshot and evicts every entry that has expired by `now`.
    pub fn insert(&mut self, key: impl Into<String>, log: Arc<ErrorLog>, now: DateTime<Utc>) {
        self.prune(now);
        self.entries.insert(
            key.into(),
            CachedLog {
                log,
                fetched_at: now,
            },
        );
    }

    /// Drops expired entries; returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.signed_duration_since(entry.fetched_at) < ttl);
        before - self.entries.len()
    }

    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
