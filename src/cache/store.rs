// Cache store for reading and writing cached responses.
// Handles key derivation, TTL checking, corruption cleanup and quota recovery.
// Every failure here degrades to a miss or a dropped write; nothing is returned
// to the caller as an error.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

use super::clock::{Clock, SystemClock, duration_millis};
use super::entry::{CacheEntry, Probe};
use super::key::KeyScheme;

/// Default TTL: one hour, matching the GitHub rate-limit window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL-aware, namespaced cache over a key-value storage medium.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    keys: KeyScheme,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl CacheStore {
    /// Create a cache over `backend` using the wall clock and default key scheme.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            keys: KeyScheme::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_key_scheme(mut self, keys: KeyScheme) -> Self {
        self.keys = keys;
        self
    }

    pub fn keys(&self) -> &KeyScheme {
        &self.keys
    }

    /// Startup hook: sweep expired and corrupt entries once.
    ///
    /// Call this once when the host application starts.
    pub fn initialize(&self) -> usize {
        let removed = self.evict_expired();
        info!(removed, namespace = self.keys.namespace(), "cache initialized");
        removed
    }

    /// Read `request_id` without side effects.
    pub fn probe(&self, request_id: &str) -> Probe {
        self.probe_key(&self.keys.derive(request_id))
    }

    fn probe_key(&self, key: &str) -> Probe {
        match self.backend.get(key) {
            Ok(Some(raw)) => CacheEntry::inspect(&raw, self.clock.now_millis()),
            Ok(None) => Probe::Miss,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                Probe::Miss
            }
        }
    }

    /// Return the cached payload for `request_id`, or `None` on a miss.
    ///
    /// Expired and corrupt entries count as misses and are deleted.
    pub fn get(&self, request_id: &str) -> Option<Value> {
        let key = self.keys.derive(request_id);
        let probe = self.probe_key(&key);

        match probe {
            Probe::Hit(data) => {
                debug!(request_id, "cache hit");
                Some(data)
            }
            Probe::Miss => {
                debug!(request_id, "cache miss");
                None
            }
            Probe::Expired => {
                debug!(request_id, "cache entry expired");
                self.discard(&key);
                None
            }
            Probe::Corrupt(reason) => {
                warn!(request_id, reason = %reason, "corrupted cache entry detected, removing");
                self.discard(&key);
                None
            }
        }
    }

    /// Store `data` for `request_id`, live for `ttl`.
    ///
    /// When the medium is full, expired entries are swept and the write is
    /// retried once. A write that still fails is dropped.
    pub fn set(&self, request_id: &str, data: &Value, ttl: Duration) {
        let key = self.keys.derive(request_id);
        let now = self.clock.now_millis();
        let entry = CacheEntry::new(data.clone(), now, duration_millis(ttl));
        let json = match entry.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(request_id, error = %e, "failed to serialize cache entry");
                return;
            }
        };

        match self.backend.set(&key, &json) {
            Ok(()) => debug!(request_id, ttl_ms = duration_millis(ttl), "cached response"),
            Err(e) if e.is_quota_exceeded() => {
                warn!(request_id, error = %e, "cache full, sweeping expired entries");
                self.evict_expired();
                if let Err(retry) = self.backend.set(&key, &json) {
                    warn!(request_id, error = %retry, "failed to cache after cleanup");
                }
            }
            Err(e) => warn!(request_id, error = %e, "error writing cache"),
        }
    }

    /// Drop the entry for `request_id`, if any.
    pub fn invalidate(&self, request_id: &str) {
        self.discard(&self.keys.derive(request_id));
    }

    /// Delete every expired or invalid entry in the namespace.
    ///
    /// A failure on one key skips only that key. Returns the number removed.
    pub fn evict_expired(&self) -> usize {
        let keys = match self.backend.list_keys(self.keys.namespace()) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "error listing cache entries");
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys {
            let probe = match self.backend.get(&key) {
                Ok(Some(raw)) => CacheEntry::inspect(&raw, self.clock.now_millis()),
                Ok(None) => continue,
                Err(e) => {
                    warn!(key, error = %e, "skipping unreadable cache entry");
                    continue;
                }
            };
            if probe.needs_cleanup() && self.discard(&key) {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed, "evicted stale cache entries");
        }
        removed
    }

    fn discard(&self, key: &str) -> bool {
        match self.backend.delete(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "error removing cache entry");
                false
            }
        }
    }
}
