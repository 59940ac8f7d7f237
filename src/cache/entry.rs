// Persisted cache entry format and validation.
// Stored as `{"data": ..., "cachedAt": <ms>, "expiresAt": <ms>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One persisted cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The cached response payload, opaque to the cache.
    pub data: Value,
    /// Epoch milliseconds when the entry was written.
    pub cached_at: i64,
    /// Epoch milliseconds after which the entry is stale.
    pub expires_at: i64,
}

/// Lenient view used when reading back, so a missing `data` field is
/// distinguishable from unparseable JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    #[serde(default)]
    data: Option<Value>,
    expires_at: i64,
}

/// Outcome of reading one key from the storage medium.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    /// A live, valid entry.
    Hit(Value),
    /// Nothing stored under the key.
    Miss,
    /// The entry exists but `expiresAt` has passed.
    Expired,
    /// The entry could not be parsed or has no `data`.
    Corrupt(String),
}

impl Probe {
    /// Whether the stored value should be deleted.
    pub fn needs_cleanup(&self) -> bool {
        matches!(self, Probe::Expired | Probe::Corrupt(_))
    }
}

impl CacheEntry {
    pub fn new(data: Value, now_millis: i64, ttl_millis: i64) -> Self {
        Self {
            data,
            cached_at: now_millis,
            expires_at: now_millis.saturating_add(ttl_millis),
        }
    }

    /// An entry is served only while `now <= expiresAt`.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis > self.expires_at
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Classify a raw stored value at time `now_millis`.
    pub fn inspect(raw: &str, now_millis: i64) -> Probe {
        let stored: StoredEntry = match serde_json::from_str(raw) {
            Ok(stored) => stored,
            Err(e) => return Probe::Corrupt(e.to_string()),
        };

        if now_millis > stored.expires_at {
            return Probe::Expired;
        }

        match stored.data {
            Some(Value::Null) | None => Probe::Corrupt("entry has no data".to_string()),
            Some(data) => Probe::Hit(data),
        }
    }
}
