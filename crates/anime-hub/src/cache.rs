//! In-memory cache for API responses.
//!
//! Entries are keyed by the full request URL and expire lazily: a lookup on a
//! stale entry removes it. There is no size limit and no background sweep.

use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    captured_at: Instant,
}

/// Time-bounded response cache
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    expiry: Duration,
}

impl ResponseCache {
    /// Create an empty cache whose entries stay fresh for `expiry`
    pub fn new(expiry: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            expiry,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Get a fresh cached value
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Get a cached value as seen at `now`; a stale entry is removed
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if now.saturating_duration_since(entry.captured_at) < self.expiry {
                debug!(key = key, "Cache hit");
                return Some(entry.value.clone());
            }
            debug!(key = key, "Cache entry expired");
        } else {
            debug!(key = key, "Cache miss");
        }

        self.entries.remove(key);
        None
    }

    /// Store a value, replacing any previous entry for the key
    pub fn put(&mut self, key: impl Into<String>, value: Value) {
        self.put_at(key, value, Instant::now());
    }

    /// Store a value captured at `now`
    pub fn put_at(&mut self, key: impl Into<String>, value: Value, now: Instant) {
        let key = key.into();
        debug!(key = %key, "Cache stored");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                captured_at: now,
            },
        );
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        info!(dropped = dropped, "Cache cleared");
    }

    /// Number of stored entries, including ones that have expired but were
    /// not looked up since
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EXPIRY: Duration = Duration::from_secs(300);

    #[test]
    fn test_get_after_put() {
        let mut cache = ResponseCache::new(EXPIRY);
        let start = Instant::now();

        cache.put_at("https://api/anime?page=1", json!({"data": [1, 2]}), start);

        let hit = cache.get_at("https://api/anime?page=1", start + Duration::from_secs(299));
        assert_eq!(hit, Some(json!({"data": [1, 2]})));
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let mut cache = ResponseCache::new(EXPIRY);
        let start = Instant::now();

        cache.put_at("key", json!("value"), start);
        assert_eq!(cache.len(), 1);

        // Exactly at the expiry boundary counts as stale
        assert_eq!(cache.get_at("key", start + EXPIRY), None);
        assert!(cache.is_empty());

        // Stays gone even if asked about an earlier instant afterwards
        assert_eq!(cache.get_at("key", start), None);
    }

    #[test]
    fn test_miss() {
        let mut cache = ResponseCache::new(EXPIRY);
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_put_replaces_and_refreshes() {
        let mut cache = ResponseCache::new(EXPIRY);
        let start = Instant::now();

        cache.put_at("key", json!(1), start);
        cache.put_at("key", json!(2), start + Duration::from_secs(200));

        // Would have expired under the first capture time
        let hit = cache.get_at("key", start + Duration::from_secs(400));
        assert_eq!(hit, Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = ResponseCache::new(EXPIRY);
        cache.put("a", json!(1));
        cache.put("b", json!(2));

        cache.clear();

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lazy_expiry_keeps_untouched_entries() {
        let mut cache = ResponseCache::new(Duration::from_secs(1));
        let start = Instant::now();

        cache.put_at("a", json!(1), start);
        cache.put_at("b", json!(2), start);

        assert_eq!(cache.get_at("a", start + Duration::from_secs(5)), None);
        // "b" is stale too but nothing has looked at it yet
        assert_eq!(cache.len(), 1);
    }
}
