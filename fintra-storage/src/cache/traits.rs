//! Backing store trait and cache statistics.

/// Session-lifetime string store backing the snapshot cache.
///
/// Mirrors browser session storage: synchronous, string keys and values,
/// no expiry. Implementations must tolerate concurrent access.
pub trait SessionStore: Send + Sync {
    /// Get the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: String);

    /// Remove `key` if present.
    fn remove_item(&self, key: &str);

    /// All keys currently stored.
    fn keys(&self) -> Vec<String>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (absent or corrupt).
    pub misses: u64,
    /// Number of snapshot writes.
    pub writes: u64,
    /// Number of corrupt entries that were purged on read.
    pub corrupt_purged: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
