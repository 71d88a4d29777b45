//! Staleness metadata for cache reads.
//!
//! Cached snapshots carry no TTL. A hit is always shown first and then
//! revalidated, so callers only need to know how old it is.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// A snapshot served from the cache, with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead<T> {
    value: T,
    cached_at: DateTime<Utc>,
}

impl<T> CacheRead<T> {
    pub fn from_cache(value: T, cached_at: DateTime<Utc>) -> Self {
        Self { value, cached_at }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// When the snapshot was written by a successful fetch.
    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    /// Age of the snapshot. Clock skew into the future reads as zero.
    pub fn staleness(&self) -> Duration {
        (Utc::now() - self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_tracks_write_time() {
        let written = Utc::now() - chrono::Duration::seconds(5);
        let read = CacheRead::from_cache(vec![1u8, 2], written);

        assert_eq!(read.cached_at(), written);
        let age = read.staleness();
        assert!(age >= Duration::from_secs(4));
        assert!(age <= Duration::from_secs(10));
    }

    #[test]
    fn test_future_write_time_is_not_stale() {
        let read = CacheRead::from_cache("snapshot", Utc::now() + chrono::Duration::seconds(30));
        assert_eq!(read.staleness(), Duration::ZERO);
        assert_eq!(read.into_value(), "snapshot");
    }
}
