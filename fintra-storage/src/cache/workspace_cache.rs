//! Snapshot cache keyed by feature and workspace.
//!
//! Entries are whole-snapshot JSON envelopes. Reads never fail: a value
//! that does not parse is purged and reported as a miss. Writes overwrite
//! unconditionally (last writer wins). There is no TTL and no eviction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use fintra_core::{Timestamp, WorkspaceId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::freshness::CacheRead;
use super::session::MemorySessionStore;
use super::traits::{CacheStats, SessionStore};
use super::workspace_key::WorkspaceScopedKey;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    written_at: Timestamp,
    payload: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    written_at: Timestamp,
    payload: T,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    corrupt_purged: AtomicU64,
}

/// Workspace-scoped snapshot cache over a [`SessionStore`].
#[derive(Clone)]
pub struct WorkspaceCache {
    store: Arc<dyn SessionStore>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for WorkspaceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceCache")
            .field("stats", &self.stats())
            .finish()
    }
}

impl WorkspaceCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Cache backed by a fresh [`MemorySessionStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Read the snapshot stored under `key`.
    ///
    /// Returns `None` when absent. A malformed entry is removed and also
    /// returns `None`.
    pub fn read<T: DeserializeOwned>(&self, key: &WorkspaceScopedKey) -> Option<CacheRead<T>> {
        let encoded = key.encode();
        let Some(raw) = self.store.get_item(&encoded) else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %encoded, "cache miss");
            return None;
        };

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %encoded, written_at = %envelope.written_at, "cache hit");
                Some(CacheRead::from_cache(envelope.payload, envelope.written_at))
            }
            Err(err) => {
                self.store.remove_item(&encoded);
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                self.counters.corrupt_purged.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %encoded, error = %err, "purged corrupt cache entry");
                None
            }
        }
    }

    /// Overwrite the snapshot stored under `key`.
    pub fn write<T: Serialize>(&self, key: &WorkspaceScopedKey, payload: &T) {
        let envelope = EnvelopeRef {
            written_at: Utc::now(),
            payload,
        };
        match serde_json::to_string(&envelope) {
            Ok(raw) => {
                self.store.set_item(&key.encode(), raw);
                self.counters.writes.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "snapshot not cacheable, skipping write");
            }
        }
    }

    pub fn remove(&self, key: &WorkspaceScopedKey) {
        self.store.remove_item(&key.encode());
    }

    /// Drop every entry belonging to `workspace_id`. Returns the number removed.
    pub fn invalidate_workspace(&self, workspace_id: WorkspaceId) -> usize {
        let removed: Vec<_> = self
            .store
            .keys()
            .into_iter()
            .filter(|raw| {
                WorkspaceScopedKey::decode(raw).is_some_and(|k| k.workspace_id() == workspace_id)
            })
            .collect();
        for raw in &removed {
            self.store.remove_item(raw);
        }
        tracing::debug!(%workspace_id, removed = removed.len(), "invalidated workspace cache");
        removed.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            corrupt_purged: self.counters.corrupt_purged.load(Ordering::Relaxed),
        }
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn uuid_strategy() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Property: a write under workspace A is never visible under workspace B.
        #[test]
        fn prop_workspace_isolation(
            ws_a in uuid_strategy(),
            ws_b in uuid_strategy(),
            payload in prop::collection::vec(any::<u32>(), 0..8),
        ) {
            prop_assume!(ws_a != ws_b);
            let cache = WorkspaceCache::in_memory();
            cache.write(&WorkspaceScopedKey::new("fintra_dashboard_data", ws_a), &payload);

            let other = cache.read::<Vec<u32>>(&WorkspaceScopedKey::new("fintra_dashboard_data", ws_b));
            prop_assert!(other.is_none());

            let own = cache.read::<Vec<u32>>(&WorkspaceScopedKey::new("fintra_dashboard_data", ws_a));
            prop_assert_eq!(own.map(CacheRead::into_value), Some(payload));
        }
    }
}
