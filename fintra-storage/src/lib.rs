//! Fintra Storage - client-side snapshot cache.

pub mod cache;

pub use cache::{
    CacheRead, CacheStats, MemorySessionStore, SessionStore, WorkspaceCache, WorkspaceScopedKey,
};
