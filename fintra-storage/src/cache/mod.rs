//! Workspace-scoped snapshot cache.
//!
//! Each page stores its last successful fetch as one JSON snapshot under
//! `<feature>_<workspace_id>`. The cache paints a page instantly on mount;
//! the caller always revalidates afterwards.
//!
//! # Workspace Isolation
//!
//! [`WorkspaceScopedKey`] cannot be constructed without a workspace id, so
//! switching workspaces changes every key and stale cross-workspace reads
//! are impossible.
//!
//! # Example
//!
//! ```ignore
//! let cache = WorkspaceCache::in_memory();
//! let key = WorkspaceScopedKey::new("fintra_accounts_data", workspace.id);
//!
//! if let Some(read) = cache.read::<AccountsSnapshot>(&key) {
//!     render(read.value());
//! }
//! let fresh = fetch().await?;
//! cache.write(&key, &fresh);
//! ```

pub mod freshness;
pub mod session;
pub mod traits;
pub mod workspace_cache;
pub mod workspace_key;

pub use freshness::CacheRead;
pub use session::MemorySessionStore;
pub use traits::{CacheStats, SessionStore};
pub use workspace_cache::WorkspaceCache;
pub use workspace_key::WorkspaceScopedKey;
