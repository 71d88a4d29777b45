//! Workspace-scoped cache keys.
//!
//! `WorkspaceScopedKey`'s private inner struct means a key cannot exist
//! without a workspace id, so one workspace's snapshot can never be read
//! under another workspace's key.

use fintra_core::WorkspaceId;
use std::fmt;
use uuid::Uuid;

/// Separator between the feature name and the workspace id.
const SEPARATOR: char = '_';

/// A cache key of the form `<feature>_<workspace_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceScopedKey {
    /// Private inner data - cannot be constructed externally
    inner: WorkspaceKeyInner,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WorkspaceKeyInner {
    feature: String,
    workspace_id: WorkspaceId,
}

impl WorkspaceScopedKey {
    /// Create a key for one feature's snapshot in one workspace.
    ///
    /// `feature` may itself contain underscores; the workspace id is always
    /// the last segment.
    pub fn new(feature: impl Into<String>, workspace_id: WorkspaceId) -> Self {
        Self {
            inner: WorkspaceKeyInner {
                feature: feature.into(),
                workspace_id,
            },
        }
    }

    pub fn feature(&self) -> &str {
        &self.inner.feature
    }

    pub fn workspace_id(&self) -> WorkspaceId {
        self.inner.workspace_id
    }

    /// Encode to the storage key string.
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            self.inner.feature,
            SEPARATOR,
            self.inner.workspace_id.hyphenated()
        )
    }

    /// Decode a storage key string.
    ///
    /// Returns `None` if there is no separator, the feature part is empty,
    /// or the trailing segment is not a UUID.
    pub fn decode(raw: &str) -> Option<Self> {
        let (feature, workspace) = raw.rsplit_once(SEPARATOR)?;
        if feature.is_empty() {
            return None;
        }
        let workspace_id = Uuid::parse_str(workspace).ok()?;
        Some(Self::new(feature, workspace_id))
    }

    /// Suffix shared by every key of one workspace.
    pub fn workspace_suffix(workspace_id: WorkspaceId) -> String {
        format!("{}{}", SEPARATOR, workspace_id.hyphenated())
    }
}

impl fmt::Display for WorkspaceScopedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
