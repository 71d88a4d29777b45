//! Current-workspace selection.

use crate::persistence::{self, PersistedSelection};
use fintra_core::{FintraResult, MemberRole, SyncError, Workspace, WorkspaceId, WorkspaceType};
use std::path::PathBuf;
use std::sync::RwLock;

/// Pick the workspace to show after the list is (re)loaded.
///
/// Order: the stored id if it is still listed, else the initial personal
/// workspace, else the first listed.
pub fn select_workspace(workspaces: &[Workspace], stored: Option<WorkspaceId>) -> Option<WorkspaceId> {
    stored
        .filter(|id| workspaces.iter().any(|w| w.id == *id))
        .or_else(|| {
            workspaces
                .iter()
                .find(|w| w.workspace_type == WorkspaceType::Personal && w.is_initial)
                .map(|w| w.id)
        })
        .or_else(|| workspaces.first().map(|w| w.id))
}

#[derive(Debug, Default)]
struct Selection {
    workspaces: Vec<Workspace>,
    current: Option<WorkspaceId>,
    restored: bool,
}

/// Workspace list and the current selection for one session.
#[derive(Debug, Default)]
pub struct WorkspaceContext {
    selection: RwLock<Selection>,
    persistence_path: Option<PathBuf>,
}

impl WorkspaceContext {
    /// Selection kept in memory only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection persisted to a JSON file at `path`.
    pub fn persisted(path: impl Into<PathBuf>) -> Self {
        Self {
            selection: RwLock::default(),
            persistence_path: Some(path.into()),
        }
    }

    pub fn workspaces(&self) -> Vec<Workspace> {
        self.read(|s| s.workspaces.clone())
    }

    pub fn current(&self) -> Option<Workspace> {
        self.read(|s| {
            s.current
                .and_then(|id| s.workspaces.iter().find(|w| w.id == id).cloned())
        })
    }

    pub fn require_current(&self) -> FintraResult<Workspace> {
        self.current().ok_or_else(|| SyncError::NoWorkspace.into())
    }

    /// The signed-in user's role in the current workspace.
    pub fn current_role(&self) -> Option<MemberRole> {
        self.current().map(|w| w.role)
    }

    /// Replace the list and re-run selection. Returns the new current workspace.
    pub fn apply_list(&self, workspaces: Vec<Workspace>) -> Option<Workspace> {
        let stored = {
            let needs_restore = self.read(|s| !s.restored);
            if needs_restore {
                self.load_persisted()
            } else {
                self.read(|s| s.current)
            }
        };

        let chosen = select_workspace(&workspaces, stored);
        {
            let mut selection = self.selection.write().unwrap_or_else(|e| e.into_inner());
            selection.workspaces = workspaces;
            selection.current = chosen;
            selection.restored = true;
        }
        self.persist(chosen);
        tracing::info!(
            workspace_id = ?chosen,
            count = self.read(|s| s.workspaces.len()),
            "workspace list loaded"
        );
        self.current()
    }

    /// Make `workspace_id` current. Only listed workspaces are accepted.
    pub fn switch(&self, workspace_id: WorkspaceId) -> FintraResult<Workspace> {
        let workspace = {
            let mut selection = self.selection.write().unwrap_or_else(|e| e.into_inner());
            let Some(workspace) = selection
                .workspaces
                .iter()
                .find(|w| w.id == workspace_id)
                .cloned()
            else {
                return Err(SyncError::UnknownWorkspace { workspace_id }.into());
            };
            selection.current = Some(workspace_id);
            workspace
        };
        self.persist(Some(workspace_id));
        tracing::info!(%workspace_id, name = %workspace.name, "switched workspace");
        Ok(workspace)
    }

    fn read<T>(&self, f: impl FnOnce(&Selection) -> T) -> T {
        f(&self.selection.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn load_persisted(&self) -> Option<WorkspaceId> {
        let path = self.persistence_path.as_deref()?;
        match persistence::load(path) {
            Ok(state) => state.and_then(|s| s.selected_workspace_id),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable workspace selection");
                None
            }
        }
    }

    fn persist(&self, selected: Option<WorkspaceId>) {
        let Some(path) = self.persistence_path.as_deref() else {
            return;
        };
        let state = PersistedSelection {
            selected_workspace_id: selected,
        };
        if let Err(err) = persistence::save(path, &state) {
            tracing::warn!(path = %path.display(), error = %err, "failed to persist workspace selection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintra_core::FintraError;
    use uuid::Uuid;

    fn workspace(name: &str, workspace_type: WorkspaceType, is_initial: bool) -> Workspace {
        Workspace {
            id: Uuid::now_v7(),
            name: name.to_string(),
            workspace_type,
            owner_id: Uuid::nil(),
            role: MemberRole::Admin,
            is_initial,
        }
    }

    #[test]
    fn test_select_prefers_stored() {
        let org = workspace("Org", WorkspaceType::Organization, false);
        let personal = workspace("Me", WorkspaceType::Personal, true);
        let list = vec![personal.clone(), org.clone()];
        assert_eq!(select_workspace(&list, Some(org.id)), Some(org.id));
    }

    #[test]
    fn test_select_falls_back_to_initial_personal() {
        let org = workspace("Org", WorkspaceType::Organization, false);
        let personal = workspace("Me", WorkspaceType::Personal, true);
        let list = vec![org.clone(), personal.clone()];
        assert_eq!(select_workspace(&list, Some(Uuid::now_v7())), Some(personal.id));
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let a = workspace("A", WorkspaceType::Organization, false);
        let b = workspace("B", WorkspaceType::Personal, false);
        assert_eq!(select_workspace(&[a.clone(), b], None), Some(a.id));
        assert_eq!(select_workspace(&[], None), None);
    }

    #[test]
    fn test_switch_rejects_unknown() {
        let context = WorkspaceContext::new();
        context.apply_list(vec![workspace("Me", WorkspaceType::Personal, true)]);
        let unknown = Uuid::now_v7();
        let err = context.switch(unknown).unwrap_err();
        assert_eq!(
            err,
            FintraError::from(SyncError::UnknownWorkspace {
                workspace_id: unknown
            })
        );
    }

    #[test]
    fn test_selection_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        let personal = workspace("Me", WorkspaceType::Personal, true);
        let org = workspace("Org", WorkspaceType::Organization, false);
        let list = vec![personal.clone(), org.clone()];

        let first = WorkspaceContext::persisted(&path);
        assert_eq!(first.apply_list(list.clone()).unwrap().id, personal.id);
        first.switch(org.id).unwrap();

        let second = WorkspaceContext::persisted(&path);
        assert_eq!(second.apply_list(list).unwrap().id, org.id);
        assert_eq!(second.current_role(), Some(MemberRole::Admin));
    }

    #[test]
    fn test_require_current_without_list() {
        let context = WorkspaceContext::new();
        assert_eq!(
            context.require_current().unwrap_err(),
            FintraError::from(SyncError::NoWorkspace)
        );
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn workspaces_strategy() -> impl Strategy<Value = Vec<Workspace>> {
        prop::collection::vec((any::<bool>(), any::<bool>()), 0..6).prop_map(|flags| {
            flags
                .into_iter()
                .enumerate()
                .map(|(i, (personal, is_initial))| Workspace {
                    id: Uuid::from_u128(i as u128 + 1),
                    name: format!("ws-{i}"),
                    workspace_type: if personal {
                        WorkspaceType::Personal
                    } else {
                        WorkspaceType::Organization
                    },
                    owner_id: Uuid::nil(),
                    role: MemberRole::Member,
                    is_initial,
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: selection always lands on a listed workspace, and only an empty list yields none.
        #[test]
        fn prop_selection_is_listed(list in workspaces_strategy(), stored in any::<Option<u8>>()) {
            let stored = stored.map(|n| Uuid::from_u128(n as u128));
            let chosen = select_workspace(&list, stored);
            prop_assert_eq!(chosen.is_none(), list.is_empty());
            if let Some(id) = chosen {
                prop_assert!(list.iter().any(|w| w.id == id));
            }
        }
    }
}
