//! The sync service: one owner for the remote, cache, refresh signal and
//! workspace selection, handed to every page explicitly.

use crate::config::SyncConfig;
use crate::features::Feature;
use crate::handle::PageHandle;
use crate::page::PageSync;
use crate::refresh::RefreshSignal;
use crate::workspace::WorkspaceContext;
use fintra_client::RemoteDataService;
use fintra_core::{
    EntityId, FintraResult, SyncError, ValidationError, Workspace, WorkspaceId, WorkspaceType,
};
use fintra_storage::WorkspaceCache;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

struct Inner {
    remote: Arc<dyn RemoteDataService>,
    cache: WorkspaceCache,
    refresh: RefreshSignal,
    workspaces: WorkspaceContext,
    config: SyncConfig,
    shutdown: CancellationToken,
}

#[derive(Clone)]
pub struct SyncService {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService")
            .field("cache", &self.inner.cache)
            .field("refresh", &self.inner.refresh.current())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl SyncService {
    pub fn new(
        remote: Arc<dyn RemoteDataService>,
        cache: WorkspaceCache,
        workspaces: WorkspaceContext,
        config: SyncConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                remote,
                cache,
                refresh: RefreshSignal::new(),
                workspaces,
                config,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn remote(&self) -> &Arc<dyn RemoteDataService> {
        &self.inner.remote
    }

    pub fn cache(&self) -> &WorkspaceCache {
        &self.inner.cache
    }

    pub fn refresh(&self) -> &RefreshSignal {
        &self.inner.refresh
    }

    pub fn workspaces(&self) -> &WorkspaceContext {
        &self.inner.workspaces
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    /// Trigger a forced reload on every mounted, loaded page.
    pub fn bump_refresh(&self) -> u64 {
        self.inner.refresh.bump()
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Unmounted page for the current workspace. Loads run only when called.
    pub fn page<F: Feature>(&self, feature: F) -> FintraResult<Arc<PageSync<F>>> {
        let workspace = self.inner.workspaces.require_current()?;
        Ok(Arc::new(PageSync::new(
            feature,
            workspace,
            Arc::clone(&self.inner.remote),
            self.inner.cache.clone(),
            self.inner.config.fetch_timeout(),
            self.inner.shutdown.child_token(),
        )))
    }

    /// Mount a page: start its initial load and its refresh listener.
    pub fn mount<F: Feature>(&self, feature: F) -> FintraResult<PageHandle<F>> {
        let page = self.page(feature)?;
        Ok(PageHandle::mount(page, &self.inner.refresh))
    }

    // ------------------------------------------------------------------
    // Workspaces
    // ------------------------------------------------------------------

    /// Reload the workspace list and re-apply selection.
    pub async fn fetch_workspaces(&self) -> FintraResult<Option<Workspace>> {
        let list = self.inner.remote.get_workspaces().await?;
        Ok(self.inner.workspaces.apply_list(list))
    }

    pub fn switch_workspace(&self, workspace_id: WorkspaceId) -> FintraResult<Workspace> {
        self.inner.workspaces.switch(workspace_id)
    }

    /// Create a workspace and make it current.
    pub async fn create_workspace(
        &self,
        name: &str,
        workspace_type: WorkspaceType,
    ) -> FintraResult<Workspace> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "name".to_string(),
            }
            .into());
        }
        let workspace_id = self
            .inner
            .remote
            .create_workspace(name, workspace_type)
            .await?;
        self.fetch_workspaces().await?;
        self.switch_workspace(workspace_id)
    }

    /// Delete a workspace and every cached snapshot it owned.
    pub async fn delete_workspace(&self, workspace_id: WorkspaceId) -> FintraResult<Option<Workspace>> {
        self.inner.remote.delete_workspace(workspace_id).await?;
        let removed = self.inner.cache.invalidate_workspace(workspace_id);
        tracing::info!(%workspace_id, cache_entries_removed = removed, "workspace deleted");
        self.fetch_workspaces().await
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Share an account with a set of workspaces, then refresh every page.
    pub async fn share_account(
        &self,
        account_id: EntityId,
        workspace_ids: &[WorkspaceId],
    ) -> FintraResult<()> {
        let known = self.inner.workspaces.workspaces();
        if let Some(unknown) = workspace_ids
            .iter()
            .find(|id| !known.iter().any(|w| w.id == **id))
        {
            return Err(SyncError::UnknownWorkspace {
                workspace_id: *unknown,
            }
            .into());
        }
        self.inner
            .remote
            .share_account_with_workspaces(account_id, workspace_ids)
            .await?;
        self.bump_refresh();
        Ok(())
    }

    /// Cancel every page load started through this service.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}
