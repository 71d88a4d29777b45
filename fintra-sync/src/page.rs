//! Fetch orchestration for one page in one workspace.
//!
//! `load(false)` paints from cache when it can and always revalidates;
//! `load(true)` skips the cache and keeps the current data on screen. Each
//! load takes a [`Generation`]; only the latest generation may commit, so a
//! slow response can never overwrite a newer one.

use crate::features::Feature;
use crate::generation::{Generation, GenerationCounter};
use crate::state::{Banner, DataSource, PageError, PageState};
use chrono::Utc;
use fintra_client::RemoteDataService;
use fintra_core::{FintraError, FintraResult, SyncError, Workspace};
use fintra_storage::{WorkspaceCache, WorkspaceScopedKey};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// How a single [`PageSync::load`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fresh snapshot written to cache and state.
    Committed,
    /// A newer load started first; nothing was written.
    Superseded,
    /// The batch failed; the page carries a fetch error.
    Failed,
    /// The page was unmounted mid-flight; nothing was written.
    Cancelled,
}

pub struct PageSync<F: Feature> {
    feature: F,
    workspace: Workspace,
    key: WorkspaceScopedKey,
    remote: Arc<dyn RemoteDataService>,
    cache: WorkspaceCache,
    state: watch::Sender<PageState<F::Snapshot>>,
    generations: GenerationCounter,
    cancel: CancellationToken,
    fetch_timeout: Duration,
    initial_loaded: AtomicBool,
}

impl<F: Feature> std::fmt::Debug for PageSync<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSync")
            .field("feature", &F::NAME)
            .field("key", &self.key)
            .field("generation", &self.generations.latest())
            .finish()
    }
}

impl<F: Feature> PageSync<F> {
    pub fn new(
        feature: F,
        workspace: Workspace,
        remote: Arc<dyn RemoteDataService>,
        cache: WorkspaceCache,
        fetch_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _rx) = watch::channel(PageState::default());
        Self {
            key: WorkspaceScopedKey::new(feature.cache_feature(), workspace.id),
            feature,
            workspace,
            remote,
            cache,
            state,
            generations: GenerationCounter::new(),
            cancel,
            fetch_timeout,
            initial_loaded: AtomicBool::new(false),
        }
    }

    pub fn feature(&self) -> &F {
        &self.feature
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn key(&self) -> &WorkspaceScopedKey {
        &self.key
    }

    pub(crate) fn remote(&self) -> &dyn RemoteDataService {
        self.remote.as_ref()
    }

    pub(crate) fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Current state, cloned.
    pub fn state(&self) -> PageState<F::Snapshot> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<F::Snapshot>> {
        self.state.subscribe()
    }

    /// True once the first load has finished, successfully or not.
    pub fn is_initial_loaded(&self) -> bool {
        self.initial_loaded.load(Ordering::SeqCst)
    }

    /// Wait until `predicate` holds for the page state and return it.
    pub async fn wait_until(
        &self,
        mut predicate: impl FnMut(&PageState<F::Snapshot>) -> bool,
    ) -> PageState<F::Snapshot> {
        let mut rx = self.state.subscribe();
        let result = rx.wait_for(|state| predicate(state)).await.map(|s| s.clone());
        match result {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    pub fn dismiss_banner(&self) {
        self.state.send_if_modified(|state| state.banner.take().is_some());
    }

    /// Load the page's snapshot.
    pub async fn load(&self, forced: bool) -> LoadOutcome {
        if forced {
            self.state.send_modify(|state| {
                if state.data.is_some() {
                    state.refreshing = true;
                } else {
                    state.loading = true;
                }
            });
        } else {
            self.hydrate_from_cache();
        }

        let generation = self.generations.next();
        tracing::debug!(
            feature = F::NAME,
            workspace_id = %self.workspace.id,
            generation = generation.sequence(),
            forced,
            "page load started"
        );
        let result = self.fetch_guarded().await;
        self.commit(generation, result)
    }

    fn hydrate_from_cache(&self) {
        match self.cache.read::<F::Snapshot>(&self.key) {
            Some(hit) => {
                tracing::debug!(
                    feature = F::NAME,
                    key = %self.key,
                    staleness_ms = u64::try_from(hit.staleness().as_millis()).unwrap_or(u64::MAX),
                    "painting page from cache"
                );
                let cached_at = hit.cached_at();
                let snapshot = hit.into_value();
                self.state.send_modify(|state| {
                    state.data = Some(snapshot);
                    state.source = Some(DataSource::Cache);
                    state.synced_at = Some(cached_at);
                    state.loading = false;
                });
            }
            None => {
                self.state.send_if_modified(|state| {
                    if state.data.is_some() || state.loading {
                        return false;
                    }
                    state.loading = true;
                    true
                });
            }
        }
    }

    async fn fetch_guarded(&self) -> FintraResult<F::Snapshot> {
        let fetch = self.feature.fetch(self.remote.as_ref(), &self.workspace);
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SyncError::Cancelled {
                feature: F::NAME.to_string(),
            }
            .into()),
            result = tokio::time::timeout(self.fetch_timeout, fetch) => match result {
                Ok(result) => result,
                Err(_) => Err(SyncError::Timeout {
                    feature: F::NAME.to_string(),
                    after_ms: u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
                }
                .into()),
            },
        }
    }

    fn commit(&self, generation: Generation, result: FintraResult<F::Snapshot>) -> LoadOutcome {
        if let Err(FintraError::Sync(SyncError::Cancelled { .. })) = &result {
            tracing::debug!(feature = F::NAME, generation = generation.sequence(), "page load cancelled");
            return LoadOutcome::Cancelled;
        }

        let mut outcome = LoadOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if !self.generations.is_current(generation) {
                return false;
            }
            state.loading = false;
            state.refreshing = false;
            match result {
                Ok(snapshot) => {
                    self.cache.write(&self.key, &snapshot);
                    state.data = Some(snapshot);
                    state.source = Some(DataSource::Remote);
                    state.fetch_error = None;
                    state.revision += 1;
                    state.synced_at = Some(Utc::now());
                    outcome = LoadOutcome::Committed;
                }
                Err(err) => {
                    let message = err.user_message();
                    tracing::warn!(
                        feature = F::NAME,
                        workspace_id = %self.workspace.id,
                        error = %message,
                        "page load failed"
                    );
                    state.fetch_error = Some(if state.data.is_some() {
                        PageError::Stale(message)
                    } else {
                        PageError::Blocking(message)
                    });
                    outcome = LoadOutcome::Failed;
                }
            }
            // Before receivers wake, so anyone seeing this state also sees the flag.
            self.initial_loaded.store(true, Ordering::SeqCst);
            true
        });

        if outcome == LoadOutcome::Superseded {
            tracing::debug!(
                feature = F::NAME,
                generation = generation.sequence(),
                latest = self.generations.latest().sequence(),
                "discarded superseded page load"
            );
        }
        outcome
    }

    /// Replace the displayed snapshot without touching the cache.
    pub(crate) fn replace_data(&self, snapshot: Option<F::Snapshot>) {
        self.state.send_modify(|state| state.data = snapshot);
    }

    pub(crate) fn set_banner(&self, banner: Banner) {
        self.state.send_modify(|state| state.banner = Some(banner));
    }

    pub(crate) fn restore_data(&self, snapshot: Option<F::Snapshot>, banner: Banner) {
        self.state.send_modify(|state| {
            state.data = snapshot;
            state.banner = Some(banner);
        });
    }

    pub(crate) fn captured(&self) -> Option<F::Snapshot> {
        self.state.borrow().data.clone()
    }
}
