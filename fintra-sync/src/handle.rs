//! Mounted pages.
//!
//! Mounting spawns the initial load plus a listener on the refresh signal.
//! Dropping the handle cancels any in-flight load and stops the listener.

use crate::features::Feature;
use crate::page::PageSync;
use crate::refresh::RefreshSignal;
use std::ops::Deref;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct PageHandle<F: Feature> {
    page: Arc<PageSync<F>>,
    tasks: Vec<JoinHandle<()>>,
}

impl<F: Feature> PageHandle<F> {
    pub(crate) fn mount(page: Arc<PageSync<F>>, refresh: &RefreshSignal) -> Self {
        // Subscribe before spawning so bumps from here on are seen, and
        // nothing earlier is replayed.
        let refresh_rx = refresh.subscribe();

        let initial = {
            let page = Arc::clone(&page);
            tokio::spawn(async move {
                page.load(false).await;
            })
        };
        let listener = tokio::spawn(listen_for_refresh(Arc::clone(&page), refresh_rx));

        tracing::debug!(
            feature = F::NAME,
            workspace_id = %page.workspace().id,
            "page mounted"
        );
        Self {
            page,
            tasks: vec![initial, listener],
        }
    }

    pub fn page(&self) -> &Arc<PageSync<F>> {
        &self.page
    }

    /// Explicit unmount; same as dropping the handle.
    pub fn unmount(self) {}
}

async fn listen_for_refresh<F: Feature>(
    page: Arc<PageSync<F>>,
    mut refresh_rx: tokio::sync::watch::Receiver<u64>,
) {
    let cancel = page.cancel_token().clone();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = refresh_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let counter = *refresh_rx.borrow_and_update();
                if page.is_initial_loaded() {
                    tracing::debug!(feature = F::NAME, counter, "refresh triggered forced load");
                    page.load(true).await;
                } else {
                    tracing::debug!(feature = F::NAME, counter, "refresh ignored before initial load");
                }
            }
        }
    }
}

impl<F: Feature> Deref for PageHandle<F> {
    type Target = PageSync<F>;

    fn deref(&self) -> &Self::Target {
        &self.page
    }
}

impl<F: Feature> Drop for PageHandle<F> {
    fn drop(&mut self) {
        self.page.cancel_token().cancel();
        for task in &self.tasks {
            task.abort();
        }
        tracing::debug!(feature = F::NAME, "page unmounted");
    }
}
