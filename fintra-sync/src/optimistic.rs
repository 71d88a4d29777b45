//! Mutation coordination.
//!
//! [`optimistic_mutate`] applies a change locally, calls the remote, then
//! either reconciles with a forced reload or puts back the exact snapshot it
//! captured and raises an error banner. [`confirmed_mutate`] is the
//! non-optimistic variant used for creates and edits: call first, reload
//! after.

use crate::features::Feature;
use crate::page::PageSync;
use crate::state::Banner;
use async_trait::async_trait;
use fintra_client::RemoteResult;
use fintra_core::FintraResult;
use std::future::Future;

/// Something holding a snapshot that a mutation can edit and roll back.
#[async_trait]
pub trait OptimisticCell: Send + Sync {
    type Snapshot: Clone + Send + Sync;

    /// Snapshot currently displayed, if any.
    fn capture(&self) -> Option<Self::Snapshot>;

    /// Display `snapshot` in place of the current one.
    fn show(&self, snapshot: Self::Snapshot);

    /// Put `snapshot` back exactly and surface `banner`.
    fn restore(&self, snapshot: Option<Self::Snapshot>, banner: Banner);

    /// Surface `banner` without touching data.
    fn notify(&self, banner: Banner);

    /// Re-read authoritative state after a successful write.
    async fn reconcile(&self);
}

/// Apply `apply` locally, run `call`, and commit or roll back.
pub async fn optimistic_mutate<C, A, Fut>(cell: &C, apply: A, call: Fut) -> FintraResult<()>
where
    C: OptimisticCell + ?Sized,
    A: FnOnce(&mut C::Snapshot),
    Fut: Future<Output = RemoteResult<()>> + Send,
{
    let before = cell.capture();
    if let Some(mut next) = before.clone() {
        apply(&mut next);
        cell.show(next);
    }

    match call.await {
        Ok(()) => {
            cell.reconcile().await;
            Ok(())
        }
        Err(err) => {
            tracing::warn!(operation = err.operation(), error = %err, "mutation failed, rolling back");
            cell.restore(before, Banner::error(err.to_string()));
            Err(err.into())
        }
    }
}

/// Run `call` and reload on success; on failure only raise a banner.
pub async fn confirmed_mutate<C, Fut>(cell: &C, call: Fut) -> FintraResult<()>
where
    C: OptimisticCell + ?Sized,
    Fut: Future<Output = RemoteResult<()>> + Send,
{
    match call.await {
        Ok(()) => {
            cell.reconcile().await;
            Ok(())
        }
        Err(err) => {
            tracing::warn!(operation = err.operation(), error = %err, "mutation failed");
            cell.notify(Banner::error(err.to_string()));
            Err(err.into())
        }
    }
}

#[async_trait]
impl<F: Feature> OptimisticCell for PageSync<F> {
    type Snapshot = F::Snapshot;

    fn capture(&self) -> Option<F::Snapshot> {
        self.captured()
    }

    fn show(&self, snapshot: F::Snapshot) {
        self.replace_data(Some(snapshot));
    }

    fn restore(&self, snapshot: Option<F::Snapshot>, banner: Banner) {
        self.restore_data(snapshot, banner);
    }

    fn notify(&self, banner: Banner) {
        self.set_banner(banner);
    }

    async fn reconcile(&self) {
        self.load(true).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintra_core::RemoteError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Cell {
        data: Mutex<Option<Vec<&'static str>>>,
        banner: Mutex<Option<Banner>>,
        reconciled: AtomicUsize,
    }

    impl Cell {
        fn with(items: Vec<&'static str>) -> Self {
            Self {
                data: Mutex::new(Some(items)),
                ..Default::default()
            }
        }

        fn data(&self) -> Option<Vec<&'static str>> {
            self.data.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OptimisticCell for Cell {
        type Snapshot = Vec<&'static str>;

        fn capture(&self) -> Option<Self::Snapshot> {
            self.data()
        }

        fn show(&self, snapshot: Self::Snapshot) {
            *self.data.lock().unwrap() = Some(snapshot);
        }

        fn restore(&self, snapshot: Option<Self::Snapshot>, banner: Banner) {
            *self.data.lock().unwrap() = snapshot;
            *self.banner.lock().unwrap() = Some(banner);
        }

        fn notify(&self, banner: Banner) {
            *self.banner.lock().unwrap() = Some(banner);
        }

        async fn reconcile(&self) {
            self.reconciled.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_success_reconciles() {
        let cell = Cell::with(vec!["a1", "a2"]);
        optimistic_mutate(&cell, |items| items.retain(|i| *i != "a2"), async { Ok(()) })
            .await
            .unwrap();

        assert_eq!(cell.data(), Some(vec!["a1"]));
        assert_eq!(cell.reconciled.load(Ordering::SeqCst), 1);
        assert!(cell.banner.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failure_restores_exact_snapshot() {
        let cell = Cell::with(vec!["a1", "a2"]);
        let err = optimistic_mutate(
            &cell,
            |items| items.retain(|i| *i != "a2"),
            async { Err(RemoteError::transport("delete_account", "network error")) },
        )
        .await
        .unwrap_err();

        assert_eq!(err.user_message(), "network error");
        assert_eq!(cell.data(), Some(vec!["a1", "a2"]));
        assert_eq!(cell.banner.lock().unwrap().as_ref().unwrap().message, "network error");
        assert_eq!(cell.reconciled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_applies_nothing_without_data() {
        let cell = Cell::default();
        optimistic_mutate(&cell, |items| items.push("x"), async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(cell.data(), None);
    }

    #[tokio::test]
    async fn test_confirmed_failure_keeps_data() {
        let cell = Cell::with(vec!["a1"]);
        let result = confirmed_mutate(&cell, async {
            Err(RemoteError::rejected("add_expense", "Insufficient balance"))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(cell.data(), Some(vec!["a1"]));
        assert_eq!(
            cell.banner.lock().unwrap().as_ref().unwrap().message,
            "Insufficient balance"
        );
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use fintra_core::RemoteError;
    use proptest::prelude::*;
    use std::sync::Mutex;

    struct Cell(Mutex<Option<Vec<u32>>>);

    #[async_trait]
    impl OptimisticCell for Cell {
        type Snapshot = Vec<u32>;

        fn capture(&self) -> Option<Vec<u32>> {
            self.0.lock().unwrap().clone()
        }

        fn show(&self, snapshot: Vec<u32>) {
            *self.0.lock().unwrap() = Some(snapshot);
        }

        fn restore(&self, snapshot: Option<Vec<u32>>, _banner: Banner) {
            *self.0.lock().unwrap() = snapshot;
        }

        fn notify(&self, _banner: Banner) {}

        async fn reconcile(&self) {}
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: a failed optimistic delete leaves the collection exactly as it was.
        #[test]
        fn prop_rollback_is_exact(
            items in prop::collection::vec(any::<u32>(), 0..20),
            pick in any::<prop::sample::Index>(),
        ) {
            let cell = Cell(Mutex::new(Some(items.clone())));
            let target = if items.is_empty() { 0 } else { items[pick.index(items.len())] };
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

            let result = runtime.block_on(optimistic_mutate(
                &cell,
                |snapshot| snapshot.retain(|v| *v != target),
                async { Err(RemoteError::transport("delete", "offline")) },
            ));

            prop_assert!(result.is_err());
            prop_assert_eq!(cell.capture(), Some(items));
        }
    }
}
