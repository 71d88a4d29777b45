//! Per-page read batches and write operations.
//!
//! A [`Feature`] names a page's cache key and the reads it needs. The write
//! operations for each page are inherent methods on
//! [`PageSync`](crate::PageSync) of that feature.

mod accounts;
mod analytics;
mod budgeting;
mod dashboard;
mod emis;
mod goals;
mod members;
mod transactions;

pub use accounts::{Accounts, AccountsSnapshot};
pub use analytics::{Analytics, AnalyticsSnapshot};
pub use budgeting::{Budgeting, BudgetingSnapshot};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use emis::{EmiSnapshot, Emis};
pub use goals::{Goals, GoalsSnapshot};
pub use members::{Members, MembersSnapshot};
pub use transactions::{Transactions, TransactionsSnapshot};

use async_trait::async_trait;
use fintra_client::{RemoteDataService, RemoteResult};
use fintra_core::{FintraResult, SyncError, Workspace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::future::Future;

#[async_trait]
pub trait Feature: Send + Sync + 'static {
    type Snapshot: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Cache feature key, e.g. `fintra_accounts_data`.
    const KEY: &'static str;

    /// Human name used in logs and timeout messages.
    const NAME: &'static str;

    /// Feature part of this page's cache key. Pages that take a parameter
    /// append it, so one month or range never paints another's snapshot.
    fn cache_feature(&self) -> String {
        Self::KEY.to_string()
    }

    /// Issue every read the page needs as one batch. Any failure fails the
    /// whole batch.
    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<Self::Snapshot>;
}

/// Tag a remote read with the panel it feeds, e.g. `"Accounts: offline"`.
pub(crate) async fn labelled<T>(
    label: &'static str,
    read: impl Future<Output = RemoteResult<T>>,
) -> FintraResult<T> {
    read.await.map_err(|source| {
        SyncError::Fetch {
            label: label.to_string(),
            source,
        }
        .into()
    })
}

/// Current snapshot of `page`, or `NotLoaded` before the first load lands.
pub(crate) fn loaded<F: Feature>(page: &crate::PageSync<F>) -> FintraResult<F::Snapshot> {
    page.state().data.ok_or_else(|| {
        SyncError::NotLoaded {
            feature: F::NAME.to_string(),
        }
        .into()
    })
}

/// Remove an expense locally and hand its amount back to the paying account.
pub(crate) fn drop_expense(
    expenses: &mut Vec<fintra_core::Expense>,
    accounts: &mut [fintra_core::Account],
    expense_id: fintra_core::EntityId,
) {
    let Some(pos) = expenses.iter().position(|e| e.id == expense_id) else {
        return;
    };
    let expense = expenses.remove(pos);
    if let Some(account) = expense
        .account_id
        .and_then(|id| accounts.iter_mut().find(|a| a.id == id))
    {
        if account.is_liability() {
            account.balance -= expense.amount;
        } else {
            account.balance += expense.amount;
        }
    }
}

/// Remove a top-up locally and take its amount back off the account.
pub(crate) fn drop_top_up(
    top_ups: &mut Vec<fintra_core::TopUp>,
    accounts: &mut [fintra_core::Account],
    top_up_id: fintra_core::EntityId,
) {
    let Some(pos) = top_ups.iter().position(|t| t.id == top_up_id) else {
        return;
    };
    let top_up = top_ups.remove(pos);
    if let Some(account) = accounts.iter_mut().find(|a| a.id == top_up.account_id) {
        account.balance -= top_up.amount;
    }
}
