//! Fintra Sync - Workspace-Scoped Data Synchronization
//!
//! Pages read through a cache keyed by feature and workspace, revalidate
//! against the remote, and apply writes optimistically with exact rollback.
//!
//! # Layout
//!
//! - [`SyncService`] owns the remote, cache, refresh signal and workspace
//!   selection, and mounts pages.
//! - [`PageSync`] runs `load(forced)` for one [`Feature`] in one workspace.
//! - [`optimistic_mutate`] / [`confirmed_mutate`] coordinate writes.
//! - [`RefreshSignal`] asks every mounted page to reload.

pub mod config;
pub mod features;
pub mod generation;
pub mod handle;
pub mod optimistic;
pub mod page;
pub mod persistence;
pub mod refresh;
pub mod service;
pub mod state;
pub mod workspace;

pub use config::SyncConfig;
pub use features::{
    Accounts, AccountsSnapshot, Analytics, AnalyticsSnapshot, Budgeting, BudgetingSnapshot,
    Dashboard, DashboardSnapshot, EmiSnapshot, Emis, Feature, Goals, GoalsSnapshot, Members,
    MembersSnapshot, Transactions, TransactionsSnapshot,
};
pub use generation::{Generation, GenerationCounter};
pub use handle::PageHandle;
pub use optimistic::{confirmed_mutate, optimistic_mutate, OptimisticCell};
pub use page::{LoadOutcome, PageSync};
pub use persistence::{PersistedSelection, PersistenceError};
pub use refresh::RefreshSignal;
pub use service::SyncService;
pub use state::{Banner, BannerLevel, DataSource, PageError, PageState};
pub use workspace::{select_workspace, WorkspaceContext};
