//! Command execution against a [`SyncService`].

use crate::cli::{Cli, Command, PageKind};
use crate::config::{ConfigError, FintraConfig};
use crate::error::CliError;
use crate::render;
use crate::telemetry;
use chrono::Local;
use fintra_client::RestClient;
use fintra_core::{BudgetPeriod, EntityId, NetWorthRange, WorkspaceId};
use fintra_storage::WorkspaceCache;
use fintra_sync::{
    Accounts, Analytics, Budgeting, Dashboard, Emis, Feature, Goals, Members, PageState,
    SyncService, Transactions, WorkspaceContext,
};
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Load config, install logging, run one command.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = FintraConfig::load(cli.config.as_deref())?;
    telemetry::init(&config.log)?;
    let service = build_service(&config)?;

    let mut out = std::io::stdout();
    let result = execute(&service, cli.command, &mut out).await;
    service.shutdown();
    result
}

pub fn build_service(config: &FintraConfig) -> Result<SyncService, CliError> {
    let remote = RestClient::new(&config.client).map_err(ConfigError::from)?;
    Ok(SyncService::new(
        Arc::new(remote),
        WorkspaceCache::in_memory(),
        WorkspaceContext::persisted(config.persistence_path.clone()),
        config.sync.clone(),
    ))
}

/// Run one command. `Watch` runs until the process is interrupted.
pub async fn execute<W: Write>(
    service: &SyncService,
    command: Command,
    out: &mut W,
) -> Result<(), CliError> {
    service.fetch_workspaces().await?;

    match command {
        Command::Workspaces => {
            let current = service.workspaces().current().map(|w| w.id);
            render::workspaces(&service.workspaces().workspaces(), current, out)?;
        }
        Command::Switch { workspace_id } => switch(service, workspace_id, out)?,
        Command::Show { page } => show(service, page, out).await?,
        Command::DeleteExpense { expense_id } => delete_expense(service, expense_id, out).await?,
        Command::DeleteAccount { account_id } => delete_account(service, account_id, out).await?,
        Command::Watch { interval_secs } => {
            let stop = async { tokio::signal::ctrl_c().await.map_err(CliError::Signal) };
            watch(service, Duration::from_secs(interval_secs.max(1)), out, stop).await?;
        }
    }
    Ok(())
}

fn switch<W: Write>(
    service: &SyncService,
    workspace_id: WorkspaceId,
    out: &mut W,
) -> Result<(), CliError> {
    let workspace = service.switch_workspace(workspace_id)?;
    writeln!(out, "Switched to {} ({})", workspace.name, workspace.id)?;
    Ok(())
}

/// Load `feature` once and hand back its state, failing when nothing loaded.
async fn load_page<F: Feature>(
    service: &SyncService,
    feature: F,
) -> Result<PageState<F::Snapshot>, CliError> {
    let page = service.page(feature)?;
    page.load(false).await;
    let state = page.state();
    if state.data.is_none() {
        let message = state
            .fetch_error
            .as_ref()
            .map(|e| e.message().to_string())
            .unwrap_or_else(|| "no data".to_string());
        return Err(CliError::Load {
            page: F::NAME,
            message,
        });
    }
    Ok(state)
}

async fn show_page<F, W, R>(
    service: &SyncService,
    feature: F,
    out: &mut W,
    render: R,
) -> Result<(), CliError>
where
    F: Feature,
    W: Write,
    R: FnOnce(&F::Snapshot, &mut W) -> std::io::Result<()>,
{
    let state = load_page(service, feature).await?;
    if let Some(data) = &state.data {
        render(data, out)?;
    }
    render::status(&state, out)?;
    Ok(())
}

async fn show<W: Write>(service: &SyncService, page: PageKind, out: &mut W) -> Result<(), CliError> {
    let today = Local::now().date_naive();
    match page {
        PageKind::Dashboard => show_page(service, Dashboard, out, render::dashboard).await,
        PageKind::Accounts => show_page(service, Accounts, out, render::accounts).await,
        PageKind::Transactions => {
            show_page(service, Transactions, out, render::transactions).await
        }
        PageKind::Goals => show_page(service, Goals, out, render::goals).await,
        PageKind::Emis => show_page(service, Emis, out, render::emis).await,
        PageKind::Analytics => {
            let feature = Analytics {
                range: NetWorthRange::trailing_year(today),
            };
            show_page(service, feature, out, render::analytics).await
        }
        PageKind::Budgeting => {
            let feature = Budgeting {
                period: BudgetPeriod::containing(today),
            };
            show_page(service, feature, out, render::budgeting).await
        }
        PageKind::Members => show_page(service, Members, out, render::members).await,
    }
}

async fn delete_expense<W: Write>(
    service: &SyncService,
    expense_id: EntityId,
    out: &mut W,
) -> Result<(), CliError> {
    let page = service.page(Transactions)?;
    page.load(false).await;
    page.delete_expense(expense_id).await?;
    writeln!(out, "Deleted expense {expense_id}")?;
    Ok(())
}

async fn delete_account<W: Write>(
    service: &SyncService,
    account_id: EntityId,
    out: &mut W,
) -> Result<(), CliError> {
    let page = service.page(Accounts)?;
    page.load(false).await;
    page.delete_account(account_id).await?;
    writeln!(out, "Deleted account {account_id}")?;
    Ok(())
}

/// Mount the dashboard, bump the refresh signal every `interval`, and print
/// each committed revision until `stop` resolves. An error from `stop` ends
/// the watch with that error.
pub async fn watch<W: Write>(
    service: &SyncService,
    interval: Duration,
    out: &mut W,
    stop: impl Future<Output = Result<(), CliError>>,
) -> Result<(), CliError> {
    if service.workspaces().current().is_none() {
        service.fetch_workspaces().await?;
    }
    let handle = service.mount(Dashboard)?;
    let mut state_rx = handle.subscribe();

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the mount already loads.
    ticker.tick().await;

    tokio::pin!(stop);
    let mut printed = 0;
    let mut last_error = None;
    let stopped = loop {
        tokio::select! {
            stopped = &mut stop => break stopped,
            _ = ticker.tick() => {
                service.bump_refresh();
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let state = state_rx.borrow_and_update().clone();
                if state.revision > printed {
                    printed = state.revision;
                    if let Some(data) = &state.data {
                        let totals = data.totals();
                        writeln!(
                            out,
                            "[rev {}] net worth {:.2} across {} accounts",
                            state.revision,
                            totals.net_worth(),
                            data.accounts.len()
                        )?;
                    }
                }
                let error = state.fetch_error.as_ref().map(|e| e.message().to_string());
                if error != last_error {
                    if let Some(message) = &error {
                        writeln!(out, "! {message}")?;
                    }
                    last_error = error;
                }
            }
        }
    };

    handle.unmount();
    if let Err(err) = &stopped {
        tracing::warn!(error = %err, "watch aborted");
    }
    tracing::info!(revisions = printed, "watch stopped");
    stopped
}
