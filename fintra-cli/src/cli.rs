use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "fintra")]
#[command(about = "Browse and refresh Fintra workspaces")]
#[command(version)]
pub struct Cli {
    /// Config file (falls back to FINTRA_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List workspaces, marking the current one
    Workspaces,
    /// Make a workspace current
    Switch { workspace_id: Uuid },
    /// Load one page for the current workspace and print it
    Show { page: PageKind },
    /// Delete an expense, rolling back on failure
    DeleteExpense { expense_id: Uuid },
    /// Delete an account, rolling back on failure
    DeleteAccount { account_id: Uuid },
    /// Keep the dashboard mounted and refresh it periodically
    Watch {
        /// Seconds between refreshes
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Dashboard,
    Accounts,
    Transactions,
    Goals,
    Emis,
    Analytics,
    Budgeting,
    Members,
}
