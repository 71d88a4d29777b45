//! Fintra CLI entry point.

use clap::Parser;
use fintra_cli::cli::Cli;
use fintra_cli::commands;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fintra: {err}");
            ExitCode::FAILURE
        }
    }
}
