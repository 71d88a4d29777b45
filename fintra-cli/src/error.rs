use crate::config::ConfigError;
use fintra_core::FintraError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message())]
    Fintra(#[from] FintraError),
    #[error("{page}: {message}")]
    Load { page: &'static str, message: String },
    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),
    #[error("Failed to listen for ctrl-c: {0}")]
    Signal(std::io::Error),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
