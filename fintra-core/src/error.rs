//! Error types for Fintra operations

use thiserror::Error;
use uuid::Uuid;

/// Failures reported by, or while talking to, the remote data service.
///
/// The `Display` output of `Rejected` and `Transport` is the server or
/// transport message verbatim, so it can be shown to the user unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("{message}")]
    Rejected { operation: String, message: String },

    #[error("{message}")]
    Transport { operation: String, message: String },

    #[error("HTTP {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

impl RemoteError {
    pub fn rejected(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Name of the table read or RPC that failed.
    pub fn operation(&self) -> &str {
        match self {
            Self::Rejected { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::InvalidResponse { operation, .. } => operation,
        }
    }
}

/// Errors raised by the synchronization layer itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// One read of a page batch failed; the whole batch is discarded.
    #[error("{label}: {source}")]
    Fetch { label: String, source: RemoteError },

    #[error("{feature} timed out after {after_ms}ms")]
    Timeout { feature: String, after_ms: u64 },

    #[error("{feature} load was cancelled")]
    Cancelled { feature: String },

    #[error("No workspace selected")]
    NoWorkspace,

    #[error("Unknown workspace: {workspace_id}")]
    UnknownWorkspace { workspace_id: Uuid },

    #[error("Workspace {workspace_id} is not an organization workspace")]
    RequiresOrganization { workspace_id: Uuid },

    #[error("No data loaded for {feature}")]
    NotLoaded { feature: String },
}

/// Validation errors for write payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Fintra errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FintraError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl FintraError {
    /// Text suitable for an error banner. Remote messages pass through verbatim.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// True when the failure came from the remote service rather than local checks.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote(_) | Self::Sync(SyncError::Fetch { .. } | SyncError::Timeout { .. })
        )
    }
}

/// Result type alias for Fintra operations.
pub type FintraResult<T> = Result<T, FintraError>;

// =============================================================================
// TESTS
// =============================================================================
