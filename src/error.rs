use thiserror::Error;

/// Top-level error type for the router agent.
///
/// Every variant here is fatal for a monitoring session. Per-cycle and
/// per-request failures are carried as [`LedgerError`] and turned into
/// logged outcomes before they can reach this level.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provided config does not include an `advanced_reclaim_config`.")]
    MissingReclaimConfig,

    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by the ledger collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Failed to query requests: {0}")]
    Query(String),

    #[error("Failed to build the transaction: {0}")]
    Build(String),

    #[error("Failed to sign or submit the transaction: {0}")]
    Submit(String),

    #[error("Ledger transport error: {0}")]
    Transport(String),

    #[error("Malformed ledger response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request reference: {0}")]
    InvalidReference(String),
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(error: validator::ValidationErrors) -> Self {
        AppError::Config(error.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Scan loop task failed: {:?}", error))
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            LedgerError::InvalidResponse(error.to_string())
        } else {
            LedgerError::Transport(error.to_string())
        }
    }
}

/// Result type alias for fatal, session-level operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for ledger collaborator calls
pub type LedgerResult<T> = Result<T, LedgerError>;
