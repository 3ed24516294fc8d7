//! # Application Errors
//!
//! What the user sees when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError (mutation / validation)  ──┐                                │
//! │  StoreError (database / file)       ──┼──► AppError ──► stderr + exit  │
//! │  toml / argument problems           ──┘                                │
//! │                                                                         │
//! │  Exit codes: 2 for usage and config problems, 1 for everything else   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use motocash_core::CoreError;
use motocash_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A record store mutation was rejected.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Loading or saving failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Config file unreadable or invalid.
    ///
    /// ## When This Occurs
    /// - TOML syntax error in motocash.toml
    /// - Unknown backend name
    /// - Unsupported decimal separator
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A command argument could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Output could not be produced.
    #[error("Output failed: {0}")]
    Output(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Output(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Output(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Output(err.to_string())
    }
}

/// Result type for CLI operations.
pub type AppResult<T> = Result<T, AppError>;
