//! Error types for Reagent

use thiserror::Error;

/// Result type alias using Reagent's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error categories, matching how tool failures are reported
/// back to the reasoning loop as observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or disallowed input
    Validation,
    /// Missing file, unit pair, tool, or method
    NotFound,
    /// Path or operation outside the permitted boundary
    Denied,
    /// Evaluation failure (division by zero, non-finite result, ...)
    Computation,
    /// HTTP/subprocess/IO failure
    Transport,
    /// Configuration or internal fault
    Internal,
}

/// Main error type for Reagent
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Access outside the permitted directory or capability
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Expression evaluation error
    #[error("Calculation error: {0}")]
    Calc(#[from] crate::calc::CalcError),

    /// Unit conversion error
    #[error("Conversion error: {0}")]
    Unit(#[from] crate::units::UnitError),

    /// Subprocess/stdio connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error onto the reporting taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidInput(_) | Error::Json(_) => ErrorCategory::Validation,
            Error::NotFound(_) => ErrorCategory::NotFound,
            Error::AccessDenied(_) => ErrorCategory::Denied,
            Error::Calc(_) | Error::Unit(_) => ErrorCategory::Computation,
            Error::Http(_) | Error::Connection(_) | Error::Io(_) => ErrorCategory::Transport,
            Error::Config(_)
            | Error::Provider(_)
            | Error::Database(_)
            | Error::Env(_)
            | Error::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Check if error is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::Denied
        )
    }
}
