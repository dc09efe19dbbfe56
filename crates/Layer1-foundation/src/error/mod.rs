//! Error types for Relay
//!
//! All errors are managed centrally.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Relay error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Submission
    // ========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // Registry
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    // ========================================================================
    // Execution
    // ========================================================================
    #[error("Task error: {0}")]
    Task(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Overloaded: {0}")]
    Overloaded(String),

    // ========================================================================
    // External error conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Misc
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check whether the error is transient and worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Timeout(_) | Error::Overloaded(_))
    }

    /// Check whether the error is safe to show to a client
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::Validation(_) | Error::Overloaded(_)
        )
    }

    /// InvalidTransition construction helper
    pub fn invalid_transition(from: &'static str, to: &'static str) -> Self {
        Error::InvalidTransition { from, to }
    }
}

// ============================================================================
// From implementations (extra conversions)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
