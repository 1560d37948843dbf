//! Error type definitions.
//!
//! This module defines the error taxonomy used throughout the crate. The
//! split matters for retry behavior: transport and validation failures are
//! transient and consume retry budget, usage errors are programming mistakes
//! and surface immediately.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors produced by the pool, retry runner, and request primitive.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Invalid configuration passed by the caller (unsupported method, empty
    /// URL, zero concurrency limit). Surfaced immediately, never retried.
    #[error("invalid usage: {0}")]
    Usage(String),

    /// The underlying transport failed: connection error, timeout, or abort.
    /// Retried up to the attempt budget.
    #[error("transport failure: {0}")]
    Transport(#[from] ReqwestError),

    /// A successfully received response failed application-level validation.
    /// Counts against the retry budget exactly like a transport failure.
    #[error("response validation failed: {0}")]
    Validation(String),

    /// A pooled task panicked. Recorded at the task's slot in the result
    /// sequence; sibling tasks are unaffected.
    #[error("task panicked: {0}")]
    TaskPanic(String),
}

impl FetchError {
    /// Whether this error is transient and worth re-attempting.
    ///
    /// Transport and validation failures might succeed on retry; usage errors
    /// and panics will not.
    pub fn is_retriable(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_not_retriable() {
        let err = FetchError::Usage("unsupported method: PUT".into());
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_validation_error_retriable() {
        let err = FetchError::Validation("missing title".into());
        assert!(err.is_retriable());
    }

    #[test]
    fn test_task_panic_not_retriable() {
        let err = FetchError::TaskPanic("worker panicked".into());
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_error_display_includes_reason() {
        let err = FetchError::Usage("request URL must not be empty".into());
        assert!(err.to_string().contains("request URL must not be empty"));
    }
}
