//! # Structured Error Handling
//!
//! Errors surfaced by the chain engine itself. Failures raised inside a step's
//! own computation are never translated into these; they propagate on whatever
//! thread is running the step.

use std::time::Duration;

/// Errors produced by the chain engine, its future handles and its configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// A carried value reached a step declaring a different parameter type
    #[error("Type mismatch: step expected {expected}, chain carried {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The job backing a future handle was dropped before producing a value
    #[error("Execution abandoned before producing a result")]
    Abandoned,

    /// Waiting on a future handle exceeded the caller's limit
    #[error("Timed out after {0:?} waiting for a result")]
    Timeout(Duration),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A worker thread could not be started
    #[error("Failed to spawn thread: {0}")]
    Spawn(String),
}

impl ChainError {
    pub(crate) fn type_mismatch<T>(found: &'static str) -> Self {
        ChainError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found,
        }
    }
}

impl From<config::ConfigError> for ChainError {
    fn from(error: config::ConfigError) -> Self {
        ChainError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ChainError::type_mismatch::<u64>("placeholder");
        assert_eq!(
            error.to_string(),
            "Type mismatch: step expected u64, chain carried placeholder"
        );
        assert_eq!(
            ChainError::Configuration("bad interval".to_string()).to_string(),
            "Configuration error: bad interval"
        );
    }
}
