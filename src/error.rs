//! Error types for the transition scoring engine

use std::fmt;

/// Errors that can occur while scoring transitions
///
/// Missing optional data never produces an error; it degrades to the
/// per-dimension neutral score. Errors are reserved for inputs that break
/// the feature-record contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Invalid input (malformed feature record or preferences)
    InvalidInput(String),

    /// Numerical error that no fallback could absorb
    NumericalError(String),
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ScoringError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for ScoringError {}
