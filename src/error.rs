//! Error types for the significance engine

use thiserror::Error;

/// Errors raised by pattern construction, exact arithmetic and the estimators
#[derive(Error, Debug)]
pub enum SigError {
    #[error("Duplicates in pattern: {pattern}")]
    DuplicateSymbol { pattern: String },

    #[error("Pattern must contain at least one symbol")]
    EmptyPattern,

    #[error("Cannot factorize {0}: input must be a positive integer")]
    InvalidFactorizationInput(u64),

    #[error("Degenerate distribution for pattern '{pattern}': no sequence with non-zero occurrence probability")]
    DegenerateDistribution { pattern: String },

    #[error("No patterns to calibrate")]
    NoPatterns,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the significance engine
pub type Result<T> = std::result::Result<T, SigError>;
