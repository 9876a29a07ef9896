//! Error types for the expense ledger.

use crate::split::Strategy;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while recording expenses or driving the CLI.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Payer or split participant is not registered
    #[error("Unknown participant: {id}")]
    UnknownParticipant { id: String },

    /// Split batch failed strategy validation
    #[error("Invalid {strategy} split: {source}")]
    InvalidSplit {
        strategy: Strategy,
        #[source]
        source: SplitError,
    },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed input row
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: expense-ledger <input.csv> [participant-id]")]
    MissingArgument,
}

/// Why a batch of splits was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("expense has no splits")]
    NoSplits,

    #[error("total amount must be positive, got {0}")]
    NonPositiveTotal(f64),

    #[error("split for participant {participant} is missing its declared value")]
    MissingValue { participant: String },

    #[error("split for participant {participant} has invalid declared value {value}")]
    InvalidValue { participant: String, value: f64 },

    #[error("split for participant {participant} resolves to a non-finite amount")]
    NonFiniteAmount { participant: String },

    /// Declared amounts (or percentages) do not add up.
    #[error("declared values sum to {actual}, expected {expected}")]
    SumMismatch { expected: f64, actual: f64 },
}

impl LedgerError {
    pub(crate) fn unknown_participant(id: &str) -> Self {
        LedgerError::UnknownParticipant { id: id.to_string() }
    }
}
