use rust_decimal::Decimal;
use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid record on row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("Amount {0} must not be negative")]
    NegativeAmount(Decimal),
    #[error("Amount {0} is out of range")]
    AmountOutOfRange(Decimal),
}

/// Failures raised while loading or saving the tracker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Data directory could not be resolved")]
    MissingDataDir,
}
