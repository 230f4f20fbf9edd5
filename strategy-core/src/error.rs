use thiserror::Error;

/// Error types for the analytics core.
///
/// Structural problems fail fast and propagate unmodified to the caller.
/// Degenerate statistics (zero-variance returns, no invested days) are not
/// errors; the backtest defines explicit zero fallbacks for them.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("required column '{0}' is missing or empty")]
    MissingColumn(&'static str),

    #[error("column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("dates must be unique and strictly ascending")]
    UnorderedDates,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
