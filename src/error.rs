//! Error types for the winter-trends library.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, ClimateError>;

/// Errors that can occur while extracting, fitting or forecasting a series.
///
/// Claim mismatches are not errors; they are reported as
/// [`CheckOutcome`](crate::claims::CheckOutcome) values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Fewer observations than an estimator needs.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Backtest window does not leave any training history.
    #[error("insufficient history for backtest: window {window} needs more than {len} observations")]
    InsufficientHistory { window: usize, len: usize },

    /// Requested forecasting model is not one of the known models.
    #[error("unsupported model: {0}")]
    UnknownModel(String),

    /// Column label not present in the observation table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Logical variable key not present in the configuration.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// No row, or no value, for the requested year.
    #[error("no data for year {0}")]
    MissingYear(i32),

    /// Model must be fitted before predicting.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between aligned sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Input could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for ClimateError {
    fn from(err: std::io::Error) -> Self {
        ClimateError::Io(err.to_string())
    }
}

impl From<csv::Error> for ClimateError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            ClimateError::Io(err.to_string())
        } else {
            ClimateError::Parse(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ClimateError {
    fn from(err: toml::de::Error) -> Self {
        ClimateError::Parse(err.to_string())
    }
}
