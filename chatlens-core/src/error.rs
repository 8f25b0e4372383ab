//! Error types for chatlens-core

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the chatlens-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A `date` field that does not match `YYYY-MM-DDTHH:MM:SS`
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A required message field is absent
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Date range where the start lies after the end
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Aggregation window of zero days
    #[error("invalid period length: must be at least one day")]
    InvalidPeriod,

    /// No usable messages (missing, malformed or empty export)
    #[error("no messages: {0}")]
    EmptyInput(String),

    /// Out-of-range analysis option
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error means "nothing to show" rather than a caller mistake.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::EmptyInput(_))
    }
}

/// Result type alias for chatlens-core
pub type Result<T> = std::result::Result<T, Error>;
