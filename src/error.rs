use std::io;
use thiserror::Error;

/// Error type for loading data and searching for superkeys.
#[derive(Error, Debug)]
pub enum KeyError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Input had no header record.
    #[error("Empty file or no data to analyze")]
    EmptyData,

    /// A row has no value for a column that a candidate key references.
    #[error("Malformed row {row}: missing column {column:?}")]
    MalformedRow {
        /// Zero-based index of the data row.
        row: usize,
        /// The missing column name.
        column: String,
    },

    /// Invalid configuration, detected before any enumeration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The column exclusion pattern did not compile.
    #[error("Invalid exclusion pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for superkey operations.
pub type Result<T> = std::result::Result<T, KeyError>;
