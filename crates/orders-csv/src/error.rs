//! Error types for the CSV emitter.

use order_generator::GeneratorError;
use thiserror::Error;

/// Errors that can occur while writing or reading order CSV files.
#[derive(Error, Debug)]
pub enum CsvOrderError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error in a nested column.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Order generation failed.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// A column holds a value that cannot be parsed.
    #[error("Invalid value for '{field}': {value}")]
    InvalidField { field: &'static str, value: String },
}
