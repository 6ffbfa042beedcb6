//! Transaction dataset errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Failed to open transaction file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
