//! Error types for folio

use thiserror::Error;

/// Main error type for folio
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("Price must be positive, got {0}")]
    InvalidPrice(f64),

    #[error("Insufficient holdings of {symbol}: requested {requested}, held {held}")]
    InsufficientHoldings {
        symbol: String,
        requested: u32,
        held: u32,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for folio operations
pub type Result<T> = std::result::Result<T, FolioError>;
