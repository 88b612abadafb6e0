//! Error types for the media ingester.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media ingester.
#[derive(Error, Debug)]
pub enum Error {
    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Column '{column}' missing from {table} row")]
    MissingColumn { table: String, column: String },

    #[error("Stored data for {0} is not valid UTF-8")]
    InvalidEncoding(String),

    // Ingestion errors
    #[error("Cannot resolve an empty name in {0}")]
    EmptyName(String),

    #[error("Invalid scraped item: {0}")]
    InvalidItem(String),

    #[error("Cover download failed: {0}")]
    CoverDownload(String),

    // Config errors
    #[error("Invalid config file: {0}")]
    InvalidConfig(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
