use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Upstream returned {status} for {endpoint}")]
    UpstreamError { endpoint: String, status: u16 },

    #[error("Validation error: {0}")]
    ValidationError(String),
}
