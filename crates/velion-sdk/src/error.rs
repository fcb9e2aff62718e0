//! Error types for the Velion SDK

use thiserror::Error;

/// Errors that can occur when talking to the gateway
#[derive(Error, Debug)]
pub enum SdkError {
    /// Upload rejected locally, nothing was sent
    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    /// Upload rejected locally, nothing was sent
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The gateway answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Base URL or path could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SdkError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
