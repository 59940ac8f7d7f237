// Error types for ghfolio.
// Separates storage-medium failures (never surfaced by the cache) from network
// and upstream failures (always surfaced to the caller).

use reqwest::StatusCode;
use thiserror::Error;

/// Failures reported by a key-value storage medium.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage quota exceeded ({used} of {capacity} bytes in use, {requested} requested)")]
    QuotaExceeded {
        used: usize,
        capacity: usize,
        requested: usize,
    },

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("GitHub API rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("GitHub API error: {} {status_text}", .status.as_u16())]
    Upstream {
        status: StatusCode,
        status_text: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("{0}")]
    Other(String),
}

impl FolioError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FolioError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
