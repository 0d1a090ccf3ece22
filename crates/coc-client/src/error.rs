//! Clash of Clans API client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CocError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("API is under maintenance")]
    Maintenance,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CocError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CocError::Http(_) | CocError::RateLimit)
    }
}
