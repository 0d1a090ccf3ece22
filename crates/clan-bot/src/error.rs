//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Signal error: {0}")]
    Signal(#[from] signal_client::SignalError),

    #[error("Clash of Clans API error: {0}")]
    Coc(#[from] coc_client::CocError),

    #[error("Profile store error: {0}")]
    Store(#[from] profile_store::StoreError),

    #[error("Render error: {0}")]
    Render(#[from] crate::render::RenderError),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
