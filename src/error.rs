//! Error types shared by the viewer pipeline.

use thiserror::Error;

/// Errors surfaced by repository access, decoding and configuration.
///
/// Per-reference failures (an unresolved wikilink, a missing embedded file)
/// never become an `ApiError`; they degrade in place. Everything here is a
/// whole-request failure that the viewer turns into a placeholder page.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Github API error ({status} {message})")]
    UpstreamError { status: u16, message: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Embedded file count mismatch: {declared} assets for {referenced} referencing elements")]
    ReconcileError { declared: usize, referenced: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
