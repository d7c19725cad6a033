use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong while obtaining rendered page markup.
///
/// Extraction has no error type of its own: unparseable markup simply
/// yields fewer records.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    #[error("navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("failed to read page content: {0}")]
    Content(String),
    #[error("failed to shut down browser: {0}")]
    Shutdown(String),
}
