use thiserror::Error;

use crate::browser::BrowserError;

/// Errors surfaced by a scan
///
/// Only `Navigation`, `BrowserLaunch` and `Config` ever reach the caller of
/// [`crate::Scanner::extract`]. The remaining variants describe failures that
/// the scanner recovers from locally and only ever logs.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Heuristic evaluation failed: {0}")]
    HeuristicEvaluation(String),

    #[error("Screenshot capture failed: {0}")]
    ScreenshotCapture(String),

    /// Viewport override, close, or use of an already closed page
    #[error("Page operation failed: {0}")]
    Page(String),

    #[error("Product page pass failed: {0}")]
    ProductPage(String),

    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    pub fn navigation(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ScanError::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Implement From<BrowserError> for ScanError
impl From<BrowserError> for ScanError {
    fn from(err: BrowserError) -> Self {
        ScanError::BrowserLaunch(err.to_string())
    }
}

/// Implement From<serde_json::Error> for ScanError
///
/// Snapshot deserialisation is the only JSON decoded during a scan.
impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::HeuristicEvaluation(err.to_string())
    }
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
