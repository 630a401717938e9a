//! Error types for page loading and extraction
//!
//! Only page-level failures are errors. A field whose fallback chain matches
//! nothing is simply absent and never surfaces here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("navigation to {url} did not reach DOM ready within {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("browser launch failed: {reason}")]
    BrowserLaunch { reason: String },

    #[error("browser control failed during {step}: {reason}")]
    BrowserControl { step: String, reason: String },

    #[error("adapter panicked: {message}")]
    Internal { message: String },
}

impl ExtractError {
    /// Stable error class written into failure records
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HttpStatus { .. }
            | Self::Timeout { .. }
            | Self::Network { .. }
            | Self::InvalidUrl { .. }
            | Self::NavigationTimeout { .. } => "FetchError",
            Self::BrowserLaunch { .. } | Self::BrowserControl { .. } => "RenderError",
            Self::Internal { .. } => "InternalError",
        }
    }

    pub fn browser_control(step: &str, reason: impl ToString) -> Self {
        Self::BrowserControl {
            step: step.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the static fetch layer should try again
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

pub type ExtractResult<T> = Result<T, ExtractError>;
