//! Page loading seam shared by the static and browser-backed extractors

use async_trait::async_trait;

use super::extract_error::{ExtractError, ExtractResult};

/// Final HTML snapshot of a page together with the URL it ended up at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// URL after redirects; relative links resolve against it
    pub final_url: String,
    pub html: String,
}

/// Per-call hints a profile passes to its loader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadHints {
    /// Lazy-load scroll cycles; `None` uses the configured default
    pub scroll_cycles: Option<u32>,
}

/// Turns a URL into its final HTML.
///
/// Implementations own their timeouts and release every resource they
/// acquire before returning, on success and failure alike.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &'static str;

    async fn load(&self, url: &str, hints: LoadHints) -> ExtractResult<LoadedPage>;
}

/// Parse and check that the URL is something we can fetch
pub fn parse_target_url(url: &str) -> ExtractResult<url::Url> {
    let parsed = url::Url::parse(url.trim()).map_err(|e| ExtractError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
