//! HTTP client for static page extraction
//!
//! Browser-like user agent, per-request timeout and bounded exponential
//! backoff. Only transient failures are retried; a 404 fails immediately.
//! The client keeps no cookie jar, so no response can influence a later URL.

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response, header::RETRY_AFTER};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::config::HttpConfig;
use super::extract_error::{ExtractError, ExtractResult};
use super::page_source::{LoadHints, LoadedPage, PageSource, parse_target_url};
use super::retry::BackoffPolicy;

/// HTTP client with retry policy; cheap to clone, shares its connection pool
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
    policy: BackoffPolicy,
}

/// Failure of a single attempt, with the server's retry hint if any
struct AttemptError {
    error: ExtractError,
    retry_after_secs: Option<u64>,
}

impl From<ExtractError> for AttemptError {
    fn from(error: ExtractError) -> Self {
        Self { error, retry_after_secs: None }
    }
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        let policy = BackoffPolicy::from_http_config(&config);
        Ok(Self { client, config, policy })
    }

    pub const fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Fetch HTML content with the retry policy applied
    pub async fn fetch_html_string(&self, url: &str) -> ExtractResult<LoadedPage> {
        let target = parse_target_url(url)?;
        let mut attempt = 1;

        loop {
            info!("🌐 HTTP GET (attempt {}/{}) : {}", attempt, self.policy.max_attempts, target);
            match self.fetch_once(target.as_str()).await {
                Ok(page) => {
                    debug!("Fetched {} bytes from {} on attempt {}", page.html.len(), url, attempt);
                    return Ok(page);
                }
                Err(AttemptError { error, retry_after_secs }) => {
                    if !error.is_retryable() || !self.policy.should_retry(attempt) {
                        warn!("❌ Giving up on {} after attempt {}: {}", url, attempt, error);
                        return Err(error);
                    }

                    let delay: Duration = self.policy.delay_with_hint(attempt, retry_after_secs);
                    warn!("⚠️ Attempt {} failed for {}: {} (retrying in {:?})", attempt, url, error, delay);
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Single attempt: GET, check status, read body
    async fn fetch_once(&self, url: &str) -> Result<LoadedPage, AttemptError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError {
                retry_after_secs: retry_after(&response),
                error: ExtractError::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                },
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| self.classify(url, &e))?;

        Ok(LoadedPage { final_url, html })
    }

    fn classify(&self, url: &str, error: &reqwest::Error) -> AttemptError {
        let error = if error.is_timeout() {
            ExtractError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout_seconds,
            }
        } else {
            ExtractError::Network {
                url: url.to_string(),
                reason: error.to_string(),
            }
        };
        error.into()
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

#[async_trait]
impl PageSource for HttpClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn load(&self, url: &str, _hints: LoadHints) -> ExtractResult<LoadedPage> {
        self.fetch_html_string(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_config(HttpConfig::default());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().policy().max_attempts, 3);
    }

    #[tokio::test]
    async fn invalid_urls_fail_without_a_request() {
        let client = HttpClient::with_config(HttpConfig::default()).unwrap();
        let err = client.fetch_html_string("javascript:alert(1)").await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidUrl { .. }));
    }
}
