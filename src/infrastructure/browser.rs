//! Headless Chrome page source
//!
//! Every load launches its own browser, navigates, dismisses consent banners,
//! scrolls to trigger lazy loading and snapshots the DOM. The browser is shut
//! down on every exit path.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeLaunchConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::error::CdpError;
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::config::BrowserConfig;
use super::extract_error::{ExtractError, ExtractResult};
use super::page_source::{LoadHints, LoadedPage, PageSource, parse_target_url};

const READY_STATE_POLL: Duration = Duration::from_millis(100);

/// Labels shorter than this must equal the button text; longer ones may prefix it
const CONSENT_PREFIX_MIN_CHARS: usize = 4;

/// Page source backed by a fresh headless Chrome per load
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    config: BrowserConfig,
}

/// A launched browser, the task pumping its CDP connection and the
/// throwaway profile directory it runs on
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    // Declared last: removed only after the browser is gone.
    profile_dir: TempDir,
}

impl BrowserSession {
    async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("Browser close returned an error: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
        debug!("Discarding browser profile {:?}", self.profile_dir.path());
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Covers cancellation and panics; `Browser` kills its child on drop.
        self.handler.abort();
    }
}

impl ChromeRenderer {
    pub const fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn launch_config(&self, profile_dir: &Path) -> Result<ChromeLaunchConfig, String> {
        let mut builder = ChromeLaunchConfig::builder()
            .user_data_dir(profile_dir)
            .no_sandbox()
            .request_timeout(self.config.navigation_timeout())
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--lang={}", self.config.locale))
            .arg(format!("--accept-lang={}", self.config.locale));
        if let Some(executable) = &self.config.executable {
            builder = builder.chrome_executable(executable);
        }
        builder.build()
    }

    async fn launch(&self) -> ExtractResult<BrowserSession> {
        let profile_dir = new_profile_dir().map_err(|e| ExtractError::BrowserLaunch {
            reason: format!("cannot create profile directory: {e}"),
        })?;
        let launch_config = self
            .launch_config(profile_dir.path())
            .map_err(|reason| ExtractError::BrowserLaunch { reason })?;

        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| ExtractError::BrowserLaunch { reason: e.to_string() })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(BrowserSession {
            browser,
            handler,
            profile_dir,
        })
    }

    async fn render(&self, browser: &Browser, url: &str, hints: LoadHints) -> ExtractResult<LoadedPage> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExtractError::browser_control("open page", e))?;

        page.set_user_agent(self.config.user_agent.as_str())
            .await
            .map_err(|e| ExtractError::browser_control("set user agent", e))?;

        self.navigate(&page, url).await?;
        self.dismiss_consent(&page).await;

        let cycles = hints.scroll_cycles.unwrap_or(self.config.scroll_cycles);
        self.scroll(&page, cycles).await?;

        let html = page
            .content()
            .await
            .map_err(|e| ExtractError::browser_control("read content", e))?;
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        if let Err(e) = page.close().await {
            debug!("Page close returned an error: {}", e);
        }

        Ok(LoadedPage { final_url, html })
    }

    /// Navigate and wait until the document leaves the `loading` state,
    /// bounded by the navigation timeout
    async fn navigate(&self, page: &Page, url: &str) -> ExtractResult<()> {
        let navigation = navigate_until_interactive(page, url);

        match timeout(self.config.navigation_timeout(), navigation).await {
            Ok(Ok(None)) => Ok(()),
            Ok(Ok(Some(reason))) => Err(ExtractError::Network {
                url: url.to_string(),
                reason,
            }),
            Ok(Err(CdpError::Timeout)) | Err(_) => Err(ExtractError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: self.config.navigation_timeout_seconds,
            }),
            Ok(Err(e)) => Err(ExtractError::browser_control("navigate", e)),
        }
    }

    /// Click the first consent button matching one of the labels.
    /// Best effort: failures and timeouts are ignored.
    async fn dismiss_consent(&self, page: &Page) {
        let clicked = first_accepted_label(&self.config.consent_labels, self.config.consent_click_timeout(), |label| {
            let script = consent_script(label);
            async move {
                page.evaluate(script.as_str())
                    .await?
                    .into_value::<bool>()
                    .map_err(CdpError::from)
            }
        })
        .await;

        match clicked {
            Some(label) => debug!("🍪 Dismissed consent banner with '{}'", label),
            None => debug!("No consent banner found"),
        }
    }

    async fn scroll(&self, page: &Page, cycles: u32) -> ExtractResult<()> {
        let script = scroll_script(self.config.scroll_delta_px);
        for _ in 0..cycles {
            page.evaluate(script.as_str())
                .await
                .map_err(|e| ExtractError::browser_control("scroll", e))?;
            sleep(self.config.scroll_pause()).await;
        }
        Ok(())
    }
}

#[async_trait]
impl PageSource for ChromeRenderer {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn load(&self, url: &str, hints: LoadHints) -> ExtractResult<LoadedPage> {
        parse_target_url(url)?;
        info!("🌐 Rendering {} in headless Chrome", url);

        let started = std::time::Instant::now();
        let session = self.launch().await?;
        let result = self.render(&session.browser, url, hints).await;
        session.shutdown().await;

        match &result {
            Ok(page) => info!(
                "✅ Rendered {} ({} bytes) in {:?}",
                url,
                page.html.len(),
                started.elapsed()
            ),
            Err(e) => warn!("❌ Rendering {} failed after {:?}: {}", url, started.elapsed(), e),
        }
        result
    }
}

/// Issue the navigation and poll `document.readyState` until it leaves `loading`.
/// Returns Chrome's error text when the navigation itself was refused.
async fn navigate_until_interactive(page: &Page, url: &str) -> Result<Option<String>, CdpError> {
    let response = page.execute(NavigateParams::new(url)).await?;
    if let Some(error_text) = response.result.error_text.clone() {
        return Ok(Some(error_text));
    }
    loop {
        let state: String = page.evaluate("document.readyState").await?.into_value()?;
        if state != "loading" {
            return Ok(None);
        }
        sleep(READY_STATE_POLL).await;
    }
}

fn new_profile_dir() -> std::io::Result<TempDir> {
    tempfile::Builder::new().prefix("jobscrape-chrome-").tempdir()
}

/// Try each label in order, each attempt bounded by `per_attempt`, and stop at
/// the first one the page reports as clicked
async fn first_accepted_label<'a, F, Fut, E>(labels: &'a [String], per_attempt: Duration, mut attempt: F) -> Option<&'a str>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::fmt::Display,
{
    for label in labels {
        match timeout(per_attempt, attempt(label.as_str())).await {
            Ok(Ok(true)) => return Some(label.as_str()),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => debug!("Consent attempt '{}' failed: {}", label, e),
            Err(_) => debug!("Consent attempt '{}' timed out", label),
        }
    }
    None
}

/// Script clicking the first button-like element whose normalized text equals
/// `label`, or starts with it when the label is long enough to be specific.
/// Evaluates to whether a click happened.
fn consent_script(label: &str) -> String {
    let label = label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let allow_prefix = label.chars().count() >= CONSENT_PREFIX_MIN_CHARS;
    let quoted = serde_json::Value::String(label).to_string();
    format!(
        r#"(() => {{
  const label = {quoted};
  const allowPrefix = {allow_prefix};
  for (const el of document.querySelectorAll("button, [role='button']")) {{
    const text = (el.innerText || el.textContent || "").replace(/\s+/g, " ").trim().toLowerCase();
    if (text === label || (allowPrefix && text.startsWith(label + " "))) {{ el.click(); return true; }}
  }}
  return false;
}})()"#
    )
}

fn scroll_script(delta_px: u32) -> String {
    format!("window.scrollBy(0, {delta_px})")
}
