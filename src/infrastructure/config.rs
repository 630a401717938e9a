//! Configuration infrastructure
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults
//! 2. Optional TOML file (`jobscrape.toml`, or the path in `JOBSCRAPE_CONFIG`)
//! 3. Environment variables `JOBSCRAPE__<SECTION>__<KEY>`
//! 4. Plain `PORT`, which overrides `server.port`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Browser-like user agent sent by the static fetcher and the headless browser
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_PORT: u16 = 10000;

/// Accepted range for the number of lazy-load scroll cycles
pub const SCROLL_CYCLE_RANGE: std::ops::RangeInclusive<u32> = 8..=12;

/// Accepted range for the pause after each scroll step
pub const SCROLL_PAUSE_RANGE_MS: std::ops::RangeInclusive<u64> = 300..=400;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub browser: BrowserConfig,
    pub routing: RoutingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Static fetch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub backoff_min_ms: u64,
    pub backoff_max_ms: u64,
    pub jitter: bool,
    pub user_agent: String,
}

/// Headless browser settings shared by the rendered and site-specific extractors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Upper bound for reaching DOM ready after navigation
    pub navigation_timeout_seconds: u64,
    /// Per-label budget when probing consent buttons
    pub consent_click_timeout_ms: u64,
    pub scroll_cycles: u32,
    pub scroll_delta_px: u32,
    pub scroll_pause_ms: u64,
    pub locale: String,
    /// Chrome/Chromium binary; auto-detected when unset
    pub executable: Option<PathBuf>,
    /// Consent button labels, tried in order
    pub consent_labels: Vec<String>,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Domains whose listings only exist after script execution
    pub render_domains: Vec<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,
    /// Enable JSON formatted console logs
    pub json_format: bool,
    /// Also write a daily-rolling log file
    pub file_output: bool,
    /// Directory for log files, relative to the working directory
    pub directory: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_attempts: 3,
            backoff_min_ms: 500,
            backoff_max_ms: 8000,
            jitter: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_seconds: 45,
            consent_click_timeout_ms: 2000,
            scroll_cycles: 10,
            scroll_delta_px: 2000,
            scroll_pause_ms: 350,
            locale: "fr-FR".to_string(),
            executable: None,
            consent_labels: [
                "Tout accepter",
                "Accepter et fermer",
                "Accepter",
                "J’accepte",
                "J'accepte",
                "Accept all",
                "Accept",
                "I agree",
                "Alle akzeptieren",
                "Aceptar",
                "OK",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            render_domains: [
                "welcometothejungle.com",
                "indeed.com",
                "indeed.fr",
                "linkedin.com",
                "glassdoor.fr",
                "glassdoor.com",
                "apec.fr",
                "francetravail.fr",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_output: false,
            directory: PathBuf::from("logs"),
        }
    }
}

impl HttpConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl BrowserConfig {
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_seconds)
    }

    pub const fn consent_click_timeout(&self) -> Duration {
        Duration::from_millis(self.consent_click_timeout_ms)
    }

    pub const fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }
}

/// Builder for the layered configuration sources
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    file_required: bool,
    use_environment: bool,
    port_override: Option<String>,
}

impl ConfigLoader {
    /// Loader wired to the process environment, as used by the binary
    pub fn from_env() -> Self {
        let (file, file_required) = match std::env::var("JOBSCRAPE_CONFIG") {
            Ok(path) => (Some(PathBuf::from(path)), true),
            Err(_) => (Some(PathBuf::from("jobscrape.toml")), false),
        };
        Self {
            file,
            file_required,
            use_environment: true,
            port_override: std::env::var("PORT").ok(),
        }
    }

    /// Defaults only; add sources with the `with_*` methods
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.file_required = true;
        self
    }

    #[must_use]
    pub fn with_port_override(mut self, port: Option<String>) -> Self {
        self.port_override = port;
        self
    }

    pub fn load(&self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&AppConfig::default()).context("Failed to seed default configuration")?,
        );

        if let Some(path) = &self.file {
            builder = builder.add_source(File::from(path.as_path()).required(self.file_required));
        }

        if self.use_environment {
            builder = builder.add_source(
                Environment::with_prefix("JOBSCRAPE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("routing.render_domains")
                    .with_list_parse_key("browser.consent_labels")
                    .try_parsing(true),
            );
        }

        builder = builder
            .set_override_option("server.port", self.port_override.clone())
            .context("Failed to apply PORT override")?;

        let config: AppConfig = builder
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        info!(
            "Configuration loaded: port={}, http attempts={}, scroll cycles={}",
            config.server.port, config.http.max_attempts, config.browser.scroll_cycles
        );
        Ok(config)
    }
}

impl AppConfig {
    /// Reject settings that would break the extraction bounds
    pub fn validate(&self) -> Result<()> {
        if self.http.max_attempts == 0 {
            bail!("http.max_attempts must be at least 1");
        }
        if self.http.timeout_seconds == 0 {
            bail!("http.timeout_seconds must be positive");
        }
        if self.http.backoff_min_ms > self.http.backoff_max_ms {
            bail!(
                "http.backoff_min_ms ({}) exceeds http.backoff_max_ms ({})",
                self.http.backoff_min_ms,
                self.http.backoff_max_ms
            );
        }
        if self.browser.navigation_timeout_seconds == 0 {
            bail!("browser.navigation_timeout_seconds must be positive");
        }
        if !SCROLL_CYCLE_RANGE.contains(&self.browser.scroll_cycles) {
            bail!(
                "browser.scroll_cycles must be within {:?}, got {}",
                SCROLL_CYCLE_RANGE,
                self.browser.scroll_cycles
            );
        }
        if !SCROLL_PAUSE_RANGE_MS.contains(&self.browser.scroll_pause_ms) {
            bail!(
                "browser.scroll_pause_ms must be within {:?}, got {}",
                SCROLL_PAUSE_RANGE_MS,
                self.browser.scroll_pause_ms
            );
        }
        Ok(())
    }
}
