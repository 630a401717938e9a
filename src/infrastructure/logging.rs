//! Logging system configuration and initialization
//!
//! - Console output, human readable or JSON
//! - Optional daily-rolling file output
//! - `RUST_LOG` overrides the configured level
//! - Local timezone timestamps

use anyhow::{Result, anyhow};
use chrono::Local;
use once_cell::sync::OnceCell;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

pub const LOG_FILE_NAME: &str = "jobscrape.log";

// Keeps the file writer alive for the life of the process
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Local time formatter
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Filter used when `RUST_LOG` is unset.
///
/// Dependency internals stay quiet unless the level asks for trace.
pub fn default_filter(level: &str) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(level).map_err(|e| anyhow!("Invalid log level '{level}': {e}"))?;

    if !level.to_lowercase().contains("trace") {
        for directive in [
            "hyper=warn",
            "hyper_util=warn",
            "h2=warn",
            "reqwest=info",
            "tower_http=info",
            "chromiumoxide=warn",
            "tungstenite=warn",
            "html5ever=warn",
            "selectors=warn",
        ] {
            filter = filter.add_directive(directive.parse().map_err(|e| anyhow!("Bad directive {directive}: {e}"))?);
        }
    }
    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// ```bash
/// # Show browser protocol traffic
/// RUST_LOG="debug,chromiumoxide=debug" jobscrape
/// ```
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&config.level)?,
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = if config.json_format {
        fmt::layer()
            .json()
            .with_timer(LocalTimeFormatter)
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .boxed()
    };
    layers.push(console);

    if config.file_output {
        std::fs::create_dir_all(&config.directory)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", config.directory, e))?;
        let (file_writer, guard) = non_blocking(rolling::daily(&config.directory, LOG_FILE_NAME));
        if LOG_GUARD.set(guard).is_err() {
            return Err(anyhow!("Logging already initialized"));
        }

        layers.push(
            fmt::layer()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_ansi(false)
                .boxed(),
        );
    }

    Registry::default()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

    info!(
        "Logging initialized (level: {}, json: {}, file: {})",
        config.level, config.json_format, config.file_output
    );
    if config.file_output {
        info!("Log directory: {:?}", config.directory);
    }
    Ok(())
}

/// Log build and host information for diagnostics
pub fn log_system_info() {
    info!("=== jobscrape {} ===", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);
    info!("Architecture: {}", std::env::consts::ARCH);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}
