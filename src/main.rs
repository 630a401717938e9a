use anyhow::{Context, Result};
use tracing::info;

use jobscrape_lib::BatchOrchestrator;
use jobscrape_lib::infrastructure::config::ConfigLoader;
use jobscrape_lib::infrastructure::logging::{init_logging_with_config, log_system_info};
use jobscrape_lib::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::from_env().load().context("Failed to load configuration")?;

    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    log_system_info();

    let orchestrator = BatchOrchestrator::from_config(&config)?;
    info!(
        "Extractors ready: {} render-required domains, {} HTTP attempts per page",
        config.routing.render_domains.len(),
        config.http.max_attempts
    );

    server::listen(&config.server, AppState::new(orchestrator)).await
}
