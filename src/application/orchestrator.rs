//! Batch orchestration
//!
//! URLs are processed one after another. Each URL is routed, extracted and
//! deduplicated on its own; a failure or panic becomes a single error record
//! for that URL and the batch moves on.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::FutureExt;
use tracing::{Instrument, error, info, info_span, warn};

use super::adapter::{JobAdapter, ProfileAdapter};
use super::dedup::dedup;
use super::router::{AdapterRouter, Route, SiteId};
use crate::domain::JobRecord;
use crate::infrastructure::browser::ChromeRenderer;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::extract_error::{ExtractError, ExtractResult};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::page_source::PageSource;
use crate::infrastructure::parsing::{ProfileResult, SiteProfile};

/// One adapter per route
#[derive(Clone)]
pub struct AdapterSet {
    pub static_page: Arc<dyn JobAdapter>,
    pub rendered: Arc<dyn JobAdapter>,
    pub hellowork: Arc<dyn JobAdapter>,
    pub makesense: Arc<dyn JobAdapter>,
}

impl AdapterSet {
    /// Profile adapters over a static and a rendering page source
    pub fn from_sources(static_source: Arc<dyn PageSource>, render_source: Arc<dyn PageSource>) -> ProfileResult<Self> {
        let site = |id: SiteId| -> ProfileResult<Arc<dyn JobAdapter>> {
            Ok(Arc::new(ProfileAdapter::new(id.as_str(), render_source.clone(), &id.profile())?))
        };

        Ok(Self {
            static_page: Arc::new(ProfileAdapter::new(
                Route::Static.adapter_name(),
                static_source,
                &SiteProfile::generic(),
            )?),
            rendered: Arc::new(ProfileAdapter::new(
                Route::Rendered.adapter_name(),
                render_source.clone(),
                &SiteProfile::generic(),
            )?),
            hellowork: site(SiteId::HelloWork)?,
            makesense: site(SiteId::Makesense)?,
        })
    }

    pub fn get(&self, route: Route) -> &Arc<dyn JobAdapter> {
        match route {
            Route::Static => &self.static_page,
            Route::Rendered => &self.rendered,
            Route::Site(SiteId::HelloWork) => &self.hellowork,
            Route::Site(SiteId::Makesense) => &self.makesense,
        }
    }
}

#[derive(Clone)]
pub struct BatchOrchestrator {
    router: AdapterRouter,
    adapters: AdapterSet,
}

impl BatchOrchestrator {
    pub const fn new(router: AdapterRouter, adapters: AdapterSet) -> Self {
        Self { router, adapters }
    }

    /// Production wiring: shared HTTP client for static pages, headless Chrome for the rest
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http: Arc<dyn PageSource> =
            Arc::new(HttpClient::with_config(config.http.clone()).context("Failed to build HTTP client")?);
        let chrome: Arc<dyn PageSource> = Arc::new(ChromeRenderer::new(config.browser.clone()));
        let adapters = AdapterSet::from_sources(http, chrome).context("Failed to compile site profiles")?;

        Ok(Self::new(AdapterRouter::from_config(&config.routing), adapters))
    }

    pub fn route(&self, url: &str) -> Route {
        self.router.route(url)
    }

    /// Run every URL in order; never fails
    pub async fn run_batch(&self, urls: &[String]) -> Vec<JobRecord> {
        let started = Instant::now();
        info!("🚀 Starting batch of {} URLs", urls.len());

        let mut output = Vec::new();
        let mut failures = 0usize;
        for url in urls {
            let records = self.process_url(url).await;
            failures += records.iter().filter(|r| r.is_failure()).count();
            output.extend(records);
        }

        info!(
            "🏁 Batch finished: {} URLs, {} records, {} failures in {:?}",
            urls.len(),
            output.len(),
            failures,
            started.elapsed()
        );
        output
    }

    /// Records for one URL: deduplicated extraction output, or one error record
    pub async fn process_url(&self, url: &str) -> Vec<JobRecord> {
        let (route, result) = self.extract_raw(url).await;
        match result {
            Ok(records) => {
                let extracted = records.len();
                let records = dedup(records);
                info!(
                    url = %url,
                    adapter = route.adapter_name(),
                    "✅ {} records ({} duplicates dropped)",
                    records.len(),
                    extracted - records.len()
                );
                records
            }
            Err(e) => {
                warn!(url = %url, adapter = route.adapter_name(), "❌ {}: {}", e.kind(), e);
                vec![JobRecord::failure(url, e.kind(), &e.to_string())]
            }
        }
    }

    /// Route and invoke the adapter without deduplication; panics become `Internal` errors
    pub async fn extract_raw(&self, url: &str) -> (Route, ExtractResult<Vec<JobRecord>>) {
        let route = self.router.route(url);
        let adapter = self.adapters.get(route);
        let span = info_span!("extract", url = %url, adapter = adapter.name());

        let result = AssertUnwindSafe(adapter.extract(url))
            .catch_unwind()
            .instrument(span)
            .await
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(url = %url, adapter = adapter.name(), "💥 Adapter panicked: {}", message);
                Err(ExtractError::Internal { message })
            });

        (route, result)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
