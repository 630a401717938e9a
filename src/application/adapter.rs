//! Extractor adapters
//!
//! Every extractor is a [`ProfileAdapter`]: a page source paired with a
//! compiled site profile. Static, rendered and site-specific adapters differ
//! only in those two parts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::JobRecord;
use crate::infrastructure::extract_error::ExtractResult;
use crate::infrastructure::page_source::PageSource;
use crate::infrastructure::parsing::{CardParser, ProfileResult, SiteProfile};

/// Turns one URL into draft records
#[async_trait]
pub trait JobAdapter: Send + Sync {
    /// Adapter label used in logs and diagnostics
    fn name(&self) -> &str;

    /// Load and extract one page. Missing fields never fail; only
    /// page-level problems are errors.
    async fn extract(&self, url: &str) -> ExtractResult<Vec<JobRecord>>;
}

pub struct ProfileAdapter {
    name: String,
    source: Arc<dyn PageSource>,
    parser: CardParser,
}

impl ProfileAdapter {
    pub fn new(name: impl Into<String>, source: Arc<dyn PageSource>, profile: &SiteProfile) -> ProfileResult<Self> {
        Ok(Self {
            name: name.into(),
            source,
            parser: CardParser::new(profile)?,
        })
    }
}

impl std::fmt::Debug for ProfileAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileAdapter")
            .field("name", &self.name)
            .field("source", &self.source.name())
            .field("profile", &self.parser.name())
            .finish()
    }
}

#[async_trait]
impl JobAdapter for ProfileAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, url: &str) -> ExtractResult<Vec<JobRecord>> {
        let page = self.source.load(url, self.parser.load_hints()).await?;
        let records = self.parser.parse(url, &page);
        info!(
            "📋 [{}] {} records from {} via {}",
            self.name,
            records.len(),
            url,
            self.source.name()
        );
        Ok(records)
    }
}
