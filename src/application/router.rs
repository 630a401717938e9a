//! Adapter routing
//!
//! Pure URL classification: site markers first, then the render-required
//! domain allow-list, then the static extractor.

use url::Url;

use crate::infrastructure::config::RoutingConfig;
use crate::infrastructure::parsing::SiteProfile;

/// Job boards with a curated profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteId {
    HelloWork,
    Makesense,
}

impl SiteId {
    /// Checked in this order
    pub const ALL: [Self; 2] = [Self::HelloWork, Self::Makesense];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HelloWork => "hellowork",
            Self::Makesense => "makesense",
        }
    }

    /// Substring identifying the site anywhere in a URL
    pub const fn marker(self) -> &'static str {
        match self {
            Self::HelloWork => "hellowork.com",
            Self::Makesense => "makesense",
        }
    }

    pub fn profile(self) -> SiteProfile {
        match self {
            Self::HelloWork => SiteProfile::hellowork(),
            Self::Makesense => SiteProfile::makesense(),
        }
    }
}

/// Extractor chosen for a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Static,
    Rendered,
    Site(SiteId),
}

impl Route {
    pub const fn adapter_name(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rendered => "rendered",
            Self::Site(site) => site.as_str(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.adapter_name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdapterRouter {
    render_domains: Vec<String>,
}

impl AdapterRouter {
    pub fn new<I, S>(render_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let render_domains = render_domains
            .into_iter()
            .map(|domain| domain.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();
        Self { render_domains }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(&config.render_domains)
    }

    pub fn route(&self, url: &str) -> Route {
        let lowered = url.to_lowercase();
        if let Some(site) = SiteId::ALL.into_iter().find(|site| lowered.contains(site.marker())) {
            return Route::Site(site);
        }

        let host = Url::parse(url.trim())
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase));
        match host {
            Some(host) if self.requires_rendering(&host) => Route::Rendered,
            _ => Route::Static,
        }
    }

    fn requires_rendering(&self, host: &str) -> bool {
        self.render_domains.iter().any(|domain| {
            host == domain.as_str()
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}
