//! Site profiles for card extraction
//!
//! A profile is the declarative description of a listing page: ordered card
//! selectors, per-field fallback chains, the accepted detail-link pattern and
//! per-site default values. The generic profile serves both the static and the
//! rendered extractor; curated profiles cover the supported job boards.

use serde::{Deserialize, Serialize};

use super::selector_chain::FieldSource;

/// How the `source` field of emitted records is filled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLabel {
    /// Fixed site identifier, e.g. `hellowork`
    Site(String),
    /// The requested page URL
    PageUrl,
}

/// Values backfilled when a field chain matches nothing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefaults {
    pub entreprise: Option<String>,
    pub localisation: Option<String>,
}

/// Declarative extraction profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Profile name used in logs and diagnostics
    pub name: String,

    pub source: SourceLabel,

    /// Selectors for listing cards - first selector with a match wins
    pub card_selectors: Vec<String>,

    pub title: Vec<FieldSource>,
    pub company: Vec<FieldSource>,
    pub location: Vec<FieldSource>,

    /// Candidates for the detail link, in preference order
    pub link: Vec<FieldSource>,

    /// Regex the resolved link path must match. When set, cards without an
    /// accepted link are dropped as navigation or ad blocks.
    pub link_pattern: Option<String>,

    pub defaults: FieldDefaults,

    /// Lazy-load scroll cycles for browser loading; `None` uses the configured default
    pub scroll_cycles: Option<u32>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn css(values: &[&str]) -> Vec<FieldSource> {
    values.iter().map(|s| FieldSource::css(s)).collect()
}

impl SiteProfile {
    /// Profile for pages without a curated profile
    pub fn generic() -> Self {
        Self {
            name: "generic".to_string(),
            source: SourceLabel::PageUrl,
            card_selectors: strings(&[
                "[data-job-id]",
                "[data-testid$='job-card']",
                "[data-testid^='job-item']",
                ".job-card",
                ".job-listing",
                ".job-item",
                ".job-offer",
                ".offer",
                "article",
            ]),
            title: css(&[
                "[data-testid='job-title']",
                ".job-title",
                ".title",
                "h2",
                "h3",
                "h4",
                "a",
            ]),
            company: css(&[
                "[data-testid='company-name']",
                ".company",
                ".company-name",
                ".employer",
                ".organization",
            ]),
            location: css(&[
                "[data-testid='location']",
                ".location",
                ".job-location",
                ".city",
            ]),
            link: {
                let mut link = vec![FieldSource::Card];
                link.extend(css(&["a[href]"]));
                link
            },
            link_pattern: None,
            defaults: FieldDefaults::default(),
            scroll_cycles: None,
        }
    }

    /// HelloWork search result pages
    pub fn hellowork() -> Self {
        Self {
            name: "hellowork".to_string(),
            source: SourceLabel::Site("hellowork".to_string()),
            card_selectors: strings(&[
                "article:has(a[href*='/fr-fr/emplois/'])",
                "li[data-id-storage-target='item'] article",
                "[data-cy='serpCard']",
                "article",
            ]),
            title: css(&["h3", "h2", "[data-cy='offerTitle']"]),
            company: css(&[".company", "[data-testid='company-name']", "[data-cy='companyName']"]),
            location: css(&[".location", "[data-testid='location']", "[data-cy='localisationCard']"]),
            link: css(&["a[href*='/fr-fr/emplois/']", "a[href*='/emplois/']"]),
            link_pattern: Some(r"/emplois/\d+\.html$".to_string()),
            defaults: FieldDefaults::default(),
            scroll_cycles: Some(12),
        }
    }

    /// Makesense job board
    pub fn makesense() -> Self {
        Self {
            name: "makesense".to_string(),
            source: SourceLabel::Site("makesense".to_string()),
            card_selectors: strings(&["a[href*='/fr/s/jobs/']", "a[href*='/s/jobs/']"]),
            title: {
                let mut title = css(&["h2", "h3", "[data-testid='job-title']"]);
                title.push(FieldSource::Card);
                title
            },
            company: css(&["[data-testid='organization-name']", ".organization", ".company"]),
            location: css(&["[data-testid='location']", ".location"]),
            link: vec![FieldSource::Card],
            link_pattern: Some(r"^/(fr/)?s/jobs/[^/]+".to_string()),
            defaults: FieldDefaults {
                entreprise: None,
                localisation: Some("France".to_string()),
            },
            scroll_cycles: Some(8),
        }
    }
}
