//! Card parser driven by a site profile
//!
//! Selects listing cards with the profile's ordered card selectors, then runs
//! each field chain inside every card. Missing fields stay empty; cards
//! without a title are dropped.

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};
use url::Url;

use super::config::{FieldDefaults, SiteProfile, SourceLabel};
use super::context::ParseContext;
use super::error::{ProfileError, ProfileResult};
use super::selector_chain::{CardSelectors, FieldChain};
use crate::domain::{JobDraft, JobRecord};
use crate::infrastructure::page_source::{LoadHints, LoadedPage};

/// Compiled form of a [`SiteProfile`]
#[derive(Debug, Clone)]
pub struct CardParser {
    name: String,
    source: SourceLabel,
    cards: CardSelectors,
    title: FieldChain,
    company: FieldChain,
    location: FieldChain,
    link: FieldChain,
    link_pattern: Option<Regex>,
    defaults: FieldDefaults,
    scroll_cycles: Option<u32>,
}

impl CardParser {
    /// Compile a profile; invalid field selectors are skipped, but a profile
    /// with no usable card selector or a broken link pattern is rejected
    pub fn new(profile: &SiteProfile) -> ProfileResult<Self> {
        let cards = CardSelectors::compile(&profile.card_selectors);
        if cards.is_empty() {
            return Err(ProfileError::NoCardSelectors {
                profile: profile.name.clone(),
                tried: profile.card_selectors.clone(),
            });
        }

        let link_pattern = profile
            .link_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ProfileError::InvalidLinkPattern {
                    profile: profile.name.clone(),
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let title = FieldChain::compile(&profile.title);
        debug!("Compiled profile '{}' (title chain: {:?})", profile.name, title.describe());

        Ok(Self {
            name: profile.name.clone(),
            source: profile.source.clone(),
            cards,
            title,
            company: FieldChain::compile(&profile.company),
            location: FieldChain::compile(&profile.location),
            link: FieldChain::compile(&profile.link),
            link_pattern,
            defaults: profile.defaults.clone(),
            scroll_cycles: profile.scroll_cycles,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn load_hints(&self) -> LoadHints {
        LoadHints {
            scroll_cycles: self.scroll_cycles,
        }
    }

    /// Extract records from a loaded page, in document order
    pub fn parse(&self, requested_url: &str, page: &LoadedPage) -> Vec<JobRecord> {
        self.parse_drafts(requested_url, page)
            .into_iter()
            .filter_map(JobDraft::finalize)
            .collect()
    }

    /// Drafts before the record shape is fixed; titles may still be missing here
    pub fn parse_drafts(&self, requested_url: &str, page: &LoadedPage) -> Vec<JobDraft> {
        let Some(context) = ParseContext::new(requested_url, &page.final_url) else {
            warn!("[{}] Unparsable page URL {}, skipping extraction", self.name, requested_url);
            return Vec::new();
        };

        let document = Html::parse_document(&page.html);
        let Some((selector, cards)) = self.cards.select(&document) else {
            debug!("[{}] No cards matched on {}", self.name, requested_url);
            return Vec::new();
        };

        debug!("[{}] Found {} cards using selector '{}'", self.name, cards.len(), selector);

        let drafts: Vec<JobDraft> = cards
            .into_iter()
            .filter_map(|card| self.extract_card(card, &context))
            .collect();

        debug!("[{}] Extracted {} drafts from {}", self.name, drafts.len(), requested_url);
        drafts
    }

    fn extract_card(&self, card: ElementRef<'_>, context: &ParseContext) -> Option<JobDraft> {
        let link = self.accepted_link(card, context);
        if link.is_none() && self.link_pattern.is_some() {
            return None;
        }

        let source = match &self.source {
            SourceLabel::Site(site) => site.clone(),
            SourceLabel::PageUrl => context.requested_url.clone(),
        };

        Some(
            JobDraft::new(source)
                .with_title(self.title.first_text(card))
                .with_company(self.company.first_text(card).or_else(|| self.defaults.entreprise.clone()))
                .with_location(self.location.first_text(card).or_else(|| self.defaults.localisation.clone()))
                .with_link(link.map(String::from)),
        )
    }

    /// First candidate link that resolves and, when the profile has a pattern, matches it
    fn accepted_link(&self, card: ElementRef<'_>, context: &ParseContext) -> Option<Url> {
        self.link
            .hrefs(card)
            .filter_map(|href| context.resolve(href))
            .find(|resolved| {
                self.link_pattern
                    .as_ref()
                    .is_none_or(|pattern| pattern.is_match(resolved.path()))
            })
    }
}
