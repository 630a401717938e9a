//! Ordered selector fallback chains
//!
//! A chain is tried front to back; the first step that yields a non-empty
//! value wins, otherwise the result is `None`. Nothing here returns an error.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::normalize::non_empty;

/// Where one step of a field chain reads its value from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Descendant of the card matching a CSS selector
    Css(String),
    /// The card itself: its first non-blank text node for text fields,
    /// its own `href` for link fields
    Card,
}

impl FieldSource {
    pub fn css(selector: &str) -> Self {
        Self::Css(selector.to_string())
    }
}

#[derive(Debug, Clone)]
enum Step {
    Css { raw: String, selector: Selector },
    Card,
}

/// Compile selector strings, logging and skipping the ones that do not parse
pub fn compile_selectors(selector_strings: &[String]) -> Vec<(String, Selector)> {
    selector_strings
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some((raw.clone(), selector)),
            Err(e) => {
                warn!("Failed to compile selector '{}': {}", raw, e);
                None
            }
        })
        .collect()
}

/// Ordered card selectors; the first one with at least one match is used
#[derive(Debug, Clone)]
pub struct CardSelectors {
    selectors: Vec<(String, Selector)>,
}

impl CardSelectors {
    pub fn compile(selector_strings: &[String]) -> Self {
        Self {
            selectors: compile_selectors(selector_strings),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Cards matched by the first selector that matches anything.
    /// Matches that wrap other matches are list containers and are dropped.
    pub fn select<'a>(&self, document: &'a Html) -> Option<(&str, Vec<ElementRef<'a>>)> {
        self.selectors.iter().find_map(|(raw, selector)| {
            let cards = innermost(document.select(selector).collect());
            (!cards.is_empty()).then_some((raw.as_str(), cards))
        })
    }
}

fn innermost(mut cards: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let matched: HashSet<_> = cards.iter().map(|card| card.id()).collect();
    let containers: HashSet<_> = cards
        .iter()
        .flat_map(|card| card.ancestors().map(|node| node.id()))
        .filter(|id| matched.contains(id))
        .collect();
    if !containers.is_empty() {
        debug!("Dropping {} card matches that wrap other cards", containers.len());
        cards.retain(|card| !containers.contains(&card.id()));
    }
    cards
}

/// Fallback chain for one field of a card
#[derive(Debug, Clone, Default)]
pub struct FieldChain {
    steps: Vec<Step>,
}

impl FieldChain {
    pub fn compile(sources: &[FieldSource]) -> Self {
        let steps = sources
            .iter()
            .filter_map(|source| match source {
                FieldSource::Card => Some(Step::Card),
                FieldSource::Css(raw) => match Selector::parse(raw) {
                    Ok(selector) => Some(Step::Css {
                        raw: raw.clone(),
                        selector,
                    }),
                    Err(e) => {
                        warn!("Failed to compile field selector '{}': {}", raw, e);
                        None
                    }
                },
            })
            .collect();
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First non-empty normalized text in chain order
    pub fn first_text(&self, card: ElementRef<'_>) -> Option<String> {
        self.steps.iter().find_map(|step| match step {
            Step::Card => first_text_node(card),
            Step::Css { selector, .. } => card.select(selector).find_map(element_text),
        })
    }

    /// Every candidate `href`, in chain order, for the caller to filter
    pub fn hrefs<'a>(&'a self, card: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
        self.steps.iter().flat_map(move |step| -> Box<dyn Iterator<Item = &'a str> + 'a> {
            match step {
                Step::Card => Box::new(card.value().attr("href").into_iter()),
                Step::Css { selector, .. } => {
                    Box::new(card.select(selector).filter_map(|e| e.value().attr("href")))
                }
            }
        })
    }

    /// Selector strings, for diagnostics
    pub fn describe(&self) -> Vec<&str> {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Card => "<card>",
                Step::Css { raw, .. } => raw.as_str(),
            })
            .collect()
    }
}

/// Text of an element with its text nodes joined by spaces, normalized
fn element_text(element: ElementRef<'_>) -> Option<String> {
    non_empty(&element.text().collect::<Vec<_>>().join(" "))
}

fn first_text_node(element: ElementRef<'_>) -> Option<String> {
    element.text().find_map(non_empty)
}
