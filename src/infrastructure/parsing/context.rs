//! Parsing context for card extraction

use url::Url;

/// Context information for one page being parsed
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// URL the caller asked for
    pub requested_url: String,

    /// URL the page ended up at; relative links resolve against it
    pub base_url: Url,
}

impl ParseContext {
    /// Build a context, falling back to the requested URL when the final one does not parse
    pub fn new(requested_url: &str, final_url: &str) -> Option<Self> {
        let base_url = Url::parse(final_url).or_else(|_| Url::parse(requested_url)).ok()?;
        Some(Self {
            requested_url: requested_url.to_string(),
            base_url,
        })
    }

    /// Resolve an `href` against the page origin; `None` for unusable links
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") || href.starts_with("mailto:") {
            return None;
        }
        let resolved = self.base_url.join(href).ok()?;
        matches!(resolved.scheme(), "http" | "https").then_some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ParseContext {
        ParseContext::new(
            "https://www.hellowork.com/fr-fr/emploi/recherche.html?k=rust",
            "https://www.hellowork.com/fr-fr/emploi/recherche.html?k=rust",
        )
        .unwrap()
    }

    #[test]
    fn test_url_resolution() {
        let ctx = ctx();
        assert_eq!(
            ctx.resolve("/fr-fr/emplois/123.html").unwrap().as_str(),
            "https://www.hellowork.com/fr-fr/emplois/123.html"
        );
        assert_eq!(
            ctx.resolve("https://other.com/test").unwrap().as_str(),
            "https://other.com/test"
        );
        assert_eq!(
            ctx.resolve("offre.html").unwrap().as_str(),
            "https://www.hellowork.com/fr-fr/emploi/offre.html"
        );
    }

    #[test]
    fn unusable_links_are_rejected() {
        let ctx = ctx();
        assert!(ctx.resolve("#top").is_none());
        assert!(ctx.resolve("javascript:void(0)").is_none());
        assert!(ctx.resolve("mailto:jobs@example.com").is_none());
        assert!(ctx.resolve("  ").is_none());
    }

    #[test]
    fn falls_back_to_requested_url() {
        let ctx = ParseContext::new("https://example.com/jobs", "").unwrap();
        assert_eq!(ctx.base_url.as_str(), "https://example.com/jobs");
        assert!(ParseContext::new("nope", "also nope").is_none());
    }
}
