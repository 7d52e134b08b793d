// src/site/mod.rs
// =============================================================================
// Everything that knows about the rescue site's HTML lives here.
//
// The crawlers only see the two parser traits below, so they can be driven
// with fixture HTML in tests and never touch a CSS selector themselves.
//
// Submodules:
// - markup: the selectors for the real site (PetstablishedMarkup)
// - description: trims a dog's description and adds the adoption footer
// =============================================================================

mod description; // src/site/description.rs - trims the description, adds the footer
mod markup; // src/site/markup.rs - selectors for the rescue's HTML

pub use description::{build_description, ADOPTION_FOOTER};
pub use markup::PetstablishedMarkup;

use url::Url;

/// One dog as shown on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Display name, trimmed but otherwise as shown
    pub name: String,
    /// Absolute link to the dog's own page, if the listing had one
    pub link: Option<String>,
    /// Full description text, before trimming
    pub description: String,
    /// Text of the action button ("Adopt", "Foster", ...)
    pub action: String,
}

/// Everything the crawl needs from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    /// The page carried the "no more results" marker
    pub end_of_results: bool,
}

/// Media links found on a dog's own page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailMedia {
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
}

pub trait ListingParser: Send + Sync {
    /// Parses a listing page fetched from `page_url`
    fn parse_listings(&self, html: &str, page_url: &Url) -> ListingPage;
}

pub trait DetailParser: Send + Sync {
    /// Parses a dog's page fetched from `page_url`
    fn parse_detail(&self, html: &str, page_url: &Url) -> DetailMedia;
}

/// Resolves a possibly-relative link against the page it came from.
/// Only http(s) results are kept.
pub(crate) fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    match base.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url.to_string()),
        _ => None,
    }
}
