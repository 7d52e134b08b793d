// src/site/markup.rs
// =============================================================================
// CSS selectors for the rescue's Petstablished widget.
//
// Listing page:
//   <div class="pet-container">
//     <a class="pet-link" href="/pets/...">
//       <h3>Fido</h3>
//       <div class="pet-description-full">...</div>
//     </a>
//     <div class="actions"><a class="button">Foster</a></div>
//   </div>
//   ...
//   <div class="error">No results</div>      <- only past the last page
//
// Dog page:
//   <div id="oc-clients">
//     <a class="thumb-img" data-pet-gallery-url="https://.../1.png"></a>
//     <a class="thumb-img" href="https://www.youtube.com/watch?v=..."></a>
//   </div>
// =============================================================================

use super::{resolve_link, DetailMedia, DetailParser, ListingEntry, ListingPage, ListingParser};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const PET_CONTAINER_CLASS: &str = "pet-container";
const GALLERY_URL_ATTRIBUTE: &str = "data-pet-gallery-url";
const LINK_ATTRIBUTE: &str = "href";

#[derive(Debug, Clone)]
pub struct PetstablishedMarkup {
    end_marker: Selector,
    pet_link: Selector,
    pet_name: Selector,
    description: Selector,
    action_button: Selector,
    gallery_item: Selector,
}

// Our selectors are constants, so a parse failure is a programmer error
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{}': {:?}", css, e))
}

impl Default for PetstablishedMarkup {
    fn default() -> Self {
        Self {
            end_marker: selector(".error"),
            pet_link: selector(".pet-link"),
            pet_name: selector("h3"),
            description: selector(".pet-description-full"),
            action_button: selector(".actions .button"),
            gallery_item: selector("#oc-clients .thumb-img"),
        }
    }
}

impl PetstablishedMarkup {
    pub fn new() -> Self {
        Self::default()
    }

    fn child_text(element: ElementRef<'_>, selector: &Selector) -> String {
        element
            .select(selector)
            .flat_map(|child| child.text())
            .collect::<String>()
            .trim()
            .to_string()
    }

    // The action buttons sit next to the pet link, not inside it, so look
    // them up from the enclosing pet container
    fn action_text(&self, link: ElementRef<'_>) -> String {
        link.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().classes().any(|c| c == PET_CONTAINER_CLASS))
            .map(|container| Self::child_text(container, &self.action_button))
            .unwrap_or_default()
    }
}

impl ListingParser for PetstablishedMarkup {
    fn parse_listings(&self, html: &str, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        let end_of_results = document.select(&self.end_marker).next().is_some();

        let entries = document
            .select(&self.pet_link)
            .map(|link| ListingEntry {
                name: Self::child_text(link, &self.pet_name),
                link: link
                    .value()
                    .attr(LINK_ATTRIBUTE)
                    .and_then(|href| resolve_link(page_url, href)),
                description: Self::child_text(link, &self.description),
                action: self.action_text(link),
            })
            .collect();

        ListingPage {
            entries,
            end_of_results,
        }
    }
}

impl DetailParser for PetstablishedMarkup {
    fn parse_detail(&self, html: &str, page_url: &Url) -> DetailMedia {
        let document = Html::parse_document(html);
        let mut media = DetailMedia::default();

        for item in document.select(&self.gallery_item) {
            if let Some(image) = item
                .value()
                .attr(GALLERY_URL_ATTRIBUTE)
                .and_then(|url| resolve_link(page_url, url))
            {
                media.image_urls.push(image);
            }
            if let Some(video) = item
                .value()
                .attr(LINK_ATTRIBUTE)
                .and_then(|url| resolve_link(page_url, url))
            {
                media.video_urls.push(video);
            }
        }

        media
    }
}
