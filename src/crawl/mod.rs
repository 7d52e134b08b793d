// src/crawl/mod.rs
// =============================================================================
// The two crawl stages.
//
// - pages: walks the paginated listing and hands each dog to a handler
// - detail: visits one dog's own page and downloads its media
//
// Neither stage knows about CSS selectors; they get parsers from crate::site.
// =============================================================================

mod detail; // src/crawl/detail.rs - visits of each matched dog's page
mod pages; // src/crawl/pages.rs - the paginated listing crawl

pub use detail::{CrawlContext, DetailCrawler};
pub use pages::{CrawlState, ListingHandler, PageCrawler};
