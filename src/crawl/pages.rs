// src/crawl/pages.rs
// =============================================================================
// Walks the paginated listing: page 1, page 2, ... up to `max_pages`.
//
// How it works:
// 1. Before each page, take a slot from a BoundedConcurrencyGroup so at most
//    `page_concurrency` pages are in flight
// 2. With the slot in hand, check the stop flag; once set, no new pages
// 3. Each page runs in its own task: fetch, parse, hand every entry to the
//    ListingHandler one at a time
// 4. A page carrying the "no more results" marker sets the stop flag, and so
//    does a page after which the handler says it has everything it wanted
// 5. crawl() returns after every issued page has finished
//
// Pages already in flight when the flag is set still run to completion,
// we only stop asking for new ones.
// =============================================================================

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::report::Reporter;
use crate::site::{ListingEntry, ListingParser};
use crate::sync::{AtomicFlag, BoundedConcurrencyGroup};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use url::Url;

/// What to do with each dog found on a listing page
#[async_trait]
pub trait ListingHandler: Send + Sync {
    async fn handle(&self, entry: ListingEntry);

    /// True once the handler needs no more pages
    fn is_complete(&self) -> bool {
        false
    }
}

/// Why the crawl stopped (or that it hasn't yet)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Running,
    /// A page said there are no more results
    StoppedByMarker,
    /// The handler found everything it was looking for
    StoppedByCompletion,
    /// `max_pages` pages were issued
    StoppedByPageLimit,
}

// Stop flag plus the reason it was first raised
#[derive(Debug)]
struct StopSignal {
    flag: AtomicFlag,
    state: Mutex<CrawlState>,
}

impl StopSignal {
    fn new() -> Self {
        Self {
            flag: AtomicFlag::default(),
            state: Mutex::new(CrawlState::Running),
        }
    }

    fn is_stopped(&self) -> bool {
        self.flag.get()
    }

    // First reason wins
    fn stop(&self, reason: CrawlState) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if *state == CrawlState::Running {
            *state = reason;
        }
        self.flag.set(true);
    }

    fn state(&self) -> CrawlState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

pub struct PageCrawler {
    fetcher: Fetcher,
    parser: Arc<dyn ListingParser>,
    reporter: Reporter,
    config: Config,
}

impl PageCrawler {
    /// Fails only if the listing URL can't be built from `config`.
    /// Page URLs themselves are built one at a time during the crawl.
    pub fn new(
        config: &Config,
        fetcher: Fetcher,
        parser: Arc<dyn ListingParser>,
        reporter: Reporter,
    ) -> Result<Self> {
        config.listing_url(1)?;

        Ok(Self {
            fetcher,
            parser,
            reporter,
            config: config.clone(),
        })
    }

    /// Crawls until a stop condition, then waits for every issued page
    pub async fn crawl(&self, handler: Arc<dyn ListingHandler>) -> CrawlState {
        let signal = Arc::new(StopSignal::new());
        let group = Arc::new(BoundedConcurrencyGroup::new(self.config.page_concurrency));
        let mut issued = 0;

        for page in 1..=self.config.max_pages {
            // Step 1: wait for room, at most `page_concurrency` pages in flight
            let slot = group.admit().await;

            // Step 2: a page that finished while we waited may have stopped us
            if signal.is_stopped() {
                break;
            }
            // The first page always goes out, a handler that starts out
            // complete still stops "after" a page
            if page > 1 && handler.is_complete() {
                signal.stop(CrawlState::StoppedByCompletion);
                break;
            }

            // Step 3: build this page's URL only now that it is needed
            let url = match self.config.listing_url(page) {
                Ok(url) => url,
                Err(e) => {
                    self.reporter.error(e);
                    break;
                }
            };
            issued += 1;
            debug!(page, %url, "requesting listing page");

            // Step 4: the page runs on its own, holding the slot until done
            let fetcher = self.fetcher.clone();
            let parser = Arc::clone(&self.parser);
            let reporter = self.reporter.clone();
            let handler = Arc::clone(&handler);
            let signal = Arc::clone(&signal);
            tokio::spawn(async move {
                let _slot = slot;
                crawl_page(&url, &fetcher, parser.as_ref(), &reporter, handler.as_ref(), &signal)
                    .await;
            });
        }

        // Pages already issued finish even after a stop
        group.wait().await;

        // Nothing stopped us, so we ran out of pages
        if !signal.is_stopped() {
            signal.stop(CrawlState::StoppedByPageLimit);
        }
        let state = signal.state();
        info!(pages = issued, ?state, "listing crawl finished");
        state
    }
}

async fn crawl_page(
    url: &Url,
    fetcher: &Fetcher,
    parser: &dyn ListingParser,
    reporter: &Reporter,
    handler: &dyn ListingHandler,
    signal: &StopSignal,
) {
    let body = match fetcher.get_text(url.as_str()).await {
        Ok(body) => body,
        Err(e) => {
            reporter.error(e);
            return;
        }
    };

    // The marker stops new pages, but this page's entries still count
    let page = parser.parse_listings(&body, url);
    if page.end_of_results {
        debug!(%url, "end of results");
        signal.stop(CrawlState::StoppedByMarker);
    }

    // One entry at a time, in page order
    for entry in page.entries {
        handler.handle(entry).await;
    }

    // Checked after the whole page, so every dog on it gets handled
    if handler.is_complete() {
        signal.stop(CrawlState::StoppedByCompletion);
    }
}
