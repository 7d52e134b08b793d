// src/run.rs
// =============================================================================
// The two things a caller can ask for:
//
// run_dog_downloads
//   1. Build the set of wanted names from a comma separated list
//   2. Crawl the listing; for every wanted dog write description.txt and
//      dispatch a visit of its own page (which downloads its media)
//   3. Wait for the listing crawl, then for every visit and download
//   4. Send a last progress line naming whoever was never found
//
// run_get_fosters
//   Same listing crawl, but just collects every dog whose action button
//   offers fostering.
//
// Per-item failures go to the error channel. Only setup problems (bad
// config, no HTTP client) come back as Err, before any request is made.
// =============================================================================

use crate::config::Config;
use crate::crawl::{CrawlContext, CrawlState, DetailCrawler, ListingHandler, PageCrawler};
use crate::download::{create_directory, write_text_file, DownloadPipeline, VideoResolver};
use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::site::{build_description, ListingEntry, PetstablishedMarkup};
use crate::sync::{normalize_name, NameMatchSet, ThreadSafeList};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

const DESCRIPTION_FILE: &str = "description.txt";
const FOSTER_TEXT: &str = "Foster";

/// What a download run ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Requested names that never showed up, sorted
    pub missing: Vec<String>,
    pub state: CrawlState,
}

/// Finds the dogs named in `names` (comma separated) and downloads their
/// description, photos and videos under `base_directory`.
///
/// `progress` is closed when this returns. Drain `errors` for as long as
/// the run lasts.
pub async fn run_dog_downloads(
    names: &str,
    base_directory: impl AsRef<Path>,
    config: &Config,
    progress: UnboundedSender<String>,
    errors: UnboundedSender<Error>,
) -> Result<DownloadSummary> {
    // Setup: everything that can fail does so here, before any request
    config.validate()?;
    let fetcher = config.fetcher()?;
    let reporter = Reporter::new(progress, errors);
    let markup = Arc::new(PetstablishedMarkup::new());

    // Build the stages back to front: downloads, dog pages, listing

    let pipeline = DownloadPipeline::new(
        fetcher.clone(),
        VideoResolver::new(fetcher.clone(), config.video_info_url.clone()),
        reporter.clone(),
        config.download_concurrency,
    );
    let details = Arc::new(DetailCrawler::new(
        fetcher.clone(),
        markup.clone(),
        pipeline,
        reporter.clone(),
        config.page_concurrency,
    ));
    let pages = PageCrawler::new(config, fetcher, markup, reporter.clone())?;

    // The wanted names, each found at most once
    let matches = Arc::new(NameMatchSet::from_comma_separated(names));
    info!(wanted = matches.len(), "starting dog downloads");

    let handler = Arc::new(DownloadHandler {
        matches: Arc::clone(&matches),
        base_directory: base_directory.as_ref().to_path_buf(),
        reporter: reporter.clone(),
        details: Arc::clone(&details),
    });

    // The listing crawl only dispatches visits, so wait for those too
    let state = pages.crawl(handler).await;
    details.wait().await;

    // Whoever was never matched goes in the last progress line
    let mut missing = matches.get_missing();
    missing.sort();
    reporter.progress(missing_summary(&missing));

    Ok(DownloadSummary { missing, state })
}

/// Lists every dog currently offered for fostering, in no particular order
pub async fn run_get_fosters(
    config: &Config,
    errors: UnboundedSender<Error>,
) -> Result<Vec<String>> {
    config.validate()?;
    let fetcher = config.fetcher()?;
    let pages = PageCrawler::new(
        config,
        fetcher,
        Arc::new(PetstablishedMarkup::new()),
        Reporter::errors_only(errors),
    )?;

    // No dog pages to visit here, the listing has everything we need
    let handler = Arc::new(FosterHandler {
        fosters: ThreadSafeList::new(),
    });
    let state = pages.crawl(handler.clone()).await;

    let fosters = handler.fosters.get();
    info!(count = fosters.len(), ?state, "foster lookup finished");
    Ok(fosters)
}

/// The last progress line of a download run. `missing` must be sorted.
pub fn missing_summary(missing: &[String]) -> String {
    if missing.is_empty() {
        "\nFound all dogs".to_string()
    } else {
        format!("\nFailed to find:\n{}", missing.join("\n"))
    }
}

// Normalized names double as directory names, keep them one level deep
fn directory_name(normalized: &str) -> String {
    normalized.replace(['/', '\\'], "-")
}

struct DownloadHandler {
    matches: Arc<NameMatchSet>,
    base_directory: PathBuf,
    reporter: Reporter,
    details: Arc<DetailCrawler>,
}

#[async_trait]
impl ListingHandler for DownloadHandler {
    async fn handle(&self, entry: ListingEntry) {
        // Step 1: is this one of ours? Marks the name found if so
        let name = normalize_name(&entry.name);
        if !self.matches.is_match(&name) {
            return;
        }
        self.reporter.progress(format!("Found {}", entry.name));

        // Step 2: a directory per dog, holding its description
        let directory = self.base_directory.join(directory_name(&name));
        if let Err(e) = create_directory(&directory).await {
            self.reporter.error(e);
            return;
        }

        let description = build_description(&entry.description);
        if let Err(e) = write_text_file(&description, &directory.join(DESCRIPTION_FILE)).await {
            self.reporter.error(e);
            return;
        }

        // Step 3: photos and videos live on the dog's own page
        match entry.link {
            Some(link) => {
                let context = CrawlContext {
                    animal_name: name,
                    directory,
                };
                self.details.dispatch(link, context).await;
            }
            None => self.reporter.error(Error::MissingLink { name: entry.name }),
        }
    }

    fn is_complete(&self) -> bool {
        self.matches.is_complete()
    }
}

struct FosterHandler {
    fosters: ThreadSafeList,
}

#[async_trait]
impl ListingHandler for FosterHandler {
    async fn handle(&self, entry: ListingEntry) {
        if entry.action.contains(FOSTER_TEXT) {
            self.fosters.add(entry.name.trim());
        }
    }
}
