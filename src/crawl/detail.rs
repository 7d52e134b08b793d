// src/crawl/detail.rs
// =============================================================================
// Second crawl stage: one visit per matched dog.
//
// A visit loads the dog's own page, pulls the gallery links out of it and
// runs the download pipeline for them. The visit only counts as finished
// once that dog's downloads are all done.
//
// Which dog a page belongs to travels with the request as a CrawlContext
// value, handed over at dispatch time.
// =============================================================================

use crate::download::DownloadPipeline;
use crate::error::Error;
use crate::fetch::Fetcher;
use crate::report::Reporter;
use crate::site::DetailParser;
use crate::sync::BoundedConcurrencyGroup;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// The dog a detail request is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlContext {
    /// Normalized name, used in progress messages
    pub animal_name: String,
    /// Where this dog's files go
    pub directory: PathBuf,
}

pub struct DetailCrawler {
    fetcher: Fetcher,
    parser: Arc<dyn DetailParser>,
    pipeline: DownloadPipeline,
    reporter: Reporter,
    group: Arc<BoundedConcurrencyGroup>,
}

impl DetailCrawler {
    pub fn new(
        fetcher: Fetcher,
        parser: Arc<dyn DetailParser>,
        pipeline: DownloadPipeline,
        reporter: Reporter,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            parser,
            pipeline,
            reporter,
            group: Arc::new(BoundedConcurrencyGroup::new(concurrency)),
        }
    }

    /// Starts a visit of `url` for the dog in `context`.
    ///
    /// Waits for a free slot, then returns while the visit runs in the
    /// background. Use `wait()` to join every dispatched visit.
    pub async fn dispatch(self: &Arc<Self>, url: String, context: CrawlContext) {
        let slot = self.group.admit().await;
        let crawler = Arc::clone(self);
        tokio::spawn(async move {
            let _slot = slot;
            crawler.visit(&url, context).await;
        });
    }

    /// Waits for every dispatched visit, downloads included
    pub async fn wait(&self) {
        self.group.wait().await;
    }

    async fn visit(&self, url: &str, context: CrawlContext) {
        // Gallery links are resolved against the page they came from
        let page_url = match Url::parse(url) {
            Ok(page_url) => page_url,
            Err(e) => {
                self.reporter
                    .error(Error::extraction(url, format!("invalid dog page url: {}", e)));
                return;
            }
        };

        let body = match self.fetcher.get_text(url).await {
            Ok(body) => body,
            Err(e) => {
                self.reporter.error(e);
                return;
            }
        };

        // An empty gallery is fine, the batch just finishes at once
        let media = self.parser.parse_detail(&body, &page_url);
        self.reporter
            .progress(format!("Downloading {}...", context.animal_name));

        // The slot taken in dispatch() is held until every file is done
        let outcome = self
            .pipeline
            .run(&context.directory, &media.image_urls, &media.video_urls)
            .await;
        info!(
            dog = %context.animal_name,
            downloaded = outcome.downloaded,
            failed = outcome.failed,
            "media batch finished"
        );
    }
}
