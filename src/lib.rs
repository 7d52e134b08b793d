// src/lib.rs
// =============================================================================
// pet-spotlight: find adoptable dogs on a rescue's listing and save their
// description, photos and videos.
//
// The public entry points are `run_dog_downloads` and `run_get_fosters`;
// everything else is exposed so a different front end (GUI, tests) can
// reuse the pieces.
//
// Module map:
// - config: where the listing lives, concurrency limits, timeouts
// - error: the Error type every stage reports
// - sync: shared state (stop flag, bounded wait group, name set, list)
// - site: HTML parsing for the listing and the dog pages
// - fetch: HTTP GET with status checking
// - crawl: the listing crawl and the per-dog page visit
// - download: files, video resolution and the download pipeline
// - report: progress/error channels
// - run: the orchestrators
// =============================================================================

pub mod config; // src/config.rs - defaults, validation, HTTP client
pub mod crawl; // src/crawl/ - listing pages and per-dog visits
pub mod download; // src/download/ - files, videos, the download batch
pub mod error; // src/error.rs - Error enum and Result alias
pub mod fetch; // src/fetch.rs - GET with status check and timeouts
pub mod report; // src/report.rs - progress and error channels
pub mod run; // src/run.rs - run_dog_downloads / run_get_fosters
pub mod site; // src/site/ - HTML parsing for the rescue's pages
pub mod sync; // src/sync/ - shared state used by concurrent tasks

#[cfg(test)]
mod test_support; // src/test_support.rs - raw TCP servers for tests

pub use config::Config;
pub use error::{Error, Result};
pub use report::Reporter;
pub use run::{missing_summary, run_dog_downloads, run_get_fosters, DownloadSummary};
