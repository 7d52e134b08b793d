// src/download/pipeline.rs
// =============================================================================
// Downloads every image and video of one dog into its directory.
//
// Each file is its own tokio task, admitted through a BoundedConcurrencyGroup
// so only a handful of downloads run at once. A failed file is reported on
// the error channel and that's it: no retry, and its siblings carry on.
//
// run() returns once every task of the batch has finished, failed or not.
// =============================================================================

use super::files::download_to_file;
use super::video::VideoResolver;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::report::Reporter;
use crate::sync::BoundedConcurrencyGroup;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One file to fetch for a dog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub url: String,
    pub file_name: String,
    pub kind: MediaKind,
}

impl MediaItem {
    /// Names images `image-{i}.png` and videos `video-{i}.mp4`, where `i`
    /// is the position within their own list.
    pub fn batch(image_urls: &[String], video_urls: &[String]) -> Vec<MediaItem> {
        let images = image_urls.iter().enumerate().map(|(i, url)| MediaItem {
            url: url.clone(),
            file_name: format!("image-{}.png", i),
            kind: MediaKind::Image,
        });
        let videos = video_urls.iter().enumerate().map(|(i, url)| MediaItem {
            url: url.clone(),
            file_name: format!("video-{}.mp4", i),
            kind: MediaKind::Video,
        });
        images.chain(videos).collect()
    }
}

/// How one batch went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub downloaded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct DownloadPipeline {
    fetcher: Fetcher,
    videos: VideoResolver,
    reporter: Reporter,
    concurrency: usize,
}

impl DownloadPipeline {
    pub fn new(
        fetcher: Fetcher,
        videos: VideoResolver,
        reporter: Reporter,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            videos,
            reporter,
            concurrency,
        }
    }

    /// Downloads all of `image_urls` and `video_urls` into `directory`
    pub async fn run(
        &self,
        directory: &Path,
        image_urls: &[String],
        video_urls: &[String],
    ) -> BatchOutcome {
        // One group per batch: the limit applies per dog
        let group = Arc::new(BoundedConcurrencyGroup::new(self.concurrency));
        let downloaded = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));

        for item in MediaItem::batch(image_urls, video_urls) {
            // Blocks here while `concurrency` files are already in flight
            let slot = group.admit().await;

            // Each task gets its own handles; Fetcher and Reporter are cheap clones
            let pipeline = self.clone();
            let directory = directory.to_path_buf();
            let downloaded = Arc::clone(&downloaded);
            let failed = Arc::clone(&failed);

            tokio::spawn(async move {
                // Held until the task ends, success or not
                let _slot = slot;
                match pipeline.fetch(&item, &directory).await {
                    Ok(path) => {
                        debug!(path = %path.display(), "downloaded");
                        downloaded.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => {
                        // Report and move on; siblings are not affected
                        failed.fetch_add(1, Ordering::SeqCst);
                        pipeline.reporter.error(e);
                    }
                }
            });
        }

        // Every task of this batch, not just the last admitted one
        group.wait().await;

        BatchOutcome {
            downloaded: downloaded.load(Ordering::SeqCst),
            failed: failed.load(Ordering::SeqCst),
        }
    }

    async fn fetch(&self, item: &MediaItem, directory: &Path) -> Result<PathBuf> {
        // Videos point at a watch page, the stream URL has to be looked up
        let url = match item.kind {
            MediaKind::Image => item.url.clone(),
            MediaKind::Video => self.videos.resolve(&item.url).await?,
        };
        download_to_file(&self.fetcher, &url, directory, &item.file_name).await
    }
}
