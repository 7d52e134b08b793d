// src/download/mod.rs
// =============================================================================
// Getting a dog's media onto disk.
//
// Submodules:
// - files: directories, description.txt, streaming a URL into a file
// - video: resolving a video page link to a downloadable mp4
// - pipeline: bounded, failure-isolated download of a whole batch
// =============================================================================

mod files; // src/download/files.rs - directories, text files, streaming a body to disk
mod pipeline; // src/download/pipeline.rs - one dog's bounded download batch
mod video; // src/download/video.rs - watch page to stream URL

pub use files::{create_directory, download_to_file, write_text_file};
pub use pipeline::{BatchOutcome, DownloadPipeline, MediaItem, MediaKind};
pub use video::{video_id, VideoResolver};
