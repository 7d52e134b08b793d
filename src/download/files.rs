// src/download/files.rs
// =============================================================================
// Filesystem side of a download: directories, text files, and streaming an
// HTTP body into a file.
//
// A download that fails halfway removes what it wrote, so a file on disk
// always means a complete download.
// =============================================================================

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Creates `path` (and any missing parents). Existing directories are fine.
pub async fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io(path, e))
}

pub async fn write_text_file(content: &str, path: &Path) -> Result<()> {
    fs::write(path, content)
        .await
        .map_err(|e| Error::io(path, e))
}

/// Streams `url` into `{directory}/{file_name}` and returns the file path.
///
/// The status is checked before the file is created, so a 404 leaves
/// nothing behind. The fetcher's timeout bounds the gap between two chunks,
/// never the whole transfer: a slow body that keeps arriving is fine.
pub async fn download_to_file(
    fetcher: &Fetcher,
    url: &str,
    directory: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    // Status first: only a 2xx gets a file
    let response = fetcher.get(url).await?;
    let path = directory.join(file_name);

    let mut file = File::create(&path)
        .await
        .map_err(|e| Error::io(&path, e))?;

    // Copy chunk by chunk so a big video never sits in memory whole
    let mut body = response.bytes_stream();
    let idle = fetcher.timeout();
    let copied: Result<()> = async {
        loop {
            // Each chunk gets a fresh idle window
            let next = match idle {
                Some(idle) => tokio::time::timeout(idle, body.next())
                    .await
                    .map_err(|_| Error::timed_out(url, idle))?,
                None => body.next().await,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(|e| Error::transport(url, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::io(&path, e))?;
        }
        file.flush().await.map_err(|e| Error::io(&path, e))
    }
    .await;

    // Anything short of the full body is removed, a file on disk means
    // the download completed
    if let Err(e) = copied {
        drop(file);
        // Report the copy failure, not the cleanup
        let _ = fs::remove_file(&path).await;
        return Err(e);
    }

    Ok(path)
}
