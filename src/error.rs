// src/error.rs
// =============================================================================
// Error types for the crawl and download pipeline.
//
// There are two kinds of failure:
// - Setup errors abort a run before any request is made
// - Everything else (network, file, video extraction) is reported per item
//   on the error channel and never stops sibling work
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error for our enum
// - #[source]: keeps the underlying io::Error reachable for callers
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while crawling or downloading
#[derive(Debug, Error)]
pub enum Error {
    /// The run could not be configured (bad URL, zero concurrency, ...)
    #[error("setup error: {0}")]
    Setup(String),

    /// A fetch failed, either with a non-2xx status or in transport.
    /// `status` is 0 when no response was received at all.
    #[error("request url: {url}, status code {status}, error {message}")]
    Network {
        url: String,
        status: u16,
        message: String,
    },

    /// A directory or file could not be created or written
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The video page did not yield a downloadable stream
    #[error("failed to extract video from {url}: {reason}")]
    Extraction { url: String, reason: String },

    /// A listing entry matched a wanted name but carries no detail link.
    /// There is no URL to report, only the name as the listing shows it.
    #[error("listing entry '{name}' has no link to the dog's page")]
    MissingLink { name: String },
}

impl Error {
    /// Builds a network error from a reqwest transport failure
    pub fn transport(url: &str, error: reqwest::Error) -> Self {
        Error::Network {
            url: url.to_string(),
            status: error.status().map(|s| s.as_u16()).unwrap_or(0),
            message: error.to_string(),
        }
    }

    /// Builds a network error for a response that came back non-2xx
    pub fn status(url: &str, status: reqwest::StatusCode) -> Self {
        Error::Network {
            url: url.to_string(),
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        }
    }

    /// Builds a network error for a request that went quiet for `after`
    pub fn timed_out(url: &str, after: std::time::Duration) -> Self {
        Error::Network {
            url: url.to_string(),
            status: 0,
            message: format!("no data received for {:?}", after),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn extraction(url: &str, reason: impl Into<String>) -> Self {
        Error::Extraction {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// The URL this error is about, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Network { url, .. } | Error::Extraction { url, .. } => Some(url),
            Error::Setup(_) | Error::Io { .. } | Error::MissingLink { .. } => None,
        }
    }
}
