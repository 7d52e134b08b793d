// src/config.rs
// =============================================================================
// Run configuration: where the listing lives and how hard we hit it.
//
// The defaults point at the rescue's real listing. Tests swap `base_url` and
// `video_info_url` for a local mock server.
// =============================================================================

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.petstablished.com";
pub const DEFAULT_ORGANIZATION_PATH: &str = "/organization/80925";
pub const DEFAULT_VIDEO_INFO_URL: &str = "http://youtube.com/get_video_info";

/// Listing pages are requested as `{base}{organization}/widget/dogs?page=N`
const WIDGET_PAGE_PATH: &str = "/widget/dogs";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub organization_path: String,
    /// Endpoint the video resolver asks for stream metadata
    pub video_info_url: String,
    /// Hard cap on listing pages, the crawl never goes past this one
    pub max_pages: usize,
    /// Listing pages and detail pages in flight at once
    pub page_concurrency: usize,
    /// Media downloads in flight at once, per animal
    pub download_concurrency: usize,
    /// How long a request may go without progress: the connect, a whole
    /// page, or the gap between two chunks of a media body. `None` waits forever
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            organization_path: DEFAULT_ORGANIZATION_PATH.to_string(),
            video_info_url: DEFAULT_VIDEO_INFO_URL.to_string(),
            max_pages: 100,
            page_concurrency: 10,
            download_concurrency: 5,
            request_timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("pet-spotlight/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Checks everything that would make a run impossible.
    /// Called before any request is issued.
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(Error::Setup("max pages must be at least 1".to_string()));
        }
        if self.page_concurrency == 0 {
            return Err(Error::Setup("page concurrency must be at least 1".to_string()));
        }
        if self.download_concurrency == 0 {
            return Err(Error::Setup(
                "download concurrency must be at least 1".to_string(),
            ));
        }
        self.listing_url(1)?;
        Url::parse(&self.video_info_url).map_err(|e| {
            Error::Setup(format!("invalid video info url '{}': {}", self.video_info_url, e))
        })?;
        Ok(())
    }

    /// URL of listing page `page` (1-based)
    pub fn listing_url(&self, page: usize) -> Result<Url> {
        let raw = format!(
            "{}{}{}?page={}",
            self.base_url.trim_end_matches('/'),
            self.organization_path,
            WIDGET_PAGE_PATH,
            page
        );
        Url::parse(&raw).map_err(|e| Error::Setup(format!("invalid listing url '{}': {}", raw, e)))
    }

    /// Builds the HTTP client shared by every stage of a run.
    ///
    /// Only connecting is timed here. A client-wide `timeout` would also cut
    /// off a large video that is still streaming in.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.request_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| Error::Setup(format!("failed to build HTTP client: {}", e)))
    }

    /// The shared client wrapped with the per-request timeouts
    pub fn fetcher(&self) -> Result<Fetcher> {
        Ok(Fetcher::new(self.http_client()?).with_timeout(self.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url() {
        let config = Config::default();
        assert_eq!(
            config.listing_url(3).unwrap().as_str(),
            "https://www.petstablished.com/organization/80925/widget/dogs?page=3"
        );
    }

    #[test]
    fn test_listing_url_trailing_slash() {
        let config = Config {
            base_url: "http://127.0.0.1:8080/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.listing_url(1).unwrap().as_str(),
            "http://127.0.0.1:8080/organization/80925/widget/dogs?page=1"
        );
    }

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_setup_error() {
        let config = Config {
            download_concurrency: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Setup(_))));
    }

    #[test]
    fn test_bad_base_url_is_setup_error() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Setup(_))));
    }

    #[test]
    fn test_fetcher_carries_timeout() {
        let config = Config {
            request_timeout: Some(Duration::from_secs(7)),
            ..Config::default()
        };
        assert_eq!(config.fetcher().unwrap().timeout(), Some(Duration::from_secs(7)));

        let config = Config {
            request_timeout: None,
            ..Config::default()
        };
        assert_eq!(config.fetcher().unwrap().timeout(), None);
    }
}
