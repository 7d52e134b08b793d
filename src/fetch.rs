// src/fetch.rs
// =============================================================================
// Thin wrapper around reqwest used by every stage of a run.
//
// Its one job is turning "the request failed" and "the server said no" into
// the same Error::Network value, so callers only ever look at one thing.
//
// Timeouts differ by what is fetched: a page must arrive whole within the
// timeout, a media download only has to keep making progress.
//
// Rust concepts:
// - Client is cheap to clone (it's an Arc inside), so Fetcher is too
// =============================================================================

use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    // How long a request may go without progress; None waits forever
    timeout: Option<Duration>,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Sets how long a request may go quiet before it fails.
    ///
    /// Pages are small, so for them this is a deadline on the whole request.
    /// Media bodies can be large, so `get` only bounds the wait for the
    /// headers and `download_to_file` bounds the gap between two chunks.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// GETs `url` and returns the response if its status is 2xx.
    ///
    /// Only the wait for the response headers is timed; reading the body
    /// is up to the caller.
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!(%url, "GET");
        let request = self.client.get(url);

        // Bound the wait for headers, not the whole transfer
        let response = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, send(request, url))
                .await
                .map_err(|_| Error::timed_out(url, timeout))??,
            None => send(request, url).await?,
        };
        Ok(response)
    }

    /// GETs `url` and reads the whole body as text, all within the timeout
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!(%url, "GET page");
        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        send(request, url)
            .await?
            .text()
            .await
            .map_err(|e| Error::transport(url, e))
    }
}

// Sends the request and turns a non-2xx status into an error
async fn send(request: RequestBuilder, url: &str) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::transport(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::status(url, status));
    }
    Ok(response)
}
