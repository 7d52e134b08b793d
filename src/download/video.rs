// src/download/video.rs
// =============================================================================
// Turns a video page link (https://www.youtube.com/watch?v=XXXXXXXXXXX) into
// a URL we can stream an mp4 from.
//
// How it works:
// 1. Take the 11 character id after "?v="
// 2. Ask the info endpoint about it: {info_url}?video_id={id}
// 3. The answer is a form-encoded body; its `player_response` field is JSON
// 4. Pick streamingData.formats[] with itag 22 (720p mp4), else itag 18 (360p)
// 5. That format's url is percent-encoded once more, decode it
// =============================================================================

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use serde::Deserialize;
use url::Url;

const VIDEO_ID_MARKER: &str = "?v=";
const VIDEO_ID_LEN: usize = 11;
const PLAYER_RESPONSE_FIELD: &str = "player_response";

/// mp4, 720p
const ITAG_PREFERRED: u32 = 22;
/// mp4, 360p
const ITAG_FALLBACK: u32 = 18;

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    #[serde(rename = "streamingData", default)]
    streaming_data: StreamingData,
}

#[derive(Debug, Default, Deserialize)]
struct StreamingData {
    #[serde(default)]
    formats: Vec<Format>,
}

#[derive(Debug, Deserialize)]
struct Format {
    itag: u32,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Clone)]
pub struct VideoResolver {
    fetcher: Fetcher,
    info_url: String,
}

impl VideoResolver {
    pub fn new(fetcher: Fetcher, info_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            info_url: info_url.into(),
        }
    }

    /// Resolves `video_page_url` to a direct stream URL
    pub async fn resolve(&self, video_page_url: &str) -> Result<String> {
        let id = video_id(video_page_url)
            .ok_or_else(|| Error::extraction(video_page_url, "no video id after '?v='"))?;

        let mut info_url = Url::parse(&self.info_url)
            .map_err(|e| Error::extraction(video_page_url, format!("bad info url: {}", e)))?;
        info_url.query_pairs_mut().append_pair("video_id", id);

        let body = self.fetcher.get_text(info_url.as_str()).await?;
        let stream_url = stream_url_from_info(&body)
            .map_err(|reason| Error::extraction(video_page_url, reason))?;

        urlencoding::decode(&stream_url)
            .map(|decoded| decoded.into_owned())
            .map_err(|e| Error::extraction(video_page_url, format!("bad stream url: {}", e)))
    }
}

/// The 11 character id following `?v=`, if there is one
pub fn video_id(video_page_url: &str) -> Option<&str> {
    let start = video_page_url.find(VIDEO_ID_MARKER)? + VIDEO_ID_MARKER.len();
    video_page_url.get(start..start + VIDEO_ID_LEN)
}

// Errors are plain strings here, the caller attaches the page URL
fn stream_url_from_info(body: &str) -> std::result::Result<String, String> {
    let player_response = url::form_urlencoded::parse(body.as_bytes())
        .find(|(key, _)| key == PLAYER_RESPONSE_FIELD)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| format!("missing {} field", PLAYER_RESPONSE_FIELD))?;

    let parsed: PlayerResponse = serde_json::from_str(&player_response)
        .map_err(|e| format!("invalid {}: {}", PLAYER_RESPONSE_FIELD, e))?;

    select_stream(&parsed.streaming_data.formats)
        .map(str::to_string)
        .ok_or_else(|| "no mp4 format available".to_string())
}

fn select_stream(formats: &[Format]) -> Option<&str> {
    let with_tag = |itag: u32| {
        formats
            .iter()
            .find(|f| f.itag == itag && !f.url.is_empty())
            .map(|f| f.url.as_str())
    };
    with_tag(ITAG_PREFERRED).or_else(|| with_tag(ITAG_FALLBACK))
}
