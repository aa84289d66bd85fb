//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and status-preserving error mapping. Non-2xx responses surface as
//! [`YoutubeError::Api`] carrying the upstream status and `error.message`.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use yolix_core::{AppConfig, VideoMetadata};

use crate::error::YoutubeError;
use crate::types::{CommentThreadListResponse, VideoListResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest `maxResults` the `commentThreads` endpoint accepts.
pub const MAX_RESULTS_PER_PAGE: u32 = 100;

/// Default pause between consecutive comment page requests.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 100;

/// Client for the `YouTube` Data API.
///
/// Use [`YoutubeClient::new`] for production or [`YoutubeClient::with_base_url`]
/// to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
    pub(crate) page_delay_ms: u64,
    pub(crate) max_pages: Option<usize>,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute hierarchical URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("yolix/0.1 (comment-analysis)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(YoutubeError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            max_pages: None,
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Config`] if `YOUTUBE_API_KEY` is not set, or any
    /// error from [`YoutubeClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, YoutubeError> {
        let api_key = config.youtube_api_key()?;
        Ok(
            Self::with_base_url(api_key, config.http_timeout_secs, &config.youtube_base_url)?
                .with_page_delay_ms(config.page_delay_ms)
                .with_max_pages(config.max_pages),
        )
    }

    /// Sets the fixed pause inserted between comment page requests.
    #[must_use]
    pub fn with_page_delay_ms(mut self, page_delay_ms: u64) -> Self {
        self.page_delay_ms = page_delay_ms;
        self
    }

    /// Caps the number of comment pages fetched per collection. `None`
    /// follows the cursor until the API stops returning one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetches title and thumbnail for one video.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::NotFound`] if the API returns zero items.
    /// - [`YoutubeError::Api`] on a non-2xx status.
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the body has an unexpected shape.
    pub async fn fetch_video_metadata(
        &self,
        video_id: &str,
    ) -> Result<VideoMetadata, YoutubeError> {
        let url = self.build_url("videos", &[("id", video_id)]);
        let response: VideoListResponse = self
            .request_json(&url, &format!("videos(id={video_id})"))
            .await?;

        let video = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YoutubeError::NotFound {
                video_id: video_id.to_owned(),
            })?;

        Ok(video.into_metadata())
    }

    /// Fetches one page of top-level comment threads.
    ///
    /// `page_token` is the continuation cursor from the previous page, or
    /// `None` for the first page.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::Api`] on a non-2xx status (e.g. comments disabled).
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the body has an unexpected shape.
    pub async fn fetch_comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentThreadListResponse, YoutubeError> {
        let max_results = MAX_RESULTS_PER_PAGE.to_string();
        let mut params = vec![("videoId", video_id), ("maxResults", max_results.as_str())];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let url = self.build_url("commentThreads", &params);
        self.request_json(&url, &format!("commentThreads(videoId={video_id})"))
            .await
    }

    /// Builds `{base}/{resource}?part=snippet&…&key=…` with every value
    /// percent-encoded.
    pub(crate) fn build_url(&self, resource: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("part", "snippet");
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request and decodes a 2xx JSON body into `T`.
    ///
    /// `context` names the call in errors; it must not include the API key.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body);
            tracing::warn!(
                status = status.as_u16(),
                %context,
                %message,
                "YouTube API returned an error"
            );
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Pulls `error.message` out of a Google API error envelope, falling back to
/// a truncated copy of the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| yolix_core::body_snippet(body))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
