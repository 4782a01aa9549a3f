use super::wire::{
    error_from_body, ChannelListResponse, CommentThreadListResponse, PlaylistItemListResponse, SearchListResponse,
};
use super::{ApiError, YouTubeApi};
use crate::model::{ChannelId, CommentThread, Page, PageToken, PlaylistId, VideoId};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
/// The credential travels as a header so it never appears in request URLs.
const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Connection settings for [`YouTubeClient`].
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub comment_page_size: u32, // API maximum is 100
    pub playlist_page_size: u32, // API maximum is 50
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("comment_page_size", &self.comment_page_size)
            .field("playlist_page_size", &self.playlist_page_size)
            .finish()
    }
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            comment_page_size: 100,
            playlist_page_size: 50,
        }
    }

    /// Read the credential from `YOUTUBE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("{API_KEY_ENV} is not set"))?;
        Ok(Self::new(key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn with_page_sizes(mut self, comments: u32, playlist: u32) -> Self {
        self.comment_page_size = comments.clamp(1, 100);
        self.playlist_page_size = playlist.clamp(1, 50);
        self
    }
}

/// Blocking HTTP implementation of [`YouTubeApi`] over the Data API v3.
pub struct YouTubeClient {
    http: reqwest::blocking::Client,
    cfg: ApiConfig,
}

impl YouTubeClient {
    pub fn new(cfg: ApiConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(cfg.timeout)
            .user_agent(concat!("ytharvest/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, cfg })
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.cfg.base_url, endpoint);
        tracing::debug!(endpoint, ?params, "GET");

        let resp = self
            .http
            .get(&url)
            .query(params)
            .header(API_KEY_HEADER, self.cfg.api_key.as_str())
            .send()
            .map_err(reqwest::Error::without_url)?;
        let status = resp.status();
        let body = resp.text().map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(format!("{endpoint}: {e}")))
    }
}

impl YouTubeApi for YouTubeClient {
    fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, ApiError> {
        let resp: SearchListResponse = self.get_json(
            "search",
            &[("part", "snippet"), ("q", query), ("type", "channel"), ("maxResults", "1")],
        )?;
        Ok(resp.first_channel())
    }

    fn uploads_playlist(&self, channel: &ChannelId) -> Result<Option<PlaylistId>, ApiError> {
        let resp: ChannelListResponse =
            self.get_json("channels", &[("part", "contentDetails"), ("id", channel.as_str())])?;
        Ok(resp.uploads())
    }

    fn playlist_videos(
        &self,
        playlist: &PlaylistId,
        page_token: Option<&PageToken>,
    ) -> Result<Page<VideoId>, ApiError> {
        let max = self.cfg.playlist_page_size.to_string();
        let mut params = vec![("part", "contentDetails"), ("playlistId", playlist.as_str()), ("maxResults", max.as_str())];
        if let Some(t) = page_token {
            params.push(("pageToken", t.as_str()));
        }
        let resp: PlaylistItemListResponse = self.get_json("playlistItems", &params)?;
        Ok(resp.into())
    }

    fn comment_threads(
        &self,
        video: &VideoId,
        page_token: Option<&PageToken>,
    ) -> Result<Page<CommentThread>, ApiError> {
        let max = self.cfg.comment_page_size.to_string();
        let mut params = vec![
            ("part", "snippet,replies"),
            ("videoId", video.as_str()),
            ("maxResults", max.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(t) = page_token {
            params.push(("pageToken", t.as_str()));
        }
        let resp: CommentThreadListResponse = self.get_json("commentThreads", &params)?;
        Ok(resp.into())
    }
}
