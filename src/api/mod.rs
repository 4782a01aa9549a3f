//! Remote data source: the `YouTubeApi` seam, its error type, and the HTTP client.

mod wire;
mod youtube;

pub use youtube::{ApiConfig, YouTubeClient};

use crate::model::{ChannelId, CommentThread, Page, PageToken, PlaylistId, VideoId};

/// How a failed request should be treated by the paging loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The video does not accept comments. Stop paging this video.
    CommentsDisabled,
    /// This one video cannot be read (private, removed, restricted). Stop paging it, keep the run going.
    Unavailable,
    /// Bad credential or a response we cannot decode. Abort the run.
    Fatal,
    /// Network, quota, or server trouble. Worth retrying.
    Transient,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} ({reason}): {message}")]
    Status { status: u16, reason: String, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Error reasons that mean the credential itself is unusable.
const AUTH_REASONS: &[&str] = &[
    "keyInvalid",
    "keyExpired",
    "accessNotConfigured",
    "ipRefererBlocked",
    "authError",
];

/// Error reasons scoped to the requested video rather than the caller.
const VIDEO_REASONS: &[&str] = &["forbidden", "videoNotFound"];

impl ApiError {
    pub fn status(status: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Status { status, reason: reason.into(), message: message.into() }
    }

    pub fn comments_disabled() -> Self {
        Self::status(403, "commentsDisabled", "The video has disabled comments.")
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport(_) => FailureKind::Transient,
            ApiError::Malformed(_) => FailureKind::Fatal,
            ApiError::Status { status, reason, .. } => {
                if reason == "commentsDisabled" {
                    FailureKind::CommentsDisabled
                } else if VIDEO_REASONS.contains(&reason.as_str()) {
                    FailureKind::Unavailable
                } else if *status == 401 || AUTH_REASONS.contains(&reason.as_str()) {
                    FailureKind::Fatal
                } else {
                    FailureKind::Transient
                }
            }
        }
    }
}

/// The four listings the pipeline needs. Implemented over HTTP by [`YouTubeClient`];
/// tests plug in an in-memory source.
pub trait YouTubeApi: Send + Sync {
    /// Search channels by free text; returns the best hit, if any.
    fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, ApiError>;

    /// The channel's uploads playlist.
    fn uploads_playlist(&self, channel: &ChannelId) -> Result<Option<PlaylistId>, ApiError>;

    fn playlist_videos(
        &self,
        playlist: &PlaylistId,
        page_token: Option<&PageToken>,
    ) -> Result<Page<VideoId>, ApiError>;

    fn comment_threads(
        &self,
        video: &VideoId,
        page_token: Option<&PageToken>,
    ) -> Result<Page<CommentThread>, ApiError>;
}
