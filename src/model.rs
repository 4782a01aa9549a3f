//! Core record types shared by the harvester, the store, and the exporters.

use serde::{Deserialize, Serialize};
use std::fmt;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Column order of the master comment table.
pub const MASTER_COLUMNS: [&str; 9] = [
    "VideoID",
    "VideoURL",
    "CommentID",
    "ParentCommentID",
    "CommentURL",
    "Author",
    "Comment",
    "Likes",
    "PublishedAt",
];

/// Column order of the keyword table.
pub const KEYWORD_COLUMNS: [&str; 2] = ["Keyword", "Frequency"];

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self { Self(s.into()) }
            pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self { Self(s.to_string()) }
        }
    };
}

opaque_id!(
    /// Stable channel identifier (`UC...`), resolved once from a handle.
    ChannelId
);
opaque_id!(
    /// The channel's "uploads" playlist.
    PlaylistId
);
opaque_id!(VideoId);
opaque_id!(
    /// Continuation token of a paginated listing. Absent on the last page.
    PageToken
);

impl VideoId {
    pub fn watch_url(&self) -> String {
        format!("{WATCH_URL}{}", self.0)
    }

    /// Permalink that opens the video with `comment_id` highlighted.
    pub fn comment_url(&self, comment_id: &str) -> String {
        format!("{}&lc={}", self.watch_url(), comment_id)
    }
}

/// One comment as delivered by the API, top-level or reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: String,
}

/// A top-level comment plus the replies embedded in the same thread item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentThread {
    pub top_level: Comment,
    pub replies: Vec<Comment>,
}

/// One page of a paginated listing.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<PageToken>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next_page_token: None }
    }
    pub fn with_next(items: Vec<T>, token: impl Into<String>) -> Self {
        Self { items, next_page_token: Some(PageToken(token.into())) }
    }
}

/// Flat row of the master table. Serialized keys match [`MASTER_COLUMNS`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "VideoID")]
    pub video_id: String,
    #[serde(rename = "VideoURL")]
    pub video_url: String,
    #[serde(rename = "CommentID")]
    pub comment_id: String,
    #[serde(rename = "ParentCommentID")]
    pub parent_comment_id: String, // empty for top-level comments
    #[serde(rename = "CommentURL")]
    pub comment_url: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Comment")]
    pub text: String,
    #[serde(rename = "Likes")]
    pub like_count: u64,
    #[serde(rename = "PublishedAt")]
    pub published_at: String,
}

impl CommentRecord {
    pub fn from_comment(video: &VideoId, comment: &Comment, parent_id: Option<&str>) -> Self {
        Self {
            video_id: video.0.clone(),
            video_url: video.watch_url(),
            comment_id: comment.id.clone(),
            parent_comment_id: parent_id.unwrap_or_default().to_string(),
            comment_url: video.comment_url(&comment.id),
            author: comment.author.clone(),
            text: comment.text.clone(),
            like_count: comment.like_count,
            published_at: comment.published_at.clone(),
        }
    }

    pub fn is_reply(&self) -> bool {
        !self.parent_comment_id.is_empty()
    }
}

/// Flatten one thread: the top-level comment first, then its replies in API order.
pub fn flatten_thread(video: &VideoId, thread: &CommentThread, out: &mut Vec<CommentRecord>) {
    let top_id = thread.top_level.id.as_str();
    out.push(CommentRecord::from_comment(video, &thread.top_level, None));
    for reply in &thread.replies {
        out.push(CommentRecord::from_comment(video, reply, Some(top_id)));
    }
}

/// A ranked keyword row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordCount {
    pub keyword: String,
    pub frequency: u64,
}
