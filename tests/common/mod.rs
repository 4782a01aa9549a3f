#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use ytharvest::{
    ApiError, ChannelId, Comment, CommentThread, Page, PageToken, PlaylistId, Sleeper, VideoId, YouTubeApi,
};

/// Build a comment with deterministic fields.
pub fn comment(id: &str, text: &str) -> Comment {
    Comment {
        id: id.to_string(),
        author: format!("@author_{id}"),
        text: text.to_string(),
        like_count: 1,
        published_at: "2024-05-01T12:00:00Z".to_string(),
    }
}

/// A thread `id` with `replies` replies whose ids are `{id}.r{n}`.
pub fn thread(id: &str, replies: usize) -> CommentThread {
    CommentThread {
        top_level: comment(id, &format!("top level comment {id}")),
        replies: (0..replies).map(|n| comment(&format!("{id}.r{n}"), "reply text")).collect(),
    }
}

pub fn thread_with_text(id: &str, text: &str) -> CommentThread {
    CommentThread { top_level: comment(id, text), replies: vec![] }
}

/// Scripted comment listing of one video.
#[derive(Clone, Default)]
pub struct VideoScript {
    pub pages: Vec<Vec<CommentThread>>,
    /// Requests for this page index (and later) fail with `commentsDisabled`.
    pub disabled_from: Option<usize>,
}

/// One request seen by the fake, `(video, page_token)`.
pub type CommentCall = (String, Option<String>);

/// In-memory `YouTubeApi`. Page `n > 0` is addressed by token `p{n}`.
#[derive(Default)]
pub struct FakeApi {
    pub handle: String,
    pub channel: String,
    pub uploads: Option<String>,
    pub upload_pages: Vec<Vec<String>>,
    pub videos: HashMap<String, VideoScript>,
    /// Errors returned before serving `(video, page)`, consumed front to back.
    pub failures: Mutex<HashMap<(String, usize), VecDeque<(u16, &'static str)>>>,
    pub calls: Mutex<Vec<CommentCall>>,
}

impl FakeApi {
    pub fn new(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            channel: format!("UC_{handle}"),
            uploads: Some(format!("UU_{handle}")),
            ..Default::default()
        }
    }

    /// Add a video with the given comment pages; uploads listing gets it appended (one page).
    pub fn video(mut self, id: &str, pages: Vec<Vec<CommentThread>>) -> Self {
        self.push_upload(id);
        self.videos.insert(id.to_string(), VideoScript { pages, disabled_from: None });
        self
    }

    pub fn disabled_video(mut self, id: &str) -> Self {
        self.push_upload(id);
        self.videos.insert(id.to_string(), VideoScript { pages: vec![], disabled_from: Some(0) });
        self
    }

    pub fn fail_page(self, video: &str, page: usize, status: u16, reason: &'static str, times: usize) -> Self {
        {
            let mut f = self.failures.lock();
            let q = f.entry((video.to_string(), page)).or_default();
            for _ in 0..times {
                q.push_back((status, reason));
            }
        }
        self
    }

    fn push_upload(&mut self, id: &str) {
        if self.upload_pages.is_empty() {
            self.upload_pages.push(vec![]);
        }
        if let Some(last) = self.upload_pages.last_mut() {
            last.push(id.to_string());
        }
    }

    pub fn comment_calls(&self) -> Vec<CommentCall> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, video: &str) -> Vec<Option<String>> {
        self.comment_calls().into_iter().filter(|(v, _)| v == video).map(|(_, t)| t).collect()
    }
}

fn page_index(token: Option<&PageToken>) -> usize {
    token.and_then(|t| t.as_str().strip_prefix('p')).and_then(|n| n.parse().ok()).unwrap_or(0)
}

fn page_of<T>(items: Vec<T>, idx: usize, total: usize) -> Page<T> {
    if idx + 1 < total {
        Page::with_next(items, format!("p{}", idx + 1))
    } else {
        Page::last(items)
    }
}

impl YouTubeApi for FakeApi {
    fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, ApiError> {
        let q = query.trim_start_matches('@');
        Ok((q == self.handle).then(|| ChannelId::new(self.channel.clone())))
    }

    fn uploads_playlist(&self, channel: &ChannelId) -> Result<Option<PlaylistId>, ApiError> {
        if channel.as_str() != self.channel {
            return Ok(None);
        }
        Ok(self.uploads.clone().map(PlaylistId))
    }

    fn playlist_videos(&self, _playlist: &PlaylistId, page_token: Option<&PageToken>) -> Result<Page<VideoId>, ApiError> {
        let idx = page_index(page_token);
        let items = self.upload_pages.get(idx).cloned().unwrap_or_default().into_iter().map(VideoId).collect();
        Ok(page_of(items, idx, self.upload_pages.len().max(1)))
    }

    fn comment_threads(&self, video: &VideoId, page_token: Option<&PageToken>) -> Result<Page<CommentThread>, ApiError> {
        self.calls.lock().push((video.to_string(), page_token.map(|t| t.to_string())));
        let idx = page_index(page_token);

        if let Some(q) = self.failures.lock().get_mut(&(video.to_string(), idx)) {
            if let Some((status, reason)) = q.pop_front() {
                return Err(ApiError::status(status, reason, "injected failure"));
            }
        }

        let script = self
            .videos
            .get(video.as_str())
            .ok_or_else(|| ApiError::status(404, "videoNotFound", "unknown video"))?;
        if matches!(script.disabled_from, Some(d) if idx >= d) {
            return Err(ApiError::comments_disabled());
        }
        let items = script.pages.get(idx).cloned().unwrap_or_default();
        Ok(page_of(items, idx, script.pages.len().max(1)))
    }
}

/// Sleeper that records requested waits instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pub waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, d: Duration) {
        self.waits.lock().push(d);
    }
}

/// Read an NDJSON journal back into records.
pub fn read_journal(path: &std::path::Path) -> Vec<ytharvest::CommentRecord> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
