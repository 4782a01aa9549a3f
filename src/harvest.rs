//! Per-video comment harvesting: walk every comment-thread page of one video,
//! flatten threads into records, and survive the failures we know how to survive.

use crate::api::{ApiError, FailureKind, YouTubeApi};
use crate::model::{flatten_thread, CommentRecord, PageToken, VideoId};
use crate::pacing::Pacing;
use crate::retry::RetryPolicy;

/// How paging of one video ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HarvestOutcome {
    /// Every page was fetched.
    Complete,
    /// The video has comments turned off; records hold whatever came before.
    CommentsDisabled,
    /// The video refused access; records hold whatever came before.
    Unavailable { reason: String },
    /// A page kept failing until the retry budget ran out.
    Incomplete { attempts: u32, last_error: String },
}

/// Records of one video plus how the walk ended.
#[derive(Clone, Debug)]
pub struct VideoHarvest {
    pub video_id: VideoId,
    pub records: Vec<CommentRecord>,
    pub pages: usize,
    pub outcome: HarvestOutcome,
}

pub struct Harvester<'a> {
    api: &'a dyn YouTubeApi,
    pacing: &'a Pacing,
    retry: &'a RetryPolicy,
}

impl<'a> Harvester<'a> {
    pub fn new(api: &'a dyn YouTubeApi, pacing: &'a Pacing, retry: &'a RetryPolicy) -> Self {
        Self { api, pacing, retry }
    }

    /// Fetch all top-level comments and their embedded replies for `video`.
    ///
    /// Only fatal errors (bad credential, undecodable response) are returned as `Err`.
    pub fn harvest(&self, video: &VideoId) -> Result<VideoHarvest, ApiError> {
        let mut records = Vec::new();
        let mut token: Option<PageToken> = None;
        let mut pages = 0usize;
        let mut retry = 0u32;

        let outcome = loop {
            self.pacing.before_request();
            match self.api.comment_threads(video, token.as_ref()) {
                Ok(page) => {
                    retry = 0;
                    pages += 1;
                    for thread in &page.items {
                        flatten_thread(video, thread, &mut records);
                    }
                    tracing::debug!(video = %video, page = pages, threads = page.items.len(), "comment page");
                    self.pacing.after_page();

                    match page.next_page_token {
                        Some(next) => token = Some(next),
                        None => break HarvestOutcome::Complete,
                    }
                }
                Err(e) => match e.kind() {
                    FailureKind::CommentsDisabled => {
                        tracing::info!("Comments disabled for {video}");
                        break HarvestOutcome::CommentsDisabled;
                    }
                    FailureKind::Unavailable => {
                        tracing::warn!("Skipping {video}: {e}");
                        break HarvestOutcome::Unavailable { reason: e.to_string() };
                    }
                    FailureKind::Fatal => return Err(e),
                    FailureKind::Transient => {
                        retry += 1;
                        match self.retry.delay_for(retry) {
                            Some(wait) => {
                                tracing::warn!(video = %video, retry, ?wait, "Error: {e}");
                                self.pacing.sleep(wait);
                            }
                            None => {
                                tracing::error!(video = %video, attempts = retry, "giving up on page: {e}");
                                break HarvestOutcome::Incomplete { attempts: retry, last_error: e.to_string() };
                            }
                        }
                    }
                },
            }
        };

        Ok(VideoHarvest { video_id: video.clone(), records, pages, outcome })
    }
}
