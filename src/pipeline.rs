use crate::api::YouTubeApi;
use crate::channel::{enumerate_videos, resolve_channel};
use crate::concurrency::for_each_ordered_limited;
use crate::config::HarvestOptions;
use crate::harvest::{HarvestOutcome, Harvester, VideoHarvest};
use crate::model::{ChannelId, VideoId};
use crate::pacing::{Pacing, RateLimiter, Sleeper, ThreadSleeper};
use crate::progress::ProgressScope;
use crate::retry::RetryPolicy;
use crate::store::{RecordStore, StoreOutputs};
use crate::util::init_tracing_once;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Result of a full run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub channel_id: Option<ChannelId>,
    pub videos: usize,
    pub pages: usize,
    pub records_accepted: u64,
    pub duplicates_skipped: u64,
    pub comments_disabled: Vec<VideoId>,
    pub unavailable: Vec<(VideoId, String)>, // video, reason
    pub incomplete: Vec<(VideoId, String)>, // video, last error
    pub keyword_rows: usize,
    pub master_written: bool,
    pub keywords_written: bool,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }
}

/// Channel → videos → comments → spreadsheets, configured by chaining.
#[derive(Clone)]
pub struct CommentHarvest {
    pub(crate) opts: HarvestOptions,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for CommentHarvest {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentHarvest {
    pub fn new() -> Self {
        Self { opts: HarvestOptions::default(), sleeper: Arc::new(ThreadSleeper) }
    }

    pub fn from_options(opts: HarvestOptions) -> Self {
        Self { opts, sleeper: Arc::new(ThreadSleeper) }
    }

    // -------- Builder methods --------
    pub fn channel(mut self, handle: impl AsRef<str>) -> Self { self.opts = self.opts.with_channel(handle); self }
    pub fn master_file(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_master_file(path); self }
    pub fn keyword_file(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_keyword_file(path); self }
    pub fn journal_file(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_journal_file(path); self }
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_dir(dir); self }
    pub fn top_keywords(mut self, n: usize) -> Self { self.opts = self.opts.with_top_keywords(n); self }
    pub fn page_delay(mut self, min: Duration, max: Duration) -> Self { self.opts = self.opts.with_page_delay(min, max); self }
    pub fn rate_limit(mut self, requests_per_second: f64) -> Self { self.opts = self.opts.with_rate_limit(requests_per_second); self }
    pub fn retry(mut self, policy: RetryPolicy) -> Self { self.opts = self.opts.with_retry(policy); self }
    pub fn concurrency(mut self, n: usize) -> Self { self.opts = self.opts.with_concurrency(n); self }
    pub fn max_videos(mut self, n: usize) -> Self { self.opts = self.opts.with_max_videos(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    /// Replace wall-clock sleeping (pacing, limiter waits, retry pauses).
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self { self.sleeper = sleeper; self }

    pub fn options(&self) -> &HarvestOptions {
        &self.opts
    }

    fn pacing(&self) -> Result<Pacing> {
        let limiter = RateLimiter::new(self.opts.requests_per_second, self.opts.concurrency)
            .context("invalid rate limit")?;
        Ok(Pacing::new(self.sleeper.clone(), self.opts.page_delay_min, self.opts.page_delay_max)
            .with_limiter(Arc::new(limiter)))
    }

    /// Run the whole pipeline against `api`.
    pub fn run(&self, api: &dyn YouTubeApi) -> Result<RunSummary> {
        init_tracing_once();
        let handle = self.opts.channel_handle.clone().ok_or_else(|| anyhow!("channel handle is required"))?;
        let pacing = self.pacing()?;

        tracing::info!("Getting channel {handle}...");
        let channel_id = resolve_channel(api, &handle, &pacing)?;

        tracing::info!("Fetching videos for {channel_id}...");
        let mut videos = enumerate_videos(api, &channel_id, &pacing)?;
        if let Some(n) = self.opts.max_videos {
            videos.truncate(n);
        }
        tracing::info!("Found {} videos", videos.len());

        let summary = self.harvest_videos(api, &videos, &pacing)?;
        Ok(RunSummary { channel_id: Some(channel_id), ..summary })
    }

    /// Harvest an explicit list of videos (skips channel resolution).
    pub fn run_videos(&self, api: &dyn YouTubeApi, videos: &[VideoId]) -> Result<RunSummary> {
        init_tracing_once();
        let pacing = self.pacing()?;
        self.harvest_videos(api, videos, &pacing)
    }

    fn harvest_videos(&self, api: &dyn YouTubeApi, videos: &[VideoId], pacing: &Pacing) -> Result<RunSummary> {
        let mut store = RecordStore::new(self.opts.journal_file.as_deref())?;
        let harvester = Harvester::new(api, pacing, &self.opts.retry);
        let pb = ProgressScope::count("Scraping", videos.len() as u64, self.opts.progress);

        let mut summary = RunSummary { videos: videos.len(), ..Default::default() };

        for_each_ordered_limited(
            videos,
            self.opts.concurrency,
            |vid| {
                tracing::info!("Scraping: {vid}");
                harvester.harvest(vid).with_context(|| format!("harvest video {vid}"))
            },
            |h: VideoHarvest| {
                let kept = store.extend(&h.records)?;
                summary.pages += h.pages;
                match h.outcome {
                    HarvestOutcome::Complete => {}
                    HarvestOutcome::CommentsDisabled => summary.comments_disabled.push(h.video_id.clone()),
                    HarvestOutcome::Unavailable { reason } => summary.unavailable.push((h.video_id.clone(), reason)),
                    HarvestOutcome::Incomplete { last_error, .. } => {
                        summary.incomplete.push((h.video_id.clone(), last_error))
                    }
                }
                pb.println(format!("Scraped {}: {} records ({} new)", h.video_id, h.records.len(), kept));
                pb.inc_items(1);
                Ok(())
            },
        )?;
        pb.finish("done");

        let outputs = StoreOutputs {
            master_file: self.opts.master_file.clone(),
            keyword_file: self.opts.keyword_file.clone(),
            top_keywords: self.opts.top_keywords,
        };
        let stored = store.finish(&outputs)?;

        summary.records_accepted = stored.accepted;
        summary.duplicates_skipped = stored.duplicates;
        summary.keyword_rows = stored.keyword_rows;
        summary.master_written = stored.master_written;
        summary.keywords_written = stored.keywords_written;

        if !summary.incomplete.is_empty() {
            tracing::warn!("{} videos are incomplete:", summary.incomplete.len());
            for (v, e) in &summary.incomplete {
                tracing::warn!("  {v}: {e}");
            }
        }
        Ok(summary)
    }
}
