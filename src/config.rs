use crate::keywords::DEFAULT_TOP_N;
use crate::retry::RetryPolicy;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct HarvestOptions {
    pub channel_handle: Option<String>, // trimmed, leading '@' kept as given
    pub master_file: PathBuf,
    pub keyword_file: PathBuf,
    pub journal_file: Option<PathBuf>, // NDJSON copy of accepted records
    pub top_keywords: usize,

    // pacing
    pub page_delay_min: Duration,
    pub page_delay_max: Duration,
    pub requests_per_second: f64, // shared token bucket, burst = concurrency
    pub retry: RetryPolicy,

    pub concurrency: usize,    // videos harvested in parallel
    pub max_videos: Option<usize>, // only the first N uploads
    pub progress: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            channel_handle: None,
            master_file: PathBuf::from("master_comments.xlsx"),
            keyword_file: PathBuf::from("top_keywords.xlsx"),
            journal_file: None,
            top_keywords: DEFAULT_TOP_N,

            page_delay_min: Duration::from_secs(1),
            page_delay_max: Duration::from_secs(3),
            requests_per_second: 1.0,
            retry: RetryPolicy::default(),

            concurrency: 1, // sequential, one request at a time
            max_videos: None,
            progress: true,
        }
    }
}

impl HarvestOptions {
    pub fn with_channel(mut self, handle: impl AsRef<str>) -> Self {
        self.channel_handle = Some(handle.as_ref().trim().to_string());
        self
    }
    pub fn with_master_file(mut self, path: impl AsRef<Path>) -> Self {
        self.master_file = path.as_ref().to_path_buf();
        self
    }
    pub fn with_keyword_file(mut self, path: impl AsRef<Path>) -> Self {
        self.keyword_file = path.as_ref().to_path_buf();
        self
    }
    pub fn with_journal_file(mut self, path: impl AsRef<Path>) -> Self {
        self.journal_file = Some(path.as_ref().to_path_buf());
        self
    }
    /// Put all three output files under `dir` with their default names.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.master_file = dir.join("master_comments.xlsx");
        self.keyword_file = dir.join("top_keywords.xlsx");
        if self.journal_file.is_some() {
            self.journal_file = Some(dir.join("master_comments.ndjson"));
        }
        self
    }
    pub fn with_top_keywords(mut self, n: usize) -> Self {
        self.top_keywords = n;
        self
    }
    pub fn with_page_delay(mut self, min: Duration, max: Duration) -> Self {
        self.page_delay_min = min;
        self.page_delay_max = max;
        self
    }
    /// Validated when the run starts; a rate that is not a positive number fails the run.
    pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }
    pub fn with_max_videos(mut self, n: usize) -> Self {
        self.max_videos = Some(n);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}
