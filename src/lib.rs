mod config;
mod model;
mod retry;
mod pacing;

pub mod api;
mod channel;
mod harvest;

mod keywords;
mod store;
mod export;
mod ndjson;

mod concurrency;
mod progress;
mod util;
mod pipeline;

pub use crate::config::HarvestOptions;
pub use crate::model::{
    ChannelId, Comment, CommentRecord, CommentThread, KeywordCount, Page, PageToken, PlaylistId, VideoId,
    KEYWORD_COLUMNS, MASTER_COLUMNS,
};
pub use crate::pipeline::{CommentHarvest, RunSummary};

// Expose the remote-source seam so callers can plug in their own client.
pub use crate::api::{ApiConfig, ApiError, FailureKind, YouTubeApi, YouTubeClient};

// Expose the individual stages for callers that drive the pipeline themselves.
pub use crate::channel::{enumerate_videos, resolve_channel};
pub use crate::harvest::{HarvestOutcome, Harvester, VideoHarvest};
pub use crate::pacing::{Pacing, RateLimiter, Sleeper, ThreadSleeper};
pub use crate::retry::RetryPolicy;

// export store, keyword counter, and spreadsheet writers
pub use crate::store::{RecordStore, StoreOutputs, StoreSummary};
pub use crate::keywords::{clean_text, KeywordCounter, DEFAULT_TOP_N, STOPWORDS};
pub use crate::export::{write_keywords, MasterSheet};

pub use crate::util::init_tracing_once;
