use anyhow::Result;
use ytharvest::{init_tracing_once, ApiConfig, CommentHarvest, YouTubeClient};

const CHANNEL_HANDLE: &str = "myskinq";
const MASTER_FILE: &str = "master_comments.xlsx";
const KEYWORD_FILE: &str = "top_keywords.xlsx";

fn main() -> Result<()> {
    init_tracing_once();

    let client = YouTubeClient::new(ApiConfig::from_env()?)?;

    let summary = CommentHarvest::new()
        .channel(CHANNEL_HANDLE)
        .master_file(MASTER_FILE)
        .keyword_file(KEYWORD_FILE)
        .progress(true)
        .run(&client)?;

    println!(
        "Done: {} videos, {} comments ({} duplicates skipped), {} keywords",
        summary.videos, summary.records_accepted, summary.duplicates_skipped, summary.keyword_rows
    );
    if !summary.comments_disabled.is_empty() {
        println!("Comments disabled on {} videos", summary.comments_disabled.len());
    }
    if !summary.unavailable.is_empty() {
        println!("{} videos refused access and were skipped", summary.unavailable.len());
    }
    if !summary.is_complete() {
        println!("{} videos could not be fully scraped (see log above)", summary.incomplete.len());
    }
    Ok(())
}
