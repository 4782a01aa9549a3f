//! Channel resolution and upload enumeration. No retry here: any failure is fatal.

use crate::api::YouTubeApi;
use crate::model::{ChannelId, PageToken, VideoId};
use crate::pacing::Pacing;
use anyhow::{anyhow, Context, Result};

/// Map a handle such as `myskinq` or `@myskinq` to a channel id (first search hit).
pub fn resolve_channel(api: &dyn YouTubeApi, handle: &str, pacing: &Pacing) -> Result<ChannelId> {
    let q = handle.trim();
    if q.is_empty() {
        return Err(anyhow!("channel handle is empty"));
    }
    pacing.before_request();
    let found = api.search_channel(q).with_context(|| format!("search channel {q:?}"))?;
    pacing.after_page();
    found.ok_or_else(|| anyhow!("no channel found for {q:?}"))
}

/// All video ids of the channel's uploads playlist, in playlist order.
pub fn enumerate_videos(api: &dyn YouTubeApi, channel: &ChannelId, pacing: &Pacing) -> Result<Vec<VideoId>> {
    pacing.before_request();
    let uploads = api
        .uploads_playlist(channel)
        .with_context(|| format!("look up channel {channel}"))?
        .ok_or_else(|| anyhow!("channel {channel} has no uploads playlist"))?;

    let mut videos = Vec::new();
    let mut token: Option<PageToken> = None;
    loop {
        pacing.before_request();
        let page = api
            .playlist_videos(&uploads, token.as_ref())
            .with_context(|| format!("list playlist {uploads} (page {})", token.as_ref().map_or("first", |t| t.as_str())))?;
        videos.extend(page.items);
        pacing.after_page();

        match page.next_page_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(videos)
}
