//! Serde shapes of the YouTube Data API v3 responses we consume.
//! Only the fields we read are declared; everything else is ignored.

use crate::api::ApiError;
use crate::model::{ChannelId, Comment, CommentThread, Page, PageToken, PlaylistId, VideoId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResource {
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<CommentThreadResource>,
}

#[derive(Debug, Deserialize)]
pub struct CommentThreadResource {
    pub snippet: CommentThreadSnippet,
    pub replies: Option<CommentThreadReplies>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: CommentResource,
}

#[derive(Debug, Deserialize)]
pub struct CommentThreadReplies {
    #[serde(default)]
    pub comments: Vec<CommentResource>,
}

#[derive(Debug, Deserialize)]
pub struct CommentResource {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default)]
    pub author_display_name: String, // absent for deleted channels
    pub text_display: String,
    pub like_count: u64,
    pub published_at: String,
}

/// `{"error": {"code": 403, "message": "...", "errors": [{"reason": "..."}]}}`
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}

/// Build an [`ApiError`] from a non-2xx body. Bodies that are not the
/// standard envelope still produce a status error carrying the raw text.
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(env) => {
            let reason = env.error.errors.first().map(|d| d.reason.clone()).unwrap_or_default();
            ApiError::status(status, reason, env.error.message)
        }
        Err(_) => ApiError::status(status, "", body.trim()),
    }
}

impl From<CommentResource> for Comment {
    fn from(c: CommentResource) -> Self {
        Comment {
            id: c.id,
            author: c.snippet.author_display_name,
            text: c.snippet.text_display,
            like_count: c.snippet.like_count,
            published_at: c.snippet.published_at,
        }
    }
}

impl SearchListResponse {
    pub fn first_channel(self) -> Option<ChannelId> {
        self.items.into_iter().next().map(|r| ChannelId(r.snippet.channel_id))
    }
}

impl ChannelListResponse {
    pub fn uploads(self) -> Option<PlaylistId> {
        self.items
            .into_iter()
            .next()
            .and_then(|c| c.content_details.related_playlists.uploads)
            .map(PlaylistId)
    }
}

impl From<PlaylistItemListResponse> for Page<VideoId> {
    fn from(r: PlaylistItemListResponse) -> Self {
        Page {
            items: r.items.into_iter().map(|i| VideoId(i.content_details.video_id)).collect(),
            next_page_token: non_empty_token(r.next_page_token),
        }
    }
}

impl From<CommentThreadListResponse> for Page<CommentThread> {
    fn from(r: CommentThreadListResponse) -> Self {
        let items = r
            .items
            .into_iter()
            .map(|t| CommentThread {
                top_level: t.snippet.top_level_comment.into(),
                replies: t
                    .replies
                    .map(|r| r.comments.into_iter().map(Comment::from).collect())
                    .unwrap_or_default(),
            })
            .collect();
        Page { items, next_page_token: non_empty_token(r.next_page_token) }
    }
}

fn non_empty_token(t: Option<String>) -> Option<PageToken> {
    t.filter(|s| !s.is_empty()).map(PageToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FailureKind;

    #[test]
    fn decodes_comment_threads_with_replies() {
        let body = r#"{
            "kind": "youtube#commentThreadListResponse",
            "nextPageToken": "QURTSl9p",
            "items": [
                {
                    "id": "Ugz1",
                    "snippet": {
                        "videoId": "vid1",
                        "topLevelComment": {
                            "id": "Ugz1",
                            "snippet": {
                                "authorDisplayName": "@ann",
                                "textDisplay": "Great video",
                                "likeCount": 7,
                                "publishedAt": "2024-03-01T10:00:00Z"
                            }
                        },
                        "totalReplyCount": 1
                    },
                    "replies": {
                        "comments": [
                            {
                                "id": "Ugz1.r1",
                                "snippet": {
                                    "authorDisplayName": "@bob",
                                    "textDisplay": "Agreed",
                                    "likeCount": 0,
                                    "publishedAt": "2024-03-01T11:00:00Z"
                                }
                            }
                        ]
                    }
                },
                {
                    "id": "Ugz2",
                    "snippet": {
                        "topLevelComment": {
                            "id": "Ugz2",
                            "snippet": {
                                "authorDisplayName": "@cat",
                                "textDisplay": "First",
                                "likeCount": 1,
                                "publishedAt": "2024-03-02T10:00:00Z"
                            }
                        }
                    }
                }
            ]
        }"#;
        let resp: CommentThreadListResponse = serde_json::from_str(body).unwrap();
        let page: Page<CommentThread> = resp.into();

        assert_eq!(page.next_page_token, Some(PageToken::from("QURTSl9p")));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].top_level.author, "@ann");
        assert_eq!(page.items[0].top_level.like_count, 7);
        assert_eq!(page.items[0].replies.len(), 1);
        assert_eq!(page.items[0].replies[0].id, "Ugz1.r1");
        assert!(page.items[1].replies.is_empty());
    }

    #[test]
    fn decodes_playlist_and_channel_lookups() {
        let playlist: PlaylistItemListResponse = serde_json::from_str(
            r#"{"items":[{"contentDetails":{"videoId":"a"}},{"contentDetails":{"videoId":"b"}}]}"#,
        )
        .unwrap();
        let page: Page<VideoId> = playlist.into();
        assert_eq!(page.items, vec![VideoId::from("a"), VideoId::from("b")]);
        assert!(page.next_page_token.is_none());

        let channels: ChannelListResponse = serde_json::from_str(
            r#"{"items":[{"contentDetails":{"relatedPlaylists":{"likes":"","uploads":"UUxyz"}}}]}"#,
        )
        .unwrap();
        assert_eq!(channels.uploads(), Some(PlaylistId::from("UUxyz")));

        let search: SearchListResponse =
            serde_json::from_str(r#"{"items":[{"snippet":{"channelId":"UCxyz","title":"x"}}]}"#).unwrap();
        assert_eq!(search.first_channel(), Some(ChannelId::from("UCxyz")));

        let empty: SearchListResponse = serde_json::from_str(r#"{"pageInfo":{"totalResults":0}}"#).unwrap();
        assert!(empty.first_channel().is_none());
    }

    #[test]
    fn error_envelope_maps_to_comments_disabled() {
        let body = r#"{"error":{"code":403,"message":"The video identified by the videoId parameter has disabled comments.","errors":[{"message":"...","domain":"youtube.commentThread","reason":"commentsDisabled"}]}}"#;
        let err = error_from_body(403, body);
        assert_eq!(err.kind(), FailureKind::CommentsDisabled);

        let raw = error_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(raw.kind(), FailureKind::Transient);
    }

    #[test]
    fn comment_missing_required_fields_does_not_decode() {
        let no_likes = r#"{"items":[{"snippet":{"topLevelComment":{"id":"c1","snippet":{
            "authorDisplayName":"@ann","textDisplay":"hi","publishedAt":"2024-03-01T10:00:00Z"}}}}]}"#;
        assert!(serde_json::from_str::<CommentThreadListResponse>(no_likes).is_err());

        let no_text = r#"{"items":[{"snippet":{"topLevelComment":{"id":"c1","snippet":{
            "authorDisplayName":"@ann","likeCount":0,"publishedAt":"2024-03-01T10:00:00Z"}}}}]}"#;
        assert!(serde_json::from_str::<CommentThreadListResponse>(no_text).is_err());

        let no_author = r#"{"items":[{"snippet":{"topLevelComment":{"id":"c1","snippet":{
            "textDisplay":"hi","likeCount":0,"publishedAt":"2024-03-01T10:00:00Z"}}}}]}"#;
        let page: Page<CommentThread> = serde_json::from_str::<CommentThreadListResponse>(no_author).unwrap().into();
        assert_eq!(page.items[0].top_level.author, "");
    }
}
