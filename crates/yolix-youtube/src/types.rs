//! Wire types for the `videos` and `commentThreads` endpoints.
//!
//! Only the fields the collector reads are modelled. Counters default to zero
//! when absent: `likeCount` is omitted for some comments on videos with
//! hidden like counts.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use yolix_core::{Comment, VideoMetadata};

/// Response from `GET /commentThreads?part=snippet`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    /// Continuation cursor. Absent on the last page.
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub page_info: PageInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_results: u64,
}

#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
    #[serde(default)]
    pub total_reply_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default)]
    pub author_display_name: String,
    #[serde(default)]
    pub text_display: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u64,
}

impl CommentThread {
    /// Flattens the thread into a [`Comment`], keeping only the top-level
    /// comment and the thread's aggregate reply count.
    #[must_use]
    pub fn into_comment(self) -> Comment {
        let top = self.snippet.top_level_comment.snippet;
        Comment {
            author: top.author_display_name,
            text: top.text_display,
            published_at: top.published_at,
            like_count: top.like_count,
            reply_count: self.snippet.total_reply_count,
        }
    }
}

/// Response from `GET /videos?part=snippet`.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub struct Video {
    pub snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl Video {
    /// Converts to [`VideoMetadata`], preferring the `medium` thumbnail.
    #[must_use]
    pub fn into_metadata(self) -> VideoMetadata {
        let thumbs = self.snippet.thumbnails;
        let thumbnail_url = thumbs
            .medium
            .or(thumbs.high)
            .or(thumbs.default)
            .map(|t| t.url)
            .unwrap_or_default();
        VideoMetadata {
            title: self.snippet.title,
            thumbnail_url,
        }
    }
}
