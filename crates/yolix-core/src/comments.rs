use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level comment thread flattened into one record.
///
/// Serialized with the field names the browser client expects
/// (`date`, `likes`, `replies`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Author display name as shown on `YouTube`.
    pub author: String,
    /// Display text (`textDisplay`), which may contain HTML entities.
    pub text: String,
    #[serde(rename = "date")]
    pub published_at: DateTime<Utc>,
    #[serde(rename = "likes")]
    pub like_count: u64,
    /// Total reply count of the thread. Reply bodies are never fetched.
    #[serde(rename = "replies")]
    pub reply_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
}

/// Every comment thread of one video, in API page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResult {
    pub comments: Vec<Comment>,
    /// `pageInfo.totalResults` of the first page, as reported by the API.
    ///
    /// Not guaranteed to equal `comments.len()`.
    pub declared_total: u64,
}

impl CollectionResult {
    /// Returns the comment bodies in collection order, ready to be handed to
    /// an analysis request.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.comments.iter().map(|c| c.text.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
