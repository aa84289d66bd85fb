use thiserror::Error;
use yolix_core::ConfigError;

#[derive(Debug, Error)]
pub enum YoutubeError {
    /// The API credential is missing or the configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The caller-supplied URL carries no `v=` video identifier.
    #[error("invalid YouTube URL \"{url}\"")]
    InvalidUrl { url: String },

    /// The `videos` lookup returned zero items (missing, private, or deleted).
    #[error("video not found or is private: {video_id}")]
    NotFound { video_id: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status. `message` is the API's
    /// `error.message` when present, otherwise a body snippet.
    #[error("YouTube API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination limit reached for video {video_id}: exceeded {max_pages} pages")]
    PaginationLimit { video_id: String, max_pages: usize },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
