//! Shared domain types, configuration, and comment post-processing for Yolix.

pub mod app_config;
pub mod comments;
pub mod config;
pub mod export;
pub mod stats;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use comments::{CollectionResult, Comment, VideoMetadata};
pub use config::{load_app_config, load_app_config_from_env};
pub use export::{comments_to_csv, export_filename};
pub use stats::{comment_stats, AuthorCount, CommentStats, MonthlyCount};

/// Errors raised while loading or reading [`AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

const BODY_SNIPPET_CHARS: usize = 500;

/// Truncates an upstream response body for inclusion in error messages.
#[must_use]
pub fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
