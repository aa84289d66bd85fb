//! LLM-backed comment analysis for Yolix.
//!
//! Builds an intent-specific prompt over raw comment texts, sends it to an
//! OpenAI-compatible chat-completion endpoint (`OpenRouter` by default), and
//! coerces the loosely formatted JSON reply into a typed [`AnalysisResult`].
//! Scores coming back from the model are clamped here rather than trusted.

pub mod client;
pub mod error;
pub mod normalize;
pub mod prompt;
pub mod types;

pub use client::AnalysisClient;
pub use error::AnalysisError;
pub use types::{
    AnalysisIntent, AnalysisRequest, AnalysisResult, Keyword, Sentiment, Summary, Topic,
};
