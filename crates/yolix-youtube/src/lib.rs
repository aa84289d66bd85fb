//! `YouTube` Data API v3 client and the comment collector built on it.
//!
//! [`YoutubeClient::collect_all_comments`] walks `commentThreads` pages by
//! continuation cursor, strictly in sequence, and returns every top-level
//! thread or an error. Partial collections are never returned.

pub mod client;
pub mod collect;
pub mod error;
pub mod types;
pub mod video_id;

pub use client::YoutubeClient;
pub use collect::VideoComments;
pub use error::YoutubeError;
pub use video_id::extract_video_id;
