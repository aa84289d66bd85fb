use std::sync::LazyLock;

use regex::Regex;

use crate::error::YoutubeError;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]v=([^&#]+)").expect("valid video id regex"));

/// Extracts the video identifier from the `v=` query parameter of a watch URL.
///
/// Only the `v=` form is recognised; short links such as `youtu.be/ID` carry
/// no query parameter and are rejected.
///
/// # Errors
///
/// Returns [`YoutubeError::InvalidUrl`] if no non-empty `v=` value is present.
pub fn extract_video_id(url: &str) -> Result<String, YoutubeError> {
    VIDEO_ID_RE
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or_else(|| YoutubeError::InvalidUrl {
            url: url.to_owned(),
        })
}
