//! `collect` and `stats` command handlers.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use yolix_core::{comment_stats, comments_to_csv, export_filename, AppConfig};
use yolix_youtube::{VideoComments, YoutubeClient};

/// Fetches every comment for `url` using a client built from `config`.
///
/// # Errors
///
/// Returns an error if `YOUTUBE_API_KEY` is missing or any API call fails.
pub(crate) async fn fetch_video(config: &AppConfig, url: &str) -> anyhow::Result<VideoComments> {
    let client = YoutubeClient::from_config(config)?;
    let video = client
        .fetch_video_comments(url)
        .await
        .with_context(|| format!("failed to collect comments for {url}"))?;
    Ok(video)
}

/// Collects all comments and writes them as CSV.
///
/// # Errors
///
/// Returns an error if collection fails or the CSV cannot be written.
pub(crate) async fn run_collect(
    config: &AppConfig,
    url: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let video = fetch_video(config, url).await?;
    println!("{}", collection_summary(&video));

    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(Utc::now().date_naive())));
    let csv = comments_to_csv(&video.collection.comments);
    tokio::fs::write(&path, csv)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("wrote {} comments to {}", video.collection.len(), path.display());
    Ok(())
}

/// Prints author and monthly statistics as pretty JSON.
///
/// # Errors
///
/// Returns an error if collection fails.
pub(crate) async fn run_stats(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let video = fetch_video(config, url).await?;
    println!("{}", collection_summary(&video));

    let stats = comment_stats(&video.collection.comments);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn collection_summary(video: &VideoComments) -> String {
    format!(
        "{} ({}): collected {} comments, API reports {}",
        video.metadata.title,
        video.video_id,
        video.collection.len(),
        video.collection.declared_total
    )
}

#[cfg(test)]
mod tests {
    use yolix_core::{CollectionResult, VideoMetadata};

    use super::*;

    #[test]
    fn summary_reports_collected_and_declared_counts() {
        let video = VideoComments {
            video_id: "abc".to_string(),
            metadata: VideoMetadata {
                title: "Launch".to_string(),
                thumbnail_url: String::new(),
            },
            collection: CollectionResult {
                comments: vec![],
                declared_total: 12,
            },
        };
        assert_eq!(
            collection_summary(&video),
            "Launch (abc): collected 0 comments, API reports 12"
        );
    }
}
