//! `analyze` command handler.

use anyhow::Context;
use futures::future::try_join_all;
use serde_json::{Map, Value};
use yolix_analysis::{AnalysisClient, AnalysisIntent, AnalysisRequest};
use yolix_core::AppConfig;

use crate::collect::fetch_video;

/// Collects comments once, then runs every requested intent concurrently.
///
/// Output is a JSON object keyed by intent name.
///
/// # Errors
///
/// Returns an error if either credential is missing, collection fails, or any
/// analysis fails. One failed intent fails the whole command.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    url: &str,
    intents: &[AnalysisIntent],
) -> anyhow::Result<()> {
    let client = AnalysisClient::from_config(config)?;
    let video = fetch_video(config, url).await?;
    let texts = video.collection.texts();
    tracing::info!(
        video_id = %video.video_id,
        comments = texts.len(),
        intents = intents.len(),
        "running analyses"
    );

    let client = &client;
    let runs = dedup(intents).into_iter().map(|intent| {
        let request = AnalysisRequest::new(intent, texts.clone());
        async move {
            let result = client
                .run_analysis(&request)
                .await
                .with_context(|| format!("{intent} analysis failed"))?;
            anyhow::Ok((intent, result))
        }
    });
    let results = try_join_all(runs).await?;

    let mut output = Map::new();
    for (intent, result) in results {
        output.insert(intent.to_string(), serde_json::to_value(result)?);
    }
    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}

/// Drops repeated intents, keeping first occurrences in order.
fn dedup(intents: &[AnalysisIntent]) -> Vec<AnalysisIntent> {
    let mut unique = Vec::with_capacity(intents.len());
    for intent in intents {
        if !unique.contains(intent) {
            unique.push(*intent);
        }
    }
    unique
}
