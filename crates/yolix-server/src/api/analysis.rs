use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use yolix_analysis::{AnalysisIntent, AnalysisRequest, AnalysisResult};

use crate::middleware::RequestId;

use super::comments::load_video;
use super::{ApiError, ApiJson, AppState};

/// Either `comments` (raw texts) or `url` (collected through the cache) must
/// be present. Non-empty `comments` take precedence.
#[derive(Debug, Deserialize)]
pub(super) struct AnalysisBody {
    pub intent: AnalysisIntent,
    #[serde(default)]
    pub comments: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalysisResponse {
    success: bool,
    intent: AnalysisIntent,
    result: AnalysisResult,
}

pub(super) async fn run_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<AnalysisBody>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let comment_texts = match body.comments.filter(|texts| !texts.is_empty()) {
        Some(texts) => texts,
        None if body.url.is_some() => {
            let video = load_video(&state, &req_id, body.url.as_deref()).await?;
            video.collection.texts()
        }
        None => return Err(ApiError::bad_request("Either comments or url is required")),
    };

    let intent = body.intent;
    let request = AnalysisRequest::new(intent, comment_texts);
    let result = state
        .analysis
        .run_analysis(&request)
        .await
        .inspect_err(|e| {
            tracing::warn!(request_id = %req_id.0, %intent, error = %e, "analysis failed");
        })?;

    tracing::info!(request_id = %req_id.0, %intent, "analysis complete");
    Ok(Json(AnalysisResponse {
        success: true,
        intent,
        result,
    }))
}
