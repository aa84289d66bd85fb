use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use yolix_core::{comment_stats as compute_stats, comments_to_csv, export_filename};
use yolix_core::{Comment, CommentStats, VideoMetadata};
use yolix_youtube::{extract_video_id, VideoComments};

use crate::middleware::RequestId;

use super::{ApiError, ApiJson, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct UrlRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentsResponse<'a> {
    success: bool,
    total_comments: u64,
    comments: &'a [Comment],
    video_details: &'a VideoMetadata,
}

#[derive(Debug, Serialize)]
pub(super) struct StatsResponse {
    success: bool,
    #[serde(flatten)]
    stats: CommentStats,
}

/// Resolves a request URL through the comment cache.
pub(super) async fn load_video(
    state: &AppState,
    req_id: &RequestId,
    url: Option<&str>,
) -> Result<Arc<VideoComments>, ApiError> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;
    let video_id = extract_video_id(url)?;

    let youtube = Arc::clone(&state.youtube);
    let id = video_id.clone();
    let fetched = state
        .cache
        .get_or_fetch(&video_id, || async move { youtube.fetch_video(&id).await })
        .await
        .map_err(|e| ApiError::from(&*e))?;

    let cached_videos = state.cache.cached_videos().await;
    tracing::info!(
        request_id = %req_id.0,
        video_id = %fetched.video_id,
        comments = fetched.collection.len(),
        cached_videos,
        "comments ready"
    );
    Ok(fetched)
}

pub(super) async fn get_comments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<UrlRequest>,
) -> Result<Response, ApiError> {
    let video = load_video(&state, &req_id, body.url.as_deref()).await?;

    Ok(Json(CommentsResponse {
        success: true,
        total_comments: video.collection.declared_total,
        comments: &video.collection.comments,
        video_details: &video.metadata,
    })
    .into_response())
}

pub(super) async fn export_comments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<UrlRequest>,
) -> Result<Response, ApiError> {
    let video = load_video(&state, &req_id, body.url.as_deref()).await?;

    let csv = comments_to_csv(&video.collection.comments);
    let filename = export_filename(Utc::now().date_naive());
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| {
            tracing::error!(error = %e, "invalid export filename header");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export comments")
        })?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

pub(super) async fn comment_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<UrlRequest>,
) -> Result<Json<StatsResponse>, ApiError> {
    let video = load_video(&state, &req_id, body.url.as_deref()).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats: compute_stats(&video.collection.comments),
    }))
}
