mod analysis;
mod comments;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use yolix_analysis::{AnalysisClient, AnalysisError};
use yolix_youtube::{YoutubeClient, YoutubeError};

use crate::cache::CommentCache;
use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub youtube: Arc<YoutubeClient>,
    pub analysis: Arc<AnalysisClient>,
    pub cache: Arc<CommentCache>,
}

/// Failure body shared by every route: `{success: false, error}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Keeps the upstream status when it is a client or server error, otherwise
/// falls back to `fallback`.
fn upstream_status(status: u16, fallback: StatusCode) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(fallback)
}

impl From<YoutubeError> for ApiError {
    fn from(error: YoutubeError) -> Self {
        Self::from(&error)
    }
}

impl From<&YoutubeError> for ApiError {
    fn from(error: &YoutubeError) -> Self {
        match error {
            YoutubeError::InvalidUrl { .. } => Self::bad_request("Invalid YouTube URL"),
            YoutubeError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "Video not found or is private")
            }
            YoutubeError::Api { status, message } => {
                tracing::warn!(status, %message, "YouTube API request failed");
                Self::new(
                    upstream_status(*status, StatusCode::INTERNAL_SERVER_ERROR),
                    message.clone(),
                )
            }
            YoutubeError::PaginationLimit { .. } => {
                tracing::warn!(error = %error, "comment collection hit the page cap");
                Self::new(StatusCode::BAD_GATEWAY, error.to_string())
            }
            YoutubeError::Config(_)
            | YoutubeError::Http(_)
            | YoutubeError::Deserialize { .. }
            | YoutubeError::InvalidBaseUrl { .. } => {
                tracing::error!(error = %error, "comment collection failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch comments",
                )
            }
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        match &error {
            AnalysisError::EmptyInput => Self::bad_request(error.to_string()),
            AnalysisError::RateLimited { .. } => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, error.to_string())
            }
            AnalysisError::Api { status, message } => Self::new(
                upstream_status(*status, StatusCode::INTERNAL_SERVER_ERROR),
                message.clone(),
            ),
            AnalysisError::EmptyResponse { .. } | AnalysisError::MalformedResponse { .. } => {
                Self::new(StatusCode::BAD_GATEWAY, error.to_string())
            }
            AnalysisError::Config(_)
            | AnalysisError::Http(_)
            | AnalysisError::InvalidEndpoint { .. } => {
                tracing::error!(error = %error, "analysis request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed")
            }
        }
    }
}

/// `Json` extractor whose rejections use the `{success: false, error}` body.
pub(super) struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection: JsonRejection| ApiError::bad_request(rejection.body_text()))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            header::RETRY_AFTER,
            REQUEST_ID_HEADER,
        ])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/comments", post(comments::get_comments))
        .route("/api/comments/export", post(comments::export_comments))
        .route("/api/comments/stats", post(comments::comment_stats))
        .route("/api/analysis", post(analysis::run_analysis))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
