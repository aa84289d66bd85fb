use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Body of the inbound throttle's 429. Distinct from the provider
/// rate-limit message relayed by `/api/analysis`.
pub const SERVER_RATE_LIMIT_MESSAGE: &str = "server rate limit exceeded";

/// Request ID for the current call, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct Window {
    opened: Instant,
    admitted: usize,
}

/// Process-wide fixed-window throttle on the `/api/*` POST routes.
///
/// A budget of zero disables it.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    budget: usize,
    period: Duration,
    window: Option<Arc<Mutex<Window>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(budget: usize, period: Duration) -> Self {
        let window = (budget > 0).then(|| {
            Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                admitted: 0,
            }))
        });
        Self {
            budget,
            period,
            window,
        }
    }

    #[must_use]
    pub fn per_minute(budget: usize) -> Self {
        Self::new(budget, Duration::from_secs(60))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.window.is_some()
    }

    /// Admits one request, or returns how long until the window reopens.
    async fn admit(&self) -> Result<(), Duration> {
        let Some(window) = &self.window else {
            return Ok(());
        };
        let mut window = window.lock().await;
        if window.opened.elapsed() >= self.period {
            window.opened = Instant::now();
            window.admitted = 0;
        }
        if window.admitted >= self.budget {
            return Err(self.period.saturating_sub(window.opened.elapsed()));
        }
        window.admitted += 1;
        Ok(())
    }
}

/// Uses the caller's `x-request-id` when it is a non-empty header string,
/// otherwise a fresh `UUIDv4`. The ID is echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Rejects requests over the window budget with 429 and `retry-after`.
pub async fn enforce_rate_limit(
    State(limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    match limit.admit().await {
        Ok(()) => next.run(req).await,
        Err(retry_in) => {
            let retry_secs = retry_in.as_secs().max(1);
            tracing::warn!(
                path = %req.uri().path(),
                retry_secs,
                "inbound rate limit exceeded"
            );
            let rejection = ApiError::new(StatusCode::TOO_MANY_REQUESTS, SERVER_RATE_LIMIT_MESSAGE);
            let mut res = rejection.into_response();
            res.headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_secs));
            res
        }
    }
}
