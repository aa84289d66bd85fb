//! Chat-completion client for the analysis gateway.
//!
//! Sends one system + user message pair per [`AnalysisRequest`] and turns the
//! reply into an [`AnalysisResult`]. Rate limiting is detected before any
//! content is read, so a 429 envelope wins even when `choices` is populated.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use yolix_core::{body_snippet, AppConfig};

use crate::error::AnalysisError;
use crate::normalize::parse_result;
use crate::prompt::{build_prompt, system_prompt};
use crate::types::{AnalysisRequest, AnalysisResult};

const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";

const RATE_LIMIT_STATUS: u16 = 429;

pub struct AnalysisClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
    app_url: Option<String>,
    app_title: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl AnalysisClient {
    /// Creates a client for the production `OpenRouter` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, AnalysisError> {
        Self::with_endpoint(api_key, model, timeout_secs, DEFAULT_ENDPOINT)
    }

    /// Creates a client posting to `endpoint` (a mock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`AnalysisError::InvalidEndpoint`] if `endpoint` does not
    /// parse as a URL.
    pub fn with_endpoint(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        endpoint: &str,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let endpoint = Url::parse(endpoint).map_err(|e| AnalysisError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            model: model.to_owned(),
            app_url: None,
            app_title: None,
        })
    }

    /// Sets the `HTTP-Referer` and `X-Title` attribution headers.
    #[must_use]
    pub fn with_attribution(mut self, app_url: &str, app_title: &str) -> Self {
        self.app_url = Some(app_url.to_owned());
        self.app_title = Some(app_title.to_owned());
        self
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if `OPENROUTER_API_KEY` is not set,
    /// or any error from [`AnalysisClient::with_endpoint`].
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalysisError> {
        let api_key = config.openrouter_api_key()?;
        Ok(Self::with_endpoint(
            api_key,
            &config.openrouter_model,
            config.analysis_timeout_secs,
            &config.analysis_url,
        )?
        .with_attribution(&config.app_url, &config.app_title))
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs one analysis: prompt, completion call, then normalization.
    ///
    /// No retries are attempted.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::EmptyInput`] if there are no comment texts.
    /// - [`AnalysisError::RateLimited`] on HTTP 429 or an envelope code of 429.
    /// - [`AnalysisError::Api`] on any other provider failure.
    /// - [`AnalysisError::EmptyResponse`] if the reply has no content.
    /// - [`AnalysisError::MalformedResponse`] if the content is not the
    ///   expected JSON object.
    /// - [`AnalysisError::Http`] on network failure.
    pub async fn run_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        if request.comment_texts.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let intent = request.intent;
        let prompt = build_prompt(intent, &request.comment_texts);
        tracing::info!(
            %intent,
            model = %self.model,
            comments = request.comment_texts.len(),
            "requesting analysis"
        );

        let content = self.complete(system_prompt(intent), &prompt).await?;
        parse_result(intent, &content).inspect_err(|e| {
            tracing::warn!(%intent, error = %e, "analysis reply could not be normalized");
        })
    }

    /// Posts a two-message chat completion and returns the raw reply content.
    ///
    /// # Errors
    ///
    /// Same as [`extract_content`], plus [`AnalysisError::Http`] on network
    /// failure.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, AnalysisError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(app_url) = &self.app_url {
            request = request.header("HTTP-Referer", app_url);
        }
        if let Some(app_title) = &self.app_title {
            request = request.header("X-Title", app_title);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        extract_content(status, &text).inspect_err(|e| {
            tracing::warn!(status, error = %e, "chat completion failed");
        })
    }
}

/// Reads `choices[0].message.content` out of a completion envelope.
///
/// Rate limiting is checked first: HTTP 429 or an envelope `error.code` of
/// 429 is [`AnalysisError::RateLimited`] regardless of any `choices`.
///
/// # Errors
///
/// - [`AnalysisError::RateLimited`] as above.
/// - [`AnalysisError::Api`] on a non-2xx status or any other envelope error.
/// - [`AnalysisError::EmptyResponse`] if the body is not JSON or the content
///   is absent or blank.
pub fn extract_content(status: u16, body: &str) -> Result<String, AnalysisError> {
    let envelope = serde_json::from_str::<Value>(body).ok();
    let error = envelope.as_ref().and_then(|v| v.get("error"));
    let error_code = error.and_then(|e| e.get("code")).and_then(code_as_u16);
    let error_message = || {
        error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| body_snippet(body), str::to_owned)
    };

    if status == RATE_LIMIT_STATUS || error_code == Some(RATE_LIMIT_STATUS) {
        return Err(AnalysisError::RateLimited {
            message: error_message(),
        });
    }

    if !(200..300).contains(&status) {
        return Err(AnalysisError::Api {
            status,
            message: error_message(),
        });
    }

    if error.is_some() {
        // A 2xx envelope carrying an error still failed upstream.
        let status = error_code.filter(|c| (400..600).contains(c)).unwrap_or(502);
        return Err(AnalysisError::Api {
            status,
            message: error_message(),
        });
    }

    let Some(envelope) = envelope else {
        return Err(AnalysisError::EmptyResponse {
            detail: format!("response body is not JSON: {}", body_snippet(body)),
        });
    };

    envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AnalysisError::EmptyResponse {
            detail: "choices[0].message.content is missing or blank".to_owned(),
        })
}

/// Providers send `error.code` as either a number or a numeric string.
fn code_as_u16(code: &Value) -> Option<u16> {
    match code {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
