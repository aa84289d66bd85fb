use thiserror::Error;
use yolix_core::{body_snippet, ConfigError};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("no comments to analyze")]
    EmptyInput,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider signalled HTTP 429 or an envelope `error.code` of 429.
    #[error("rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Any other provider-side failure, with the upstream status preserved.
    #[error("analysis API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The envelope carried no usable `choices[0].message.content`.
    #[error("empty response from analysis API: {detail}")]
    EmptyResponse { detail: String },

    /// The model's reply could not be read as the expected JSON object.
    /// `content` is the reply exactly as received.
    #[error("malformed analysis response ({reason}): {}", body_snippet(.content))]
    MalformedResponse { reason: String, content: String },

    #[error("invalid analysis endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
