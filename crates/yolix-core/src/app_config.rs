use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub analysis_url: String,
    /// Sent as `HTTP-Referer` on completion requests.
    pub app_url: String,
    /// Sent as `X-Title` on completion requests.
    pub app_title: String,
    pub http_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
    pub page_delay_ms: u64,
    /// `None` means comment pagination is bounded only by the API cursor.
    pub max_pages: Option<usize>,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    /// Returns the `YouTube` Data API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `YOUTUBE_API_KEY` was not set.
    pub fn youtube_api_key(&self) -> Result<&str, ConfigError> {
        self.youtube_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("YOUTUBE_API_KEY".to_string()))
    }

    /// Returns the `OpenRouter` API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `OPENROUTER_API_KEY` was not set.
    pub fn openrouter_api_key(&self) -> Result<&str, ConfigError> {
        self.openrouter_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("youtube_base_url", &self.youtube_base_url)
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openrouter_model", &self.openrouter_model)
            .field("analysis_url", &self.analysis_url)
            .field("app_url", &self.app_url)
            .field("app_title", &self.app_title)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("analysis_timeout_secs", &self.analysis_timeout_secs)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("max_pages", &self.max_pages)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
