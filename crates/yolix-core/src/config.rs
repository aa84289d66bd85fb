use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_ANALYSIS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are optional here: a missing key only becomes an error when a
/// caller asks for it through [`AppConfig::youtube_api_key`] or
/// [`AppConfig::openrouter_api_key`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("YOLIX_ENV", "development"))?;

    let bind_addr = or_default("YOLIX_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "YOLIX_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("YOLIX_LOG_LEVEL", "info");

    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let youtube_base_url = or_default("YOLIX_YOUTUBE_BASE_URL", DEFAULT_YOUTUBE_BASE_URL);

    let openrouter_api_key = optional("OPENROUTER_API_KEY");
    let openrouter_model = or_default("OPENROUTER_MODEL", DEFAULT_MODEL);
    let analysis_url = or_default("YOLIX_ANALYSIS_URL", DEFAULT_ANALYSIS_URL);
    let app_url = or_default("YOLIX_APP_URL", "https://yolix.app");
    let app_title = or_default("YOLIX_APP_TITLE", "Yolix");

    let http_timeout_secs = parse_u64("YOLIX_HTTP_TIMEOUT_SECS", "30")?;
    let analysis_timeout_secs = parse_u64("YOLIX_ANALYSIS_TIMEOUT_SECS", "120")?;
    let page_delay_ms = parse_u64("YOLIX_PAGE_DELAY_MS", "100")?;
    // 0 and unset both mean "follow the cursor until it runs out".
    let max_pages = Some(parse_usize("YOLIX_MAX_PAGES", "0")?).filter(|n| *n > 0);
    let rate_limit_per_minute = parse_usize("YOLIX_RATE_LIMIT_PER_MINUTE", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        youtube_api_key,
        youtube_base_url,
        openrouter_api_key,
        openrouter_model,
        analysis_url,
        app_url,
        app_title,
        http_timeout_secs,
        analysis_timeout_secs,
        page_delay_ms,
        max_pages,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "YOLIX_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
