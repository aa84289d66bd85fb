use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with both credentials populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("YOUTUBE_API_KEY", "yt-key");
    m.insert("OPENROUTER_API_KEY", "or-key");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "YOLIX_ENV"));
}

#[test]
fn build_app_config_applies_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.youtube_base_url, "https://www.googleapis.com/youtube/v3");
    assert_eq!(cfg.openrouter_model, "mistralai/mistral-7b-instruct:free");
    assert_eq!(
        cfg.analysis_url,
        "https://openrouter.ai/api/v1/chat/completions"
    );
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.analysis_timeout_secs, 120);
    assert_eq!(cfg.page_delay_ms, 100);
    assert_eq!(cfg.max_pages, None);
    assert_eq!(cfg.rate_limit_per_minute, 60);
}

#[test]
fn build_app_config_succeeds_without_credentials() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.youtube_api_key.is_none());
    assert!(cfg.openrouter_api_key.is_none());
}

#[test]
fn missing_youtube_key_is_a_config_error_on_use() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.youtube_api_key().unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "YOUTUBE_API_KEY"),
        "expected MissingEnvVar(YOUTUBE_API_KEY), got: {err:?}"
    );
}

#[test]
fn missing_openrouter_key_is_a_config_error_on_use() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("YOUTUBE_API_KEY", "yt-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.youtube_api_key().unwrap(), "yt-key");
    assert!(matches!(
        cfg.openrouter_api_key(),
        Err(ConfigError::MissingEnvVar(ref v)) if v == "OPENROUTER_API_KEY"
    ));
}

#[test]
fn blank_credential_counts_as_missing() {
    let mut map = full_env();
    map.insert("YOUTUBE_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.youtube_api_key().is_err());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("YOLIX_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YOLIX_BIND_ADDR"),
        "expected InvalidEnvVar(YOLIX_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn page_delay_override() {
    let mut map = full_env();
    map.insert("YOLIX_PAGE_DELAY_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_delay_ms, 250);
}

#[test]
fn page_delay_invalid() {
    let mut map = full_env();
    map.insert("YOLIX_PAGE_DELAY_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YOLIX_PAGE_DELAY_MS"),
        "expected InvalidEnvVar(YOLIX_PAGE_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn max_pages_zero_means_unbounded() {
    let mut map = full_env();
    map.insert("YOLIX_MAX_PAGES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_pages, None);
}

#[test]
fn max_pages_override() {
    let mut map = full_env();
    map.insert("YOLIX_MAX_PAGES", "40");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_pages, Some(40));
}

#[test]
fn model_override() {
    let mut map = full_env();
    map.insert("OPENROUTER_MODEL", "openai/gpt-4o-mini");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.openrouter_model, "openai/gpt-4o-mini");
}

#[test]
fn debug_output_redacts_credentials() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("yt-key"));
    assert!(!rendered.contains("or-key"));
    assert!(rendered.contains("[redacted]"));
}
