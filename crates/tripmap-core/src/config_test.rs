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

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.country_code, "vn");
    assert_eq!(cfg.geocoder_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.geocoder_user_agent, "tripmap/0.1 (itinerary-map)");
    assert_eq!(cfg.geocoder_timeout_secs, 15);
    assert_eq!(cfg.geocoder_result_limit, 5);
    assert_eq!(cfg.geocoder_max_retries, 1);
    assert_eq!(cfg.geocoder_backoff_base_secs, 1);
    assert_eq!(cfg.assistant_url, "https://api.openai.com/v1");
    assert_eq!(cfg.assistant_model, "gpt-4o-mini");
    assert!(cfg.assistant_api_key.is_none());
}

#[test]
fn build_app_config_strips_trailing_slash_from_urls() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_GEOCODER_URL", "http://localhost:8080/");
    map.insert("TRIPMAP_ASSISTANT_URL", "http://localhost:9090/v1/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocoder_url, "http://localhost:8080");
    assert_eq!(cfg.assistant_url, "http://localhost:9090/v1");
}

#[test]
fn build_app_config_lowercases_country_code() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_COUNTRY_CODE", "TH");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.country_code, "th");
}

#[test]
fn build_app_config_rejects_bad_country_code() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_COUNTRY_CODE", "vietnam");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRIPMAP_COUNTRY_CODE"),
        "expected InvalidEnvVar(TRIPMAP_COUNTRY_CODE), got: {result:?}"
    );
}

#[test]
fn build_app_config_geocoder_timeout_override() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_GEOCODER_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocoder_timeout_secs, 60);
}

#[test]
fn build_app_config_geocoder_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_GEOCODER_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRIPMAP_GEOCODER_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TRIPMAP_GEOCODER_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_result_limit_invalid() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_GEOCODER_RESULT_LIMIT", "-3");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRIPMAP_GEOCODER_RESULT_LIMIT"),
        "expected InvalidEnvVar(TRIPMAP_GEOCODER_RESULT_LIMIT), got: {result:?}"
    );
}

#[test]
fn build_app_config_max_retries_override() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_GEOCODER_MAX_RETRIES", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocoder_max_retries, 4);
}

#[test]
fn build_app_config_empty_api_key_is_absent() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_ASSISTANT_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.assistant_api_key.is_none());
    assert!(matches!(
        cfg.require_assistant_api_key(),
        Err(ConfigError::MissingEnvVar(ref v)) if v == "TRIPMAP_ASSISTANT_API_KEY"
    ));
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("TRIPMAP_ASSISTANT_API_KEY", "sk-secret-value");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.require_assistant_api_key().unwrap(), "sk-secret-value");
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("sk-secret-value"));
    assert!(debug.contains("[redacted]"));
}
