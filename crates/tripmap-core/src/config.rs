use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Loads `.env` (if present) and then reads configuration from the process
/// environment.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads configuration from the process environment without touching `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Builds the configuration from `lookup`, which tests back with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let number = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_number(var, &or_default(var, default))
    };
    let small_number = |var: &str, default: &str| -> Result<u32, ConfigError> {
        parse_number(var, &or_default(var, default))
    };

    let env = parse_environment(&or_default("TRIPMAP_ENV", "development"));
    let log_level = or_default("TRIPMAP_LOG_LEVEL", "info");

    let country_code = or_default("TRIPMAP_COUNTRY_CODE", "vn").to_lowercase();
    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRIPMAP_COUNTRY_CODE".to_string(),
            reason: format!("expected a two-letter country code, got \"{country_code}\""),
        });
    }

    let geocoder_url = or_default(
        "TRIPMAP_GEOCODER_URL",
        "https://nominatim.openstreetmap.org",
    )
    .trim_end_matches('/')
    .to_string();
    let geocoder_user_agent =
        or_default("TRIPMAP_GEOCODER_USER_AGENT", "tripmap/0.1 (itinerary-map)");
    let geocoder_timeout_secs = number("TRIPMAP_GEOCODER_TIMEOUT_SECS", "15")?;
    let geocoder_result_limit = small_number("TRIPMAP_GEOCODER_RESULT_LIMIT", "5")?;
    let geocoder_max_retries = small_number("TRIPMAP_GEOCODER_MAX_RETRIES", "1")?;
    let geocoder_backoff_base_secs = number("TRIPMAP_GEOCODER_BACKOFF_BASE_SECS", "1")?;

    let assistant_url = or_default("TRIPMAP_ASSISTANT_URL", "https://api.openai.com/v1")
        .trim_end_matches('/')
        .to_string();
    let assistant_model = or_default("TRIPMAP_ASSISTANT_MODEL", "gpt-4o-mini");
    let assistant_api_key = lookup("TRIPMAP_ASSISTANT_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());

    Ok(AppConfig {
        env,
        log_level,
        country_code,
        geocoder_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_result_limit,
        geocoder_max_retries,
        geocoder_backoff_base_secs,
        assistant_url,
        assistant_model,
        assistant_api_key,
    })
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: format!("\"{raw}\": {e}"),
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
