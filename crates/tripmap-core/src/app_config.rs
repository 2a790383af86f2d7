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
    pub log_level: String,
    /// ISO 3166-1 alpha-2 code the geocoder search is scoped to.
    pub country_code: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_result_limit: u32,
    pub geocoder_max_retries: u32,
    pub geocoder_backoff_base_secs: u64,
    pub assistant_url: String,
    pub assistant_model: String,
    pub assistant_api_key: Option<String>,
}

impl AppConfig {
    /// Returns the assistant API key, which only the `ask` flow needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `TRIPMAP_ASSISTANT_API_KEY`
    /// was not set.
    pub fn require_assistant_api_key(&self) -> Result<&str, ConfigError> {
        self.assistant_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TRIPMAP_ASSISTANT_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("country_code", &self.country_code)
            .field("geocoder_url", &self.geocoder_url)
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_result_limit", &self.geocoder_result_limit)
            .field("geocoder_max_retries", &self.geocoder_max_retries)
            .field(
                "geocoder_backoff_base_secs",
                &self.geocoder_backoff_base_secs,
            )
            .field("assistant_url", &self.assistant_url)
            .field("assistant_model", &self.assistant_model)
            .field(
                "assistant_api_key",
                &self.assistant_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
