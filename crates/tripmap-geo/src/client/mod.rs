//! HTTP client for the geocoder's `search` and `details` endpoints.

mod origin;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tripmap_core::{AppConfig, Geometry};

use crate::error::GeoError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{DetailsResponse, OsmRef, SearchCandidate};

pub use origin::extract_host;

/// Read-only geocoder client.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors (429, network failures) are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct GeocoderClient {
    client: Client,
    base_url: String,
    result_limit: u32,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl GeocoderClient {
    /// Creates a client with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        result_limit: u32,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            result_limit: result_limit.max(1),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the geocoder settings in [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeoError> {
        Self::new(
            &config.geocoder_url,
            config.geocoder_timeout_secs,
            &config.geocoder_user_agent,
            config.geocoder_result_limit,
            config.geocoder_max_retries,
            config.geocoder_backoff_base_secs,
        )
    }

    /// Searches for `name` inside one country, asking for polygon output.
    ///
    /// # Errors
    ///
    /// - [`GeoError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`GeoError::NotFound`] / [`GeoError::UnexpectedStatus`]: non-2xx status.
    /// - [`GeoError::Http`]: network failure after all retries exhausted.
    /// - [`GeoError::Deserialize`]: body is not a JSON array of results.
    pub async fn search(
        &self,
        name: &str,
        country_code: &str,
    ) -> Result<Vec<SearchCandidate>, GeoError> {
        let url = self.search_url(name, country_code)?;
        let candidates: Vec<SearchCandidate> = self
            .get_json(url, format!("search results for \"{name}\""))
            .await?;
        tracing::debug!(name, count = candidates.len(), "geocoder search returned");
        Ok(candidates)
    }

    /// Fetches full geometry for one entity by type and id.
    ///
    /// Returns `Ok(None)` when the entity exists but carries no parseable
    /// geometry.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GeocoderClient::search`].
    pub async fn details(&self, osm: OsmRef) -> Result<Option<Geometry>, GeoError> {
        let url = self.details_url(osm)?;
        let details: DetailsResponse = self
            .get_json(url, format!("details for {}{}", osm.kind, osm.id))
            .await?;
        Ok(details.geometry.as_ref().and_then(Geometry::from_value))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, context: String) -> Result<T, GeoError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let context = context.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(GeoError::RateLimited {
                        host: extract_host(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(GeoError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(GeoError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body)
                    .map_err(|e| GeoError::Deserialize { context, source: e })
            }
        })
        .await
    }

    /// Builds the search URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidUrl`] if the base URL does not parse.
    fn search_url(&self, name: &str, country_code: &str) -> Result<String, GeoError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", name)
            .append_pair("countrycodes", country_code)
            .append_pair("format", "jsonv2")
            .append_pair("polygon_geojson", "1")
            .append_pair("limit", &self.result_limit.to_string());
        Ok(url.to_string())
    }

    /// Builds the details URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidUrl`] if the base URL does not parse.
    fn details_url(&self, osm: OsmRef) -> Result<String, GeoError> {
        let mut url = self.endpoint("details")?;
        url.query_pairs_mut()
            .append_pair("osmtype", &osm.kind.to_string())
            .append_pair("osmid", &osm.id.to_string())
            .append_pair("format", "json")
            .append_pair("polygon_geojson", "1");
        Ok(url.to_string())
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, GeoError> {
        let raw = format!("{}/{path}", self.base_url);
        reqwest::Url::parse(&raw).map_err(|e| GeoError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
