//! Destination → outline geometry, with write-once caching.

use std::future::Future;
use std::sync::Arc;

use tripmap_core::{AppConfig, BoundaryKey, Destination, Geometry};

use crate::cache::BoundaryCache;
use crate::client::GeocoderClient;
use crate::embedded::outline_from_value;
use crate::error::GeoError;
use crate::select::choose_candidate;

/// Anything that can turn a destination into an outline geometry.
///
/// Implementations never fail: an unresolvable destination yields `None`.
pub trait ResolveBoundary: Send + Sync {
    fn resolve(
        &self,
        destination: &Destination,
        key: &BoundaryKey,
    ) -> impl Future<Output = Option<Geometry>> + Send;
}

/// Geocoder-backed resolver sharing one injected [`BoundaryCache`].
pub struct BoundaryResolver {
    client: GeocoderClient,
    cache: Arc<dyn BoundaryCache>,
    country_code: String,
}

impl BoundaryResolver {
    #[must_use]
    pub fn new(client: GeocoderClient, cache: Arc<dyn BoundaryCache>, country_code: &str) -> Self {
        Self {
            client,
            cache,
            country_code: country_code.to_ascii_lowercase(),
        }
    }

    /// Builds the geocoder client and resolver from [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig, cache: Arc<dyn BoundaryCache>) -> Result<Self, GeoError> {
        let client = GeocoderClient::from_config(config)?;
        Ok(Self::new(client, cache, &config.country_code))
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn BoundaryCache> {
        &self.cache
    }

    /// Runs every tier without consulting or writing the cache.
    async fn resolve_uncached(&self, destination: &Destination, key: &BoundaryKey) -> Option<Geometry> {
        if let Some(geometry) = destination
            .embedded_geometry
            .as_ref()
            .and_then(outline_from_value)
        {
            tracing::debug!(key = %key, kind = geometry.type_name(), "using embedded geometry");
            return Some(geometry);
        }

        let candidates = match self.client.search(&destination.name, &self.country_code).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(key = %key, name = %destination.name, error = %e, "boundary search failed");
                return None;
            }
        };
        let chosen = choose_candidate(&candidates)?;

        if let Some(geometry) = chosen.inline_geometry().filter(Geometry::is_outline) {
            return Some(geometry);
        }

        if let Some(osm) = chosen.osm_ref() {
            match self.client.details(osm).await {
                Ok(Some(geometry)) if geometry.is_outline() => return Some(geometry),
                Ok(_) => {
                    tracing::debug!(key = %key, osm_id = osm.id, "details lookup returned no outline");
                }
                Err(e) => {
                    tracing::warn!(key = %key, osm_id = osm.id, error = %e, "boundary details lookup failed");
                }
            }
        }

        chosen
            .bbox()
            .filter(|b| !b.is_degenerate())
            .map(Geometry::rectangle)
    }
}

impl ResolveBoundary for BoundaryResolver {
    /// Cached result if present; otherwise embedded geometry, search, details,
    /// and bounding-box rectangle in that order. The outcome, `None` included,
    /// is stored once under `key`.
    async fn resolve(&self, destination: &Destination, key: &BoundaryKey) -> Option<Geometry> {
        if let Some(cached) = self.cache.get(key) {
            return cached;
        }
        let geometry = self.resolve_uncached(destination, key).await;
        if geometry.is_none() {
            tracing::info!(key = %key, name = %destination.name, "no boundary found");
        }
        self.cache.insert(key.clone(), geometry.clone());
        geometry
    }
}
