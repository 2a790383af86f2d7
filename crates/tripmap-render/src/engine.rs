//! The imperative surface a map renderer exposes to [`crate::RenderSync`].

use serde::Serialize;
use tripmap_core::{BBox, Destination, Geometry, LngLat};

use crate::error::RenderError;

/// Map rendering engine, consumed as a black box.
///
/// Removing an id that does not exist is not an error.
pub trait MapEngine {
    /// # Errors
    ///
    /// Returns [`RenderError::DuplicateSource`] if `id` is already present.
    fn add_source(&mut self, id: &str, geometry: &Geometry) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Returns [`RenderError::UnknownSource`] if the layer's source is missing.
    fn add_layer(&mut self, layer: Layer) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Engine-specific failure.
    fn remove_layer(&mut self, id: &str) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Returns [`RenderError::SourceInUse`] if a layer still draws from it.
    fn remove_source(&mut self, id: &str) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Engine-specific failure.
    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Engine-specific failure.
    fn clear_markers(&mut self) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Engine-specific failure.
    fn fit_bounds(&mut self, bounds: BBox, padding: u32, max_zoom: f64) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Engine-specific failure.
    fn center_on(&mut self, at: LngLat, zoom: f64) -> Result<(), RenderError>;

    /// Returns to the default regional view.
    ///
    /// # Errors
    ///
    /// Engine-specific failure.
    fn reset_view(&mut self) -> Result<(), RenderError>;
}

/// How a layer draws its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Paint {
    Fill { color: &'static str, opacity: f64 },
    Line { color: &'static str, width: f64, dashed: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: String,
    pub source_id: String,
    pub paint: Paint,
}

/// Informational popup attached to a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Popup {
    #[must_use]
    pub fn for_destination(destination: &Destination) -> Self {
        Self {
            name: destination.name.clone(),
            desc: destination.desc.clone().filter(|d| !d.trim().is_empty()),
            source: destination.source.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub at: LngLat,
    pub color: &'static str,
    pub popup: Popup,
}
