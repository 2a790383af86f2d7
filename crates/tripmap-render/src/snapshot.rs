//! A [`MapEngine`] that keeps what it was told to draw and exports it as a
//! GeoJSON `FeatureCollection`.
//!
//! Used by the CLI, where there is no interactive map, and handy in tests
//! for asserting on the final picture rather than the call sequence.

use serde_json::{json, Map, Value};
use tripmap_core::{BBox, Geometry, LngLat};

use crate::engine::{Layer, MapEngine, Marker, Paint};
use crate::error::RenderError;
use crate::view::Viewport;

#[derive(Debug, Default)]
pub struct GeoJsonEngine {
    sources: Vec<(String, Geometry)>,
    layers: Vec<Layer>,
    markers: Vec<Marker>,
    viewport: Option<Viewport>,
}

impl GeoJsonEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// One feature per source (styled from its layers) followed by one
    /// `Point` feature per marker. The last camera command is attached as a
    /// top-level `viewport` member.
    #[must_use]
    pub fn to_feature_collection(&self) -> Value {
        let mut features: Vec<Value> = self
            .sources
            .iter()
            .map(|(id, geometry)| {
                let mut properties = Map::new();
                properties.insert("id".to_owned(), json!(id));
                for layer in self.layers.iter().filter(|l| &l.source_id == id) {
                    match &layer.paint {
                        Paint::Fill { color, opacity } => {
                            properties.insert("fill".to_owned(), json!(color));
                            properties.insert("fill-opacity".to_owned(), json!(opacity));
                        }
                        Paint::Line { color, width, dashed } => {
                            properties.insert("stroke".to_owned(), json!(color));
                            properties.insert("stroke-width".to_owned(), json!(width));
                            properties.insert("dashed".to_owned(), json!(dashed));
                        }
                    }
                }
                json!({"type": "Feature", "geometry": geometry, "properties": properties})
            })
            .collect();

        features.extend(self.markers.iter().map(|m| {
            json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [m.at.lng, m.at.lat]},
                "properties": {
                    "marker-color": m.color,
                    "name": m.popup.name,
                    "desc": m.popup.desc,
                    "source": m.popup.source,
                }
            })
        }));

        json!({
            "type": "FeatureCollection",
            "features": features,
            "viewport": self.viewport,
        })
    }
}

impl MapEngine for GeoJsonEngine {
    fn add_source(&mut self, id: &str, geometry: &Geometry) -> Result<(), RenderError> {
        if self.sources.iter().any(|(existing, _)| existing == id) {
            return Err(RenderError::DuplicateSource { id: id.to_owned() });
        }
        self.sources.push((id.to_owned(), geometry.clone()));
        Ok(())
    }

    fn add_layer(&mut self, layer: Layer) -> Result<(), RenderError> {
        if self.layers.iter().any(|l| l.id == layer.id) {
            return Err(RenderError::DuplicateLayer { id: layer.id });
        }
        if !self.sources.iter().any(|(id, _)| *id == layer.source_id) {
            return Err(RenderError::UnknownSource {
                layer_id: layer.id,
                source_id: layer.source_id,
            });
        }
        self.layers.push(layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), RenderError> {
        self.layers.retain(|l| l.id != id);
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), RenderError> {
        if let Some(layer) = self.layers.iter().find(|l| l.source_id == id) {
            return Err(RenderError::SourceInUse {
                id: id.to_owned(),
                layer_id: layer.id.clone(),
            });
        }
        self.sources.retain(|(existing, _)| existing != id);
        Ok(())
    }

    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError> {
        self.markers.push(marker);
        Ok(())
    }

    fn clear_markers(&mut self) -> Result<(), RenderError> {
        self.markers.clear();
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: BBox, padding: u32, max_zoom: f64) -> Result<(), RenderError> {
        self.viewport = Some(Viewport::Fit {
            bounds,
            padding,
            max_zoom,
        });
        Ok(())
    }

    fn center_on(&mut self, at: LngLat, zoom: f64) -> Result<(), RenderError> {
        self.viewport = Some(Viewport::Center { at, zoom });
        Ok(())
    }

    fn reset_view(&mut self) -> Result<(), RenderError> {
        self.viewport = Some(Viewport::Reset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::Popup;

    use super::*;

    fn triangle() -> Geometry {
        Geometry::Polygon(vec![vec![
            vec![105.0, 21.0],
            vec![105.1, 21.0],
            vec![105.0, 21.1],
            vec![105.0, 21.0],
        ]])
    }

    fn line_layer(id: &str, source_id: &str) -> Layer {
        Layer {
            id: id.to_owned(),
            source_id: source_id.to_owned(),
            paint: Paint::Line {
                color: "#e6194b",
                width: 2.0,
                dashed: true,
            },
        }
    }

    #[test]
    fn rejects_duplicate_sources_and_orphan_layers() {
        let mut engine = GeoJsonEngine::new();
        engine.add_source("a", &triangle()).unwrap();
        assert!(matches!(
            engine.add_source("a", &triangle()),
            Err(RenderError::DuplicateSource { .. })
        ));
        assert!(matches!(
            engine.add_layer(line_layer("l", "missing")),
            Err(RenderError::UnknownSource { .. })
        ));
    }

    #[test]
    fn source_cannot_be_removed_while_layer_uses_it() {
        let mut engine = GeoJsonEngine::new();
        engine.add_source("a", &triangle()).unwrap();
        engine.add_layer(line_layer("a-line", "a")).unwrap();
        assert!(matches!(
            engine.remove_source("a"),
            Err(RenderError::SourceInUse { .. })
        ));
        engine.remove_layer("a-line").unwrap();
        engine.remove_source("a").unwrap();
        assert_eq!(engine.source_ids().count(), 0);
    }

    #[test]
    fn feature_collection_carries_styles_markers_and_viewport() {
        let mut engine = GeoJsonEngine::new();
        engine.add_source("a", &triangle()).unwrap();
        engine.add_layer(line_layer("a-line", "a")).unwrap();
        engine
            .add_marker(Marker {
                at: LngLat::new(105.03, 21.03),
                color: "#e6194b",
                popup: Popup {
                    name: "Ba Vi".to_owned(),
                    desc: None,
                    source: Some("https://example.org/ba-vi".to_owned()),
                },
            })
            .unwrap();
        engine.center_on(LngLat::new(105.03, 21.03), 13.0).unwrap();

        let fc = engine.to_feature_collection();

        assert_eq!(fc["type"], "FeatureCollection");
        let features = fc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["properties"]["dashed"], true);
        assert_eq!(features[1]["properties"]["name"], "Ba Vi");
        assert_eq!(features[1]["geometry"]["coordinates"][0], 105.03);
        assert_eq!(fc["viewport"]["mode"], "center");
        assert_eq!(fc["viewport"]["zoom"], 13.0);
    }
}
