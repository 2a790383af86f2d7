//! Geocoder response types (Nominatim `search` and `details` endpoints).
//!
//! ## Observed shape
//!
//! ### `boundingbox`
//! Four **strings**, ordered `[south, north, west, east]`. Some mirrors send
//! numbers instead, and the order has been seen swapped, so values are
//! coerced individually and sorted into a [`BBox`] pair by pair.
//!
//! ### `class` vs `category`
//! `format=json` calls the feature family `class`; `format=jsonv2` calls it
//! `category`. Both are accepted.
//!
//! ### `geojson`
//! Only present when `polygon_geojson=1` is requested, and then may still be a
//! `Point` for nodes. Anything that does not parse as a known geometry is
//! treated as absent.
//!
//! ### `osm_type`
//! Full words (`"node"`, `"way"`, `"relation"`) in search results; the details
//! endpoint wants the single upper-case letter.

use serde::Deserialize;
use tripmap_core::{BBox, Geometry};

/// Feature families that describe an area rather than a single spot.
const AREA_CLASSES: &[&str] = &["tourism", "natural", "landuse", "leisure", "historic"];

/// One result row from the geocoder's search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCandidate {
    #[serde(default)]
    pub osm_type: Option<String>,
    #[serde(default)]
    pub osm_id: Option<u64>,
    #[serde(default, alias = "category")]
    pub class: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub boundingbox: Vec<serde_json::Value>,
    #[serde(default)]
    pub geojson: Option<serde_json::Value>,
}

/// Entity reference accepted by the details endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsmRef {
    /// `'N'`, `'W'`, or `'R'`.
    pub kind: char,
    pub id: u64,
}

impl SearchCandidate {
    /// Inline geometry, if the row carries one that parses.
    #[must_use]
    pub fn inline_geometry(&self) -> Option<Geometry> {
        self.geojson.as_ref().and_then(Geometry::from_value)
    }

    /// Inline geometry restricted to `Polygon` / `MultiPolygon`.
    #[must_use]
    pub fn polygon(&self) -> Option<Geometry> {
        self.inline_geometry().filter(Geometry::is_polygonal)
    }

    #[must_use]
    pub fn is_area_like(&self) -> bool {
        self.class
            .as_deref()
            .is_some_and(|c| AREA_CLASSES.iter().any(|a| c.eq_ignore_ascii_case(a)))
    }

    /// Bounding box with latitude and longitude pairs put in order.
    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        let nums: Vec<f64> = self
            .boundingbox
            .iter()
            .map(|v| {
                v.as_f64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
            })
            .collect::<Option<Vec<f64>>>()?;
        match nums.as_slice() {
            [south, north, west, east] if nums.iter().all(|n| n.is_finite()) => {
                Some(BBox::from_corners(*south, *north, *west, *east))
            }
            _ => None,
        }
    }

    /// Bounding-box area in square degrees; `0.0` when there is no box.
    #[must_use]
    pub fn bbox_area(&self) -> f64 {
        self.bbox().map_or(0.0, |b| b.area())
    }

    #[must_use]
    pub fn osm_ref(&self) -> Option<OsmRef> {
        let id = self.osm_id?;
        let kind = match self.osm_type.as_deref()?.trim().to_ascii_lowercase().as_str() {
            "node" | "n" => 'N',
            "way" | "w" => 'W',
            "relation" | "r" => 'R',
            _ => return None,
        };
        Some(OsmRef { kind, id })
    }
}

/// Body of the details endpoint; only the geometry is used.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn candidate(value: serde_json::Value) -> SearchCandidate {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn bbox_parses_string_quad_in_nominatim_order() {
        let c = candidate(json!({"boundingbox": ["20.5", "21.5", "105.0", "106.0"]}));
        assert_eq!(c.bbox(), Some(BBox::from_corners(20.5, 21.5, 105.0, 106.0)));
        assert!((c.bbox_area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bbox_normalizes_swapped_pairs() {
        let c = candidate(json!({"boundingbox": [21.5, 20.5, 106.0, 105.0]}));
        let b = c.bbox().unwrap();
        assert_eq!(b.south, 20.5);
        assert_eq!(b.west, 105.0);
    }

    #[test]
    fn bbox_rejects_malformed_quads() {
        assert!(candidate(json!({"boundingbox": ["1", "2", "3"]})).bbox().is_none());
        assert!(candidate(json!({"boundingbox": ["a", "2", "3", "4"]})).bbox().is_none());
        assert!(candidate(json!({})).bbox().is_none());
    }

    #[test]
    fn category_alias_feeds_area_check() {
        assert!(candidate(json!({"category": "tourism"})).is_area_like());
        assert!(candidate(json!({"class": "Natural"})).is_area_like());
        assert!(!candidate(json!({"class": "amenity"})).is_area_like());
        assert!(!candidate(json!({})).is_area_like());
    }

    #[test]
    fn polygon_ignores_point_geojson() {
        let point = candidate(json!({"geojson": {"type": "Point", "coordinates": [105.0, 21.0]}}));
        assert!(point.inline_geometry().is_some());
        assert!(point.polygon().is_none());
    }

    #[test]
    fn osm_ref_maps_type_words() {
        let c = candidate(json!({"osm_type": "relation", "osm_id": 1_902_111}));
        assert_eq!(c.osm_ref(), Some(OsmRef { kind: 'R', id: 1_902_111 }));
        assert!(candidate(json!({"osm_type": "way"})).osm_ref().is_none());
        assert!(candidate(json!({"osm_type": "area", "osm_id": 1})).osm_ref().is_none());
    }
}
