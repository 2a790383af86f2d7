//! Geometry carried inside the assistant's own place record.
//!
//! Accepts a bare geometry, a `Feature`, or a `FeatureCollection`. Only
//! outline geometries (polygon, multipolygon, line, multiline) are usable.

use serde_json::Value;
use tripmap_core::Geometry;

/// Unwraps `value` to the outline geometry it describes, if any.
///
/// For a collection the first polygonal feature wins, then the first linear
/// one; point features are skipped.
#[must_use]
pub fn outline_from_value(value: &Value) -> Option<Geometry> {
    match value.get("type").and_then(Value::as_str) {
        Some("Feature") => value.get("geometry").and_then(outline_from_value),
        Some("FeatureCollection") => {
            let geometries: Vec<Geometry> = value
                .get("features")
                .and_then(Value::as_array)?
                .iter()
                .filter_map(outline_from_value)
                .collect();
            let polygon = geometries.iter().position(Geometry::is_polygonal);
            let index = polygon.or_else(|| geometries.iter().position(Geometry::is_linear))?;
            geometries.into_iter().nth(index)
        }
        Some(_) => Geometry::from_value(value).filter(Geometry::is_outline),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ring() -> Value {
        json!([[[105.8, 21.0], [105.9, 21.0], [105.9, 21.1], [105.8, 21.0]]])
    }

    #[test]
    fn bare_polygon_is_used_verbatim() {
        let value = json!({"type": "Polygon", "coordinates": ring()});
        let geometry = outline_from_value(&value).unwrap();
        assert_eq!(serde_json::to_value(&geometry).unwrap(), value);
    }

    #[test]
    fn point_geometry_is_not_an_outline() {
        let value = json!({"type": "Point", "coordinates": [105.8, 21.0]});
        assert!(outline_from_value(&value).is_none());
    }

    #[test]
    fn feature_is_unwrapped() {
        let value = json!({
            "type": "Feature",
            "properties": {"name": "Hoan Kiem"},
            "geometry": {"type": "LineString", "coordinates": [[105.8, 21.0], [105.9, 21.1]]}
        });
        assert!(outline_from_value(&value).unwrap().is_linear());
    }

    #[test]
    fn collection_prefers_polygon_over_earlier_line_and_point() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [105.8, 21.0]}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[105.8, 21.0], [105.9, 21.1]]}},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": ring()}}
            ]
        });
        assert!(outline_from_value(&value).unwrap().is_polygonal());
    }

    #[test]
    fn collection_of_points_yields_nothing() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}]
        });
        assert!(outline_from_value(&value).is_none());
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        assert!(outline_from_value(&json!({"type": "Polygon", "coordinates": "nope"})).is_none());
        assert!(outline_from_value(&json!("Polygon")).is_none());
    }
}
