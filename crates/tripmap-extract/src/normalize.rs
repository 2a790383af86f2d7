//! Normalization from [`ExtractedPayload`] records to [`tripmap_core::Destination`].
//!
//! Numeric coercion and coordinate repair are delegated to [`crate::coerce`];
//! this module handles key aliases, day assignment, and ordering.

use serde_json::{Map, Value};
use tripmap_core::Destination;

use crate::coerce::{fix_coordinates, to_number, CountryBands};
use crate::payload::ExtractedPayload;

const NAME_KEYS: &[&str] = &["name", "title", "place"];
const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LNG_KEYS: &[&str] = &["lng", "lon", "longitude"];
const DESC_KEYS: &[&str] = &["desc", "description"];
const SOURCE_KEYS: &[&str] = &["source", "url", "link"];
/// Monetary estimate aliases, highest priority first.
const BUDGET_KEYS: &[&str] = &["budget", "estimated_cost", "estimatedCost", "cost", "price"];
const GEOMETRY_KEYS: &[&str] = &["geometry", "geojson", "boundary"];
/// Nested containers some replies use for the coordinate pair.
const COORD_CONTAINER_KEYS: &[&str] = &["coordinates", "coords", "location", "position"];

/// Normalizes a payload using the default [`CountryBands`].
#[must_use]
pub fn normalize(payload: &ExtractedPayload) -> Vec<Destination> {
    normalize_with(payload, &CountryBands::default())
}

/// Normalizes a payload into destinations ordered by day, keeping record
/// order within each day.
///
/// Itinerary days take their number from the day object's `day` field; a
/// missing or unparseable day falls back to the day's 1-based position.
/// Place lists and single places are day 1. Non-object records are skipped.
#[must_use]
pub fn normalize_with(payload: &ExtractedPayload, bands: &CountryBands) -> Vec<Destination> {
    let mut out = Vec::new();

    match payload {
        ExtractedPayload::Itinerary(days) => {
            for (position, plan) in days.iter().enumerate() {
                let day = day_number(plan.day.as_ref(), position);
                out.extend(
                    plan.destinations
                        .iter()
                        .filter_map(|record| normalize_record(record, day, bands)),
                );
            }
        }
        ExtractedPayload::PlaceList(places) => {
            out.extend(
                places
                    .iter()
                    .filter_map(|record| normalize_record(record, 1, bands)),
            );
        }
        ExtractedPayload::SinglePlace(place) => {
            out.extend(normalize_record(place, 1, bands));
        }
    }

    // Stable: preserves insertion order inside each day.
    out.sort_by_key(|d| d.day);
    out
}

fn day_number(raw: Option<&Value>, position: usize) -> u32 {
    let fallback = u32::try_from(position + 1).unwrap_or(u32::MAX);
    let Some(raw) = raw else {
        return fallback;
    };
    let n = to_number(raw);
    if n.abs() < f64::EPSILON && !matches!(raw, Value::Number(_)) {
        return fallback;
    }
    if n < 1.0 {
        return 1;
    }
    // Saturating float-to-int cast is the intended behaviour for huge days.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let day = n.round() as u32;
    day.max(1)
}

/// Builds one destination from a place record, or `None` if the record is
/// not a JSON object.
fn normalize_record(record: &Value, day: u32, bands: &CountryBands) -> Option<Destination> {
    let Some(obj) = record.as_object() else {
        tracing::debug!(day, "skipping non-object place record");
        return None;
    };

    let name = first_present(obj, NAME_KEYS)
        .and_then(text_of)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unnamed place".to_string());

    let (raw_lat, raw_lng) = raw_coordinates(obj);
    let lat = raw_lat.map_or(0.0, to_number);
    let lng = raw_lng.map_or(0.0, to_number);
    if raw_lat.is_none() || raw_lng.is_none() {
        tracing::debug!(name = %name, day, "place record missing a coordinate; defaulting to 0");
    }
    let (lat, lng) = fix_coordinates(lat, lng, bands);

    let desc = first_present(obj, DESC_KEYS)
        .and_then(text_of)
        .filter(|s| !s.is_empty());
    let source = first_present(obj, SOURCE_KEYS)
        .and_then(text_of)
        .filter(|s| !s.is_empty());
    let budget = first_present(obj, BUDGET_KEYS).cloned();
    let embedded_geometry = first_present(obj, GEOMETRY_KEYS)
        .filter(|v| v.is_object())
        .cloned();

    Some(Destination {
        day,
        name,
        lat,
        lng,
        desc,
        source,
        budget,
        embedded_geometry,
    })
}

/// Latitude and longitude values from the record itself, or from a nested
/// coordinate container (`{"lat", "lng"}` object or `[lat, lng]` pair).
fn raw_coordinates(obj: &Map<String, Value>) -> (Option<&Value>, Option<&Value>) {
    let lat = first_present(obj, LAT_KEYS);
    let lng = first_present(obj, LNG_KEYS);
    if lat.is_some() || lng.is_some() {
        return (lat, lng);
    }

    match first_present(obj, COORD_CONTAINER_KEYS) {
        Some(Value::Object(inner)) => (first_present(inner, LAT_KEYS), first_present(inner, LNG_KEYS)),
        Some(Value::Array(pair)) if pair.len() >= 2 => (pair.first(), pair.get(1)),
        _ => (None, None),
    }
}

/// First non-null value among `keys`, in priority order.
fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
