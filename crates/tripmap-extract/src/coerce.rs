//! Lenient numeric coercion and coordinate repair.
//!
//! Everything here is pure so it can be applied both during normalization and
//! again, defensively, right before rendering.

use std::ops::RangeInclusive;

use serde_json::Value;

/// Expected coordinate bands for the country the itinerary covers.
///
/// Used by the second swap rule in [`fix_coordinates`]: a longitude that looks
/// like one of the country's latitudes, paired with a latitude that looks like
/// one of its longitudes, is treated as transposed.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBands {
    pub lat: RangeInclusive<f64>,
    pub lng: RangeInclusive<f64>,
}

impl Default for CountryBands {
    /// Mainland Southeast Asia, with a margin around Vietnam.
    fn default() -> Self {
        Self {
            lat: 6.0..=30.0,
            lng: 95.0..=120.0,
        }
    }
}

/// Coerces a JSON value to a finite `f64`.
///
/// Numbers pass through. Strings go through [`parse_number_text`]. Anything
/// else, and any non-finite result, becomes `0.0`.
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_number_text(s),
        _ => 0.0,
    }
}

/// Parses human-formatted numeric text.
///
/// - Both `.` and `,` present: the dot is the decimal point. Commas ahead of
///   it are digit grouping and are dropped; a comma after it ends the number
///   (`"1,234.5"` → `1234.5`, `"1.234,56"` → `1.234`).
/// - Only `,` present: the comma is the decimal separator (`"10,5"` → `10.5`).
/// - Remaining characters other than digits, `.` and `-` are stripped, then
///   the longest numeric prefix is parsed.
///
/// Empty or unparseable input yields `0.0`.
#[must_use]
pub fn parse_number_text(raw: &str) -> f64 {
    let s = raw.trim();
    let normalized = match (s.find('.'), s.contains(',')) {
        (Some(dot), true) => {
            let cut = s[dot..].find(',').map_or(s.len(), |rel| dot + rel);
            s[..cut].replace(',', "")
        }
        (None, true) => s.replace(',', "."),
        _ => s.to_owned(),
    };

    let cleaned: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match leading_float(&cleaned) {
        Some(v) => v,
        None => {
            if !s.is_empty() {
                tracing::debug!(input = raw, "numeric text did not parse; coercing to 0");
            }
            0.0
        }
    }
}

/// Parses the longest prefix of `s` shaped like `-?digits(.digits)?`.
fn leading_float(s: &str) -> Option<f64> {
    let mut end = 0usize;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (i, c) in s.char_indices() {
        match c {
            '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            d if d.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    s[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Repairs transposed coordinates and clamps the result to valid ranges.
///
/// Swap rules, first match wins:
/// 1. `|lat| > 90` while `|lng| <= 90`.
/// 2. `lng` inside `bands.lat` while `lat` inside `bands.lng`.
///
/// Returns `(lat, lng)`.
#[must_use]
pub fn fix_coordinates(lat: f64, lng: f64, bands: &CountryBands) -> (f64, f64) {
    let (lat, lng) = if lat.abs() > 90.0 && lng.abs() <= 90.0 {
        (lng, lat)
    } else if bands.lat.contains(&lng) && bands.lng.contains(&lat) {
        (lng, lat)
    } else {
        (lat, lng)
    };

    let lat = if lat.is_finite() { lat.clamp(-90.0, 90.0) } else { 0.0 };
    let lng = if lng.is_finite() { lng.clamp(-180.0, 180.0) } else { 0.0 };
    (lat, lng)
}
