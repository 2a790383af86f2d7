//! Canonical itinerary points and the day-selection helpers built on them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// One canonical geographic point belonging to a specific itinerary day.
///
/// Produced by the normalizer; `lat` is within `[-90, 90]`, `lng` within
/// `[-180, 180]`, and `day` is at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub day: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Link to where the place information came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Monetary estimate exactly as the assistant wrote it (number or text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<serde_json::Value>,
    /// Raw GeoJSON attached to the source record (geometry, feature, or collection).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_geometry: Option<serde_json::Value>,
}

/// Which part of the itinerary the map view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySelection {
    #[default]
    All,
    Day(u32),
}

impl DaySelection {
    /// Collapses `All` to the only day present when every point shares one day.
    #[must_use]
    pub fn effective(self, points: &[Destination]) -> Self {
        match self {
            DaySelection::All => match days(points).as_slice() {
                [only] => DaySelection::Day(*only),
                _ => DaySelection::All,
            },
            DaySelection::Day(d) => DaySelection::Day(d),
        }
    }

    #[must_use]
    pub fn includes(self, day: u32) -> bool {
        match self {
            DaySelection::All => true,
            DaySelection::Day(d) => d == day,
        }
    }
}

impl std::fmt::Display for DaySelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DaySelection::All => write!(f, "all"),
            DaySelection::Day(d) => write!(f, "day {d}"),
        }
    }
}

/// Boundary cache key: `(day, index-within-day, slugified-name)`.
///
/// Two destinations sharing a name on different days, or appearing twice on
/// the same day, get distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryKey {
    pub day: u32,
    pub index: usize,
    pub slug: String,
}

impl BoundaryKey {
    #[must_use]
    pub fn new(day: u32, index: usize, name: &str) -> Self {
        Self {
            day,
            index,
            slug: slugify(name),
        }
    }

    /// Builds one key per destination, numbering each day's points from zero
    /// in list order.
    #[must_use]
    pub fn assign(points: &[Destination]) -> Vec<BoundaryKey> {
        let mut per_day: HashMap<u32, usize> = HashMap::new();
        points
            .iter()
            .map(|p| {
                let slot = per_day.entry(p.day).or_insert(0);
                let key = BoundaryKey::new(p.day, *slot, &p.name);
                *slot += 1;
                key
            })
            .collect()
    }
}

impl std::fmt::Display for BoundaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.day, self.index, self.slug)
    }
}

/// Lowercases `name` and joins its alphanumeric runs with `-`.
///
/// Non-ASCII letters are kept so names such as `"Hội An"` still produce
/// distinct slugs.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Distinct days present in `points`, ascending.
#[must_use]
pub fn days(points: &[Destination]) -> Vec<u32> {
    let mut out: Vec<u32> = points.iter().map(|p| p.day).collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Groups destinations by day, keeping list order within each day.
#[must_use]
pub fn group_by_day(points: &[Destination]) -> BTreeMap<u32, Vec<&Destination>> {
    let mut groups: BTreeMap<u32, Vec<&Destination>> = BTreeMap::new();
    for p in points {
        groups.entry(p.day).or_default().push(p);
    }
    groups
}
