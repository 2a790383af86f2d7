//! Shape classification of parsed JSON into itinerary payload variants.

use serde_json::{Map, Value};

/// Keys under which a day object lists its places.
const DAY_PLACE_KEYS: &[&str] = &["destinations", "places", "locations", "stops"];
/// Keys under which a top-level object lists its days.
const ITINERARY_KEYS: &[&str] = &["itinerary", "days"];
/// Keys under which a top-level object lists loose places.
const PLACE_LIST_KEYS: &[&str] = &["places", "destinations", "locations"];
/// Any of these marks an object as describing a place.
const PLACE_MARKER_KEYS: &[&str] = &[
    "name",
    "title",
    "place",
    "lat",
    "latitude",
    "lng",
    "lon",
    "longitude",
];

/// One day of an itinerary as the assistant wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    /// The raw `day` value, if the day object carried one.
    pub day: Option<Value>,
    pub destinations: Vec<Value>,
}

/// Structured data recovered from an assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedPayload {
    /// Ordered days, each with ordered place records.
    Itinerary(Vec<DayPlan>),
    /// Flat list of place records, implicitly day 1.
    PlaceList(Vec<Value>),
    /// One place record, implicitly day 1.
    SinglePlace(Value),
}

impl ExtractedPayload {
    /// Classifies parsed JSON. Returns `None` when the value has none of the
    /// recognised shapes, so callers can keep looking for another candidate.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Self::from_array(items),
            Value::Object(map) => Self::from_object(map),
            _ => None,
        }
    }

    fn from_array(items: Vec<Value>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        if items.iter().all(is_day_object) {
            return Some(ExtractedPayload::Itinerary(
                items.into_iter().filter_map(day_plan).collect(),
            ));
        }
        let places: Vec<Value> = items.into_iter().filter(is_place_object).collect();
        if places.is_empty() {
            None
        } else {
            Some(ExtractedPayload::PlaceList(places))
        }
    }

    fn from_object(mut map: Map<String, Value>) -> Option<Self> {
        for key in ITINERARY_KEYS {
            if let Some(Value::Array(days)) = map.get(*key) {
                if days.iter().all(is_day_object) {
                    let days = match map.remove(*key) {
                        Some(Value::Array(days)) => days,
                        _ => Vec::new(),
                    };
                    return Some(ExtractedPayload::Itinerary(
                        days.into_iter().filter_map(day_plan).collect(),
                    ));
                }
            }
        }

        // A lone day object is an itinerary of one day.
        if map.contains_key("day")
            && DAY_PLACE_KEYS
                .iter()
                .any(|k| map.get(*k).is_some_and(Value::is_array))
        {
            return day_plan(Value::Object(map)).map(|plan| ExtractedPayload::Itinerary(vec![plan]));
        }

        for key in PLACE_LIST_KEYS {
            if let Some(Value::Array(places)) = map.get(*key) {
                if places.iter().any(is_place_object) {
                    let places = match map.remove(*key) {
                        Some(Value::Array(places)) => places,
                        _ => Vec::new(),
                    };
                    return Some(ExtractedPayload::PlaceList(
                        places.into_iter().filter(is_place_object).collect(),
                    ));
                }
            }
        }

        let value = Value::Object(map);
        if is_place_object(&value) {
            Some(ExtractedPayload::SinglePlace(value))
        } else {
            None
        }
    }

    /// Number of place records carried, across all days.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            ExtractedPayload::Itinerary(days) => days.iter().map(|d| d.destinations.len()).sum(),
            ExtractedPayload::PlaceList(places) => places.len(),
            ExtractedPayload::SinglePlace(_) => 1,
        }
    }
}

fn is_day_object(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        DAY_PLACE_KEYS
            .iter()
            .any(|k| obj.get(*k).is_some_and(Value::is_array))
    })
}

fn is_place_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| PLACE_MARKER_KEYS.iter().any(|k| obj.contains_key(*k)))
}

fn day_plan(value: Value) -> Option<DayPlan> {
    let Value::Object(mut obj) = value else {
        return None;
    };
    let day = obj.remove("day");
    let destinations = DAY_PLACE_KEYS
        .iter()
        .find_map(|k| match obj.remove(*k) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        })
        .unwrap_or_default();
    Some(DayPlan { day, destinations })
}
