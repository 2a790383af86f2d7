//! Recovery of structured itinerary data from free-form assistant replies.
//!
//! [`extract`] finds the structured block inside noisy text; [`normalize`]
//! turns it into canonical [`tripmap_core::Destination`] records.

pub mod coerce;
pub mod extract;
pub mod normalize;
pub mod payload;

mod scan;

pub use coerce::{fix_coordinates, to_number, CountryBands};
pub use extract::{extract, Extraction};
pub use normalize::{normalize, normalize_with};
pub use payload::{DayPlan, ExtractedPayload};
