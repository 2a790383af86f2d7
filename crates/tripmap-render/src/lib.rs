//! Map synchronization for itinerary destinations.
//!
//! [`RenderSync`] rebuilds the markers, outlines, and viewport of a
//! [`MapEngine`] so they match exactly the destinations of the current day
//! selection. [`GeoJsonEngine`] is an engine that records what it was asked
//! to draw and exports it as GeoJSON.

pub mod engine;
pub mod error;
pub mod palette;
pub mod ready;
pub mod snapshot;
pub mod sync;
pub mod view;

pub use engine::{Layer, MapEngine, Marker, Paint, Popup};
pub use error::RenderError;
pub use palette::{color_for, PALETTE};
pub use ready::{ReadyGate, ReadySignal};
pub use snapshot::GeoJsonEngine;
pub use sync::{PassOutcome, PassSummary, RenderSync};
pub use view::{ViewState, Viewport};
