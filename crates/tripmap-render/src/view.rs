use serde::Serialize;
use tripmap_core::{BBox, DaySelection, Destination, LngLat};

/// What the surrounding UI reads to draw day controls and a loading indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub all_points: Vec<Destination>,
    pub selected_day: DaySelection,
    /// True while a render pass is mutating the engine.
    pub loading: bool,
    /// Padded union of every outline drawn by the last completed pass.
    pub combined_bound: Option<BBox>,
}

/// The final camera command of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Viewport {
    Fit { bounds: BBox, padding: u32, max_zoom: f64 },
    Center { at: LngLat, zoom: f64 },
    Reset,
}
