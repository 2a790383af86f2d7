//! Incremental synchronization of a [`MapEngine`] with the day selection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tripmap_core::{BBox, BoundaryKey, DaySelection, Destination, Geometry, LngLat};
use tripmap_extract::{fix_coordinates, CountryBands};
use tripmap_geo::ResolveBoundary;

use crate::engine::{Layer, MapEngine, Marker, Paint, Popup};
use crate::error::RenderError;
use crate::palette::color_for;
use crate::ready::ReadyGate;
use crate::view::{ViewState, Viewport};

/// Each outline bound grows by this share of its extent before merging.
const BOUND_MARGIN: f64 = 0.06;
/// Degrees of padding for a bound with no extent on an axis.
const MIN_BOUND_PAD: f64 = 0.01;
const FIT_PADDING_PX: u32 = 60;
const MAX_FIT_ZOOM: f64 = 14.0;
const SINGLE_POINT_ZOOM: f64 = 13.0;
const FALLBACK_RADIUS_M: f64 = 2_000.0;
const FALLBACK_STEPS: usize = 64;
const FILL_OPACITY: f64 = 0.18;
const LINE_WIDTH: f64 = 2.0;

/// Result of one [`RenderSync::sync`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PassOutcome {
    Rendered(PassSummary),
    /// A newer pass started; this one stopped touching the engine.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassSummary {
    pub selection: DaySelection,
    pub markers: usize,
    /// Destinations drawn with a resolved boundary.
    pub outlines: usize,
    /// Destinations drawn with the dashed fallback circle.
    pub fallbacks: usize,
    pub viewport: Viewport,
}

#[derive(Debug, Default)]
struct SyncState {
    view: ViewState,
    busy_owner: Option<u64>,
    layers: Vec<String>,
    sources: Vec<String>,
}

/// Drives a map engine so it shows exactly the selected destinations.
///
/// Passes are stamped with an increasing generation. A pass that notices a
/// newer one has started returns [`PassOutcome::Superseded`] without making
/// further engine calls. Locks are never held across an `.await`.
pub struct RenderSync<E, R> {
    engine: Mutex<E>,
    resolver: R,
    ready: ReadyGate,
    bands: CountryBands,
    generation: AtomicU64,
    state: Mutex<SyncState>,
}

/// Keeps `loading` set for the lifetime of one pass.
///
/// Only the pass that last set the flag clears it, so an older pass unwinding
/// late cannot hide a newer pass's loading state.
struct BusyGuard<'a> {
    state: &'a Mutex<SyncState>,
    generation: u64,
}

impl<'a> BusyGuard<'a> {
    fn acquire(state: &'a Mutex<SyncState>, generation: u64) -> Self {
        let mut s = lock(state);
        s.busy_owner = Some(generation);
        s.view.loading = true;
        Self { state, generation }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut s = lock(self.state);
        if s.busy_owner == Some(self.generation) {
            s.busy_owner = None;
            s.view.loading = false;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E: MapEngine, R: ResolveBoundary> RenderSync<E, R> {
    #[must_use]
    pub fn new(engine: E, resolver: R, ready: ReadyGate) -> Self {
        Self {
            engine: Mutex::new(engine),
            resolver,
            ready,
            bands: CountryBands::default(),
            generation: AtomicU64::new(0),
            state: Mutex::new(SyncState::default()),
        }
    }

    /// Overrides the coordinate bands used when re-checking points before
    /// drawing.
    #[must_use]
    pub fn with_bands(mut self, bands: CountryBands) -> Self {
        self.bands = bands;
        self
    }

    /// Replaces the whole destination list and resets the selection to all
    /// days. Takes effect on the next [`RenderSync::sync`].
    pub fn set_points(&self, points: Vec<Destination>) {
        let mut s = lock(&self.state);
        s.view.all_points = points;
        s.view.selected_day = DaySelection::All;
    }

    pub fn select(&self, selection: DaySelection) {
        lock(&self.state).view.selected_day = selection;
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        lock(&self.state).view.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.state).view.loading
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Runs `f` with shared access to the engine.
    pub fn with_engine<T>(&self, f: impl FnOnce(&E) -> T) -> T {
        f(&lock(&self.engine))
    }

    /// Stops every in-flight pass from touching the engine again and clears
    /// the loading flag. Call when the view goes away mid-pass.
    pub fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut s = lock(&self.state);
        s.busy_owner = None;
        s.view.loading = false;
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    /// Rebuilds the engine for the current points and selection.
    ///
    /// 1. Raises the loading flag, then waits until the engine is ready.
    /// 2. Removes every outline and marker this type added earlier.
    /// 3. Resets the view and stops if nothing is selected.
    /// 4. For each selected destination in order: re-checks its coordinates,
    ///    adds a colored marker with popup, resolves its boundary, and draws
    ///    either the outline or a dashed 2 km circle.
    /// 5. Fits the viewport to the padded union of drawn outlines and, when
    ///    any outline was drawn, the fallback circles beside them. With no
    ///    outline it centers on a lone destination or fits the raw points.
    ///
    /// Boundaries are resolved one destination at a time.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NeverReady`] if the engine can never become
    /// ready, or any error the engine reports. The loading flag is cleared on
    /// every exit path.
    pub async fn sync(&self) -> Result<PassOutcome, RenderError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _busy = BusyGuard::acquire(&self.state, generation);

        if !self.ready.is_ready() {
            tracing::debug!(generation, "map engine not ready, deferring render pass");
        }
        self.ready.wait().await?;
        if self.is_superseded(generation) {
            return Ok(PassOutcome::Superseded);
        }

        let (points, selection) = {
            let s = lock(&self.state);
            (s.view.all_points.clone(), s.view.selected_day)
        };
        let selection = selection.effective(&points);
        let keys = BoundaryKey::assign(&points);
        let active: Vec<(&Destination, &BoundaryKey)> = points
            .iter()
            .zip(keys.iter())
            .filter(|(p, _)| selection.includes(p.day))
            .collect();

        self.clear_previous()?;

        if active.is_empty() {
            lock(&self.engine).reset_view()?;
            lock(&self.state).view.combined_bound = None;
            tracing::debug!(generation, %selection, "nothing selected, view reset");
            return Ok(PassOutcome::Rendered(PassSummary {
                selection,
                markers: 0,
                outlines: 0,
                fallbacks: 0,
                viewport: Viewport::Reset,
            }));
        }

        let mut combined: Option<BBox> = None;
        let mut fallback_bounds: Vec<BBox> = Vec::new();
        let mut drawn_points: Vec<LngLat> = Vec::with_capacity(active.len());
        let mut outlines = 0;
        let mut fallbacks = 0;

        for (index, (destination, key)) in active.iter().enumerate() {
            if self.is_superseded(generation) {
                return Ok(PassOutcome::Superseded);
            }

            let (lat, lng) = fix_coordinates(destination.lat, destination.lng, &self.bands);
            let at = LngLat::new(lng, lat);
            let color = color_for(index);
            lock(&self.engine).add_marker(Marker {
                at,
                color,
                popup: Popup::for_destination(destination),
            })?;
            drawn_points.push(at);

            let geometry = self.resolver.resolve(destination, key).await;
            if self.is_superseded(generation) {
                tracing::debug!(generation, key = %key, "render pass superseded");
                return Ok(PassOutcome::Superseded);
            }

            match geometry.filter(Geometry::is_outline) {
                Some(outline) => {
                    self.draw_outline(key, &outline, color)?;
                    if let Some(bound) = outline.bbox() {
                        let padded = bound.expand(BOUND_MARGIN, MIN_BOUND_PAD);
                        combined = Some(combined.map_or(padded, |c| c.union(padded)));
                    }
                    outlines += 1;
                }
                None => {
                    if let Some(bound) = self.draw_fallback(key, at, color)? {
                        fallback_bounds.push(bound.expand(BOUND_MARGIN, MIN_BOUND_PAD));
                    }
                    fallbacks += 1;
                }
            }
        }

        // Fallback circles only widen a bound that some outline started.
        let combined = combined.map(|bound| {
            fallback_bounds
                .iter()
                .fold(bound, |acc, circle| acc.union(*circle))
        });
        let viewport = choose_viewport(combined, &drawn_points);
        apply_viewport(&mut *lock(&self.engine), viewport)?;
        lock(&self.state).view.combined_bound = combined;

        tracing::info!(
            generation,
            %selection,
            markers = drawn_points.len(),
            outlines,
            fallbacks,
            "render pass complete"
        );
        Ok(PassOutcome::Rendered(PassSummary {
            selection,
            markers: drawn_points.len(),
            outlines,
            fallbacks,
            viewport,
        }))
    }

    /// Removes tracked layers, then their sources, then all markers.
    fn clear_previous(&self) -> Result<(), RenderError> {
        let (layers, sources) = {
            let mut s = lock(&self.state);
            (std::mem::take(&mut s.layers), std::mem::take(&mut s.sources))
        };
        let mut engine = lock(&self.engine);
        for id in &layers {
            engine.remove_layer(id)?;
        }
        for id in &sources {
            engine.remove_source(id)?;
        }
        engine.clear_markers()
    }

    fn draw_outline(&self, key: &BoundaryKey, outline: &Geometry, color: &'static str) -> Result<(), RenderError> {
        let source_id = format!("outline-{key}");
        let mut layers = Vec::with_capacity(2);
        if outline.is_polygonal() {
            layers.push(Layer {
                id: format!("{source_id}-fill"),
                source_id: source_id.clone(),
                paint: Paint::Fill {
                    color,
                    opacity: FILL_OPACITY,
                },
            });
        }
        layers.push(Layer {
            id: format!("{source_id}-line"),
            source_id: source_id.clone(),
            paint: Paint::Line {
                color,
                width: LINE_WIDTH,
                dashed: false,
            },
        });
        self.add_tracked(source_id, outline, layers)
    }

    /// Draws the dashed circle and returns its bound.
    fn draw_fallback(
        &self,
        key: &BoundaryKey,
        at: LngLat,
        color: &'static str,
    ) -> Result<Option<BBox>, RenderError> {
        let source_id = format!("fallback-{key}");
        let circle = Geometry::circle(at, FALLBACK_RADIUS_M, FALLBACK_STEPS);
        let layer = Layer {
            id: format!("{source_id}-line"),
            source_id: source_id.clone(),
            paint: Paint::Line {
                color,
                width: LINE_WIDTH,
                dashed: true,
            },
        };
        self.add_tracked(source_id, &circle, vec![layer])?;
        Ok(circle.bbox())
    }

    /// Adds a source and its layers, recording ids for the next clear.
    fn add_tracked(&self, source_id: String, geometry: &Geometry, layers: Vec<Layer>) -> Result<(), RenderError> {
        let mut engine = lock(&self.engine);
        engine.add_source(&source_id, geometry)?;
        lock(&self.state).sources.push(source_id);
        for layer in layers {
            let id = layer.id.clone();
            engine.add_layer(layer)?;
            lock(&self.state).layers.push(id);
        }
        Ok(())
    }
}

fn choose_viewport(combined: Option<BBox>, points: &[LngLat]) -> Viewport {
    if let Some(bounds) = combined {
        return Viewport::Fit {
            bounds,
            padding: FIT_PADDING_PX,
            max_zoom: MAX_FIT_ZOOM,
        };
    }
    match (points, BBox::from_points(points.iter().copied())) {
        ([only], _) => Viewport::Center {
            at: *only,
            zoom: SINGLE_POINT_ZOOM,
        },
        (_, Some(raw)) => Viewport::Fit {
            bounds: raw.expand(BOUND_MARGIN, MIN_BOUND_PAD),
            padding: FIT_PADDING_PX,
            max_zoom: MAX_FIT_ZOOM,
        },
        (_, None) => Viewport::Reset,
    }
}

fn apply_viewport<E: MapEngine>(engine: &mut E, viewport: Viewport) -> Result<(), RenderError> {
    match viewport {
        Viewport::Fit {
            bounds,
            padding,
            max_zoom,
        } => engine.fit_bounds(bounds, padding, max_zoom),
        Viewport::Center { at, zoom } => engine.center_on(at, zoom),
        Viewport::Reset => engine.reset_view(),
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
