//! Candidate selection among geocoder search results.

use crate::types::SearchCandidate;

/// Picks the candidate most likely to describe an area.
///
/// 1. The first candidate carrying inline polygon geometry.
/// 2. Otherwise, among area-like candidates (or all of them when none are
///    area-like), the one with the largest bounding box. Ties keep the
///    earlier result.
#[must_use]
pub fn choose_candidate(candidates: &[SearchCandidate]) -> Option<&SearchCandidate> {
    if let Some(with_polygon) = candidates.iter().find(|c| c.polygon().is_some()) {
        return Some(with_polygon);
    }

    let area_like: Vec<&SearchCandidate> = candidates.iter().filter(|c| c.is_area_like()).collect();
    let pool: Vec<&SearchCandidate> = if area_like.is_empty() {
        candidates.iter().collect()
    } else {
        area_like
    };

    pool.into_iter().fold(None, |best: Option<&SearchCandidate>, c| match best {
        Some(b) if b.bbox_area() >= c.bbox_area() => Some(b),
        _ => Some(c),
    })
}
