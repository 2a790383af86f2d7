//! Fixed marker and outline colors.

/// Ordered colors assigned by position in the active selection.
pub const PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#9a6324",
];

/// Color for the destination at `index` within the active subset.
#[must_use]
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_eight() {
        assert_eq!(color_for(0), PALETTE[0]);
        assert_eq!(color_for(7), PALETTE[7]);
        assert_eq!(color_for(8), PALETTE[0]);
        assert_eq!(color_for(19), PALETTE[3]);
    }
}
