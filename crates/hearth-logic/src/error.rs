//! Layout configuration errors.
//!
//! These are programmer errors caught while a level is being assembled.
//! Nothing at runtime recovers from them; the build pass stops at the first.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Gap centers must be given in ascending order.
    #[error("gap at {center} follows gap at {previous}: gaps must be sorted ascending")]
    UnsortedGaps { previous: f32, center: f32 },

    /// A gap starts before the previous gap (or the span start) ends.
    #[error("gap at {center} (width {width}) starts at {start}, before cursor {cursor}")]
    OverlappingGaps {
        center: f32,
        width: f32,
        start: f32,
        cursor: f32,
    },

    /// Gap widths must be positive and finite.
    #[error("gap at {center} has invalid width {width}")]
    InvalidGapWidth { center: f32, width: f32 },

    /// A gap reaches past the end of the span it was cut into.
    #[error("gap at {center} (width {width}) extends past span end {end}")]
    GapOutOfRange { center: f32, width: f32, end: f32 },

    /// Zero, negative or non-finite sizes.
    #[error("{what} has invalid dimensions {width}×{depth}")]
    InvalidDimensions {
        what: String,
        width: f32,
        depth: f32,
    },

    /// A (min, max) range with min > max or non-finite bounds.
    #[error("{what} range ({min}, {max}) is invalid")]
    InvalidRange { what: &'static str, min: f32, max: f32 },

    /// A reference to a placement that does not exist in the plan.
    #[error("{what} #{index} does not exist in the plan")]
    UnknownPlacement { what: &'static str, index: usize },
}
