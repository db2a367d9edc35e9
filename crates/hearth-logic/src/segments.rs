//! Wall segmentation along a single axis.
//!
//! A wall line from `start` to `end` is cut by door gaps; what remains is a
//! list of solid spans. The same list is used to build both walls of a
//! corridor, so left and right walls always line up.

use serde::{Deserialize, Serialize};

use crate::constants::{doors, walls};
use crate::error::LayoutError;
use crate::primitives::{Color, Primitive, Vec3};

/// Tolerance for float comparisons between gap edges and the cursor.
const EPSILON: f32 = 1e-4;

/// A solid wall span, by center and length along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub center: f32,
    pub length: f32,
}

impl Segment {
    pub fn from_bounds(start: f32, end: f32) -> Self {
        Self {
            center: (start + end) / 2.0,
            length: end - start,
        }
    }

    pub fn start(&self) -> f32 {
        self.center - self.length / 2.0
    }

    pub fn end(&self) -> f32 {
        self.center + self.length / 2.0
    }
}

/// A door opening to be excluded from a wall line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapSpec {
    pub center: f32,
    pub width: f32,
}

impl GapSpec {
    pub fn new(center: f32, width: f32) -> Self {
        Self { center, width }
    }

    /// A gap exactly one door wide.
    pub fn door(center: f32) -> Self {
        Self::new(center, doors::WIDTH)
    }

    pub fn start(&self) -> f32 {
        self.center - self.width / 2.0
    }

    pub fn end(&self) -> f32 {
        self.center + self.width / 2.0
    }
}

/// World axis a wall line runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Point with `along` on this axis and `across` on the other one.
    pub fn point(self, along: f32, across: f32, y: f32) -> Vec3 {
        match self {
            Axis::X => Vec3::new(along, y, across),
            Axis::Z => Vec3::new(across, y, along),
        }
    }

    /// Box extents: `length` along this axis, `thickness` across it.
    pub fn extents(self, length: f32, height: f32, thickness: f32) -> Vec3 {
        match self {
            Axis::X => Vec3::new(length, height, thickness),
            Axis::Z => Vec3::new(thickness, height, length),
        }
    }

    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }
}

/// Check the gap-list preconditions without computing segments.
pub fn validate_gaps(start: f32, end: f32, gaps: &[GapSpec]) -> Result<(), LayoutError> {
    compute_segments(start, end, gaps).map(|_| ())
}

/// Split `[start, end]` into solid segments around `gaps`.
///
/// Gaps must be sorted by center, positive-width, non-overlapping and inside
/// the span. Gaps that touch each other or a span end produce no zero-length
/// segment between them. Any violation fails instead of being merged.
pub fn compute_segments(start: f32, end: f32, gaps: &[GapSpec]) -> Result<Vec<Segment>, LayoutError> {
    if !(start.is_finite() && end.is_finite()) || start >= end {
        return Err(LayoutError::InvalidRange {
            what: "wall span",
            min: start,
            max: end,
        });
    }

    let mut segments = Vec::with_capacity(gaps.len() + 1);
    let mut cursor = start;
    let mut previous: Option<f32> = None;

    for gap in gaps {
        if !(gap.width.is_finite() && gap.width > 0.0 && gap.center.is_finite()) {
            return Err(LayoutError::InvalidGapWidth {
                center: gap.center,
                width: gap.width,
            });
        }
        if let Some(prev) = previous {
            if gap.center < prev {
                return Err(LayoutError::UnsortedGaps {
                    previous: prev,
                    center: gap.center,
                });
            }
        }
        previous = Some(gap.center);

        let gap_start = gap.start();
        if gap_start < cursor - EPSILON {
            return Err(LayoutError::OverlappingGaps {
                center: gap.center,
                width: gap.width,
                start: gap_start,
                cursor,
            });
        }
        if gap.end() > end + EPSILON {
            return Err(LayoutError::GapOutOfRange {
                center: gap.center,
                width: gap.width,
                end,
            });
        }

        if gap_start > cursor + EPSILON {
            segments.push(Segment::from_bounds(cursor, gap_start));
        }
        cursor = gap.end();
    }

    if cursor < end - EPSILON {
        segments.push(Segment::from_bounds(cursor, end));
    }

    Ok(segments)
}

/// Wall-height box for one segment of a wall line.
///
/// `across` is the wall's coordinate on the other axis, `base_y` the floor
/// height the wall stands on.
pub fn segment_wall(
    label: &str,
    segment: &Segment,
    axis: Axis,
    across: f32,
    base_y: f32,
    color: Color,
) -> Primitive {
    Primitive::cube(
        label,
        axis.point(segment.center, across, base_y + walls::HEIGHT / 2.0),
        axis.extents(segment.length, walls::HEIGHT, walls::THICKNESS),
        color,
    )
}

/// Header strip filling the wall above a door opening.
pub fn header_strip(label: &str, gap: &GapSpec, axis: Axis, across: f32, base_y: f32, color: Color) -> Primitive {
    let height = walls::HEIGHT - doors::HEIGHT;
    Primitive::cube(
        label,
        axis.point(gap.center, across, base_y + doors::HEIGHT + height / 2.0),
        axis.extents(gap.width, height, walls::THICKNESS),
        color,
    )
}

/// One straight wall line on a floor, before any gaps are cut into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallLine {
    pub axis: Axis,
    /// Coordinate of the wall on the other axis.
    pub across: f32,
    pub start: f32,
    pub end: f32,
    pub base_y: f32,
    pub color: Color,
}

impl WallLine {
    /// Solid segments plus a header strip over every gap.
    pub fn punched(&self, label: &str, gaps: &[GapSpec]) -> Result<Vec<Primitive>, LayoutError> {
        let segments = compute_segments(self.start, self.end, gaps)?;
        let mut out: Vec<Primitive> = segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                segment_wall(
                    &format!("{label} segment {i}"),
                    s,
                    self.axis,
                    self.across,
                    self.base_y,
                    self.color,
                )
            })
            .collect();
        out.extend(gaps.iter().enumerate().map(|(i, g)| {
            header_strip(
                &format!("{label} header {i}"),
                g,
                self.axis,
                self.across,
                self.base_y,
                self.color,
            )
        }));
        Ok(out)
    }
}

/// Two parallel walls cut from one segment list, so their openings face
/// each other exactly. `right_across` is the second wall's coordinate; every
/// other property comes from `left`.
pub fn paired_walls(
    label: &str,
    left: &WallLine,
    right_across: f32,
    gaps: &[GapSpec],
) -> Result<(Vec<Primitive>, Vec<Primitive>), LayoutError> {
    let right = WallLine {
        across: right_across,
        ..*left
    };
    Ok((
        left.punched(&format!("{label} left"), gaps)?,
        right.punched(&format!("{label} right"), gaps)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_segment(seg: &Segment, center: f32, length: f32) {
        assert!(
            (seg.center - center).abs() < 1e-4 && (seg.length - length).abs() < 1e-4,
            "expected ({center}, {length}), got {seg:?}"
        );
    }

    #[test]
    fn test_no_gaps_single_segment() {
        let segs = compute_segments(-15.0, 15.0, &[]).unwrap();
        assert_eq!(segs.len(), 1);
        assert_segment(&segs[0], 0.0, 30.0);
    }

    #[test]
    fn test_single_centered_gap() {
        let segs = compute_segments(-15.0, 15.0, &[GapSpec::new(0.0, 3.0)]).unwrap();
        assert_eq!(segs.len(), 2);
        assert_segment(&segs[0], -8.25, 13.5);
        assert_segment(&segs[1], 8.25, 13.5);
    }

    #[test]
    fn test_six_wide_gap_matches_room_spacing() {
        let segs = compute_segments(-15.0, 15.0, &[GapSpec::new(0.0, 6.0)]).unwrap();
        assert_segment(&segs[0], -9.0, 12.0);
        assert_segment(&segs[1], 9.0, 12.0);
    }

    #[test]
    fn test_gap_at_span_start_emits_no_empty_segment() {
        let segs = compute_segments(0.0, 10.0, &[GapSpec::new(1.0, 2.0)]).unwrap();
        assert_eq!(segs.len(), 1);
        assert_segment(&segs[0], 6.0, 8.0);
    }

    #[test]
    fn test_touching_gaps() {
        let gaps = [GapSpec::new(2.0, 2.0), GapSpec::new(4.0, 2.0)];
        let segs = compute_segments(0.0, 10.0, &gaps).unwrap();
        assert_eq!(segs.len(), 2);
        assert_segment(&segs[0], 0.5, 1.0);
        assert_segment(&segs[1], 7.5, 5.0);
    }

    #[test]
    fn test_overlapping_gaps_fail() {
        let gaps = [GapSpec::new(2.0, 2.0), GapSpec::new(2.5, 2.0)];
        let err = compute_segments(0.0, 10.0, &gaps).unwrap_err();
        assert!(matches!(err, LayoutError::OverlappingGaps { .. }));
    }

    #[test]
    fn test_unsorted_gaps_fail() {
        let gaps = [GapSpec::new(6.0, 1.0), GapSpec::new(2.0, 1.0)];
        let err = compute_segments(0.0, 10.0, &gaps).unwrap_err();
        assert!(matches!(err, LayoutError::UnsortedGaps { .. }));
    }

    #[test]
    fn test_gap_outside_span_fails() {
        let err = compute_segments(0.0, 10.0, &[GapSpec::new(9.5, 2.0)]).unwrap_err();
        assert!(matches!(err, LayoutError::GapOutOfRange { .. }));
        let err = compute_segments(0.0, 10.0, &[GapSpec::new(0.5, 2.0)]).unwrap_err();
        assert!(matches!(err, LayoutError::OverlappingGaps { .. }));
    }

    #[test]
    fn test_zero_width_gap_fails() {
        let err = compute_segments(0.0, 10.0, &[GapSpec::new(5.0, 0.0)]).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidGapWidth { .. }));
    }

    #[test]
    fn test_empty_span_fails() {
        assert!(compute_segments(5.0, 5.0, &[]).is_err());
    }

    #[test]
    fn test_punched_wall_adds_header_per_gap() {
        let gaps = [GapSpec::door(-5.0), GapSpec::door(5.0)];
        let line = WallLine {
            axis: Axis::Z,
            across: -2.0,
            start: -15.0,
            end: 15.0,
            base_y: 0.0,
            color: Color::WHITE,
        };
        let prims = line.punched("w", &gaps).unwrap();
        assert_eq!(prims.len(), 3 + 2);
        let header = prims.iter().find(|p| p.label == "w header 0").unwrap();
        assert!((header.position.z + 5.0).abs() < 1e-5);
        assert!((header.position.x + 2.0).abs() < 1e-5);
        assert!(header.position.y > doors::HEIGHT);
    }

    #[test]
    fn test_paired_walls_mirror_each_other() {
        let line = WallLine {
            axis: Axis::Z,
            across: -2.0,
            start: -15.0,
            end: 15.0,
            base_y: 4.0,
            color: Color::LIGHT_GRAY,
        };
        let (left, right) = paired_walls("c", &line, 2.0, &[GapSpec::door(0.0)]).unwrap();
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(&right) {
            assert_eq!(l.position.z, r.position.z);
            assert_eq!(l.scale, r.scale);
            assert_eq!(l.position.x, -2.0);
            assert_eq!(r.position.x, 2.0);
        }
    }
}
