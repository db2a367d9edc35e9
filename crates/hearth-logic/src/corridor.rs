//! Corridors and stairs.
//!
//! A corridor runs along one axis between `start` and `end`. Both side walls
//! share one gap list so openings on the left and right line up; a gap with
//! no room behind it is closed with a door-height panel under its header.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{doors, lights, stairs, walls};
use crate::error::LayoutError;
use crate::flicker::FlickerProfile;
use crate::plan::{LevelPlan, LightPlacement};
use crate::primitives::{Color, Primitive};
use crate::segments::{paired_walls, Axis, GapSpec, WallLine};

/// Side wall of a corridor. `Left` is the wall at the lower coordinate on
/// the across axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorridorSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorSpec {
    pub label: String,
    pub axis: Axis,
    /// Corridor centerline on the other axis.
    pub across: f32,
    pub start: f32,
    pub end: f32,
    pub width: f32,
    pub base_height: f32,
    pub wall_color: Color,
    pub floor_color: Color,
    /// Door gaps shared by both side walls, sorted by center.
    pub gaps: Vec<GapSpec>,
    /// Gaps (by index) to close off on one side.
    pub closed: Vec<(CorridorSide, usize)>,
    /// End wall at `start`, with gaps along the across axis. `None` leaves
    /// the end open.
    pub cap_start: Option<Vec<GapSpec>>,
    pub cap_end: Option<Vec<GapSpec>>,
    /// Ceiling light positions along the axis.
    pub lights: Vec<f32>,
    pub light_color: Color,
    pub flicker: Option<FlickerProfile>,
}

impl CorridorSpec {
    pub fn new(label: impl Into<String>, axis: Axis, start: f32, end: f32, width: f32) -> Self {
        Self {
            label: label.into(),
            axis,
            across: 0.0,
            start,
            end,
            width,
            base_height: 0.0,
            wall_color: Color::LIGHT_GRAY,
            floor_color: Color::GRAY,
            gaps: Vec::new(),
            closed: Vec::new(),
            cap_start: None,
            cap_end: None,
            lights: Vec::new(),
            light_color: Color::rgb8(200, 200, 150),
            flicker: None,
        }
    }

    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Across-axis coordinate of a side wall.
    pub fn side_across(&self, side: CorridorSide) -> f32 {
        match side {
            CorridorSide::Left => self.across - self.width / 2.0,
            CorridorSide::Right => self.across + self.width / 2.0,
        }
    }

    fn side_line(&self, side: CorridorSide) -> WallLine {
        WallLine {
            axis: self.axis,
            across: self.side_across(side),
            start: self.start,
            end: self.end,
            base_y: self.base_height,
            color: self.wall_color,
        }
    }

    fn cap_line(&self, at: f32) -> WallLine {
        WallLine {
            axis: self.axis.other(),
            across: at,
            start: self.across - self.width / 2.0,
            end: self.across + self.width / 2.0,
            base_y: self.base_height,
            color: self.wall_color,
        }
    }
}

/// Emit floor, ceiling, walls, caps and lights for a corridor.
pub fn build_corridor(spec: &CorridorSpec, plan: &mut LevelPlan) -> Result<(), LayoutError> {
    let length = spec.length();
    if !(spec.width.is_finite() && spec.width > 0.0) || !length.is_finite() || length <= 0.0 {
        return Err(LayoutError::InvalidDimensions {
            what: format!("corridor '{}'", spec.label),
            width: spec.width,
            depth: length,
        });
    }
    if let Some(profile) = &spec.flicker {
        profile.validate()?;
    }

    let base = spec.base_height;
    let mid = (spec.start + spec.end) / 2.0;
    let footprint = spec.axis.extents(spec.length(), 0.0, spec.width);

    plan.add_primitive(Primitive::plane(
        format!("{} floor", spec.label),
        spec.axis.point(mid, spec.across, base),
        footprint.x,
        footprint.z,
        spec.floor_color,
    ));
    plan.add_primitive(Primitive::cube(
        format!("{} ceiling", spec.label),
        spec.axis.point(mid, spec.across, base + walls::HEIGHT),
        spec.axis.extents(spec.length(), walls::CEILING_THICKNESS, spec.width),
        spec.wall_color,
    ));

    let (left, right) = paired_walls(
        &format!("{} wall", spec.label),
        &spec.side_line(CorridorSide::Left),
        spec.side_across(CorridorSide::Right),
        &spec.gaps,
    )?;
    plan.extend_primitives(left);
    plan.extend_primitives(right);

    for &(side, index) in &spec.closed {
        let gap = spec.gaps.get(index).ok_or(LayoutError::UnknownPlacement {
            what: "corridor gap",
            index,
        })?;
        plan.add_primitive(Primitive::cube(
            format!("{} {:?} panel {index}", spec.label, side),
            spec.axis.point(gap.center, spec.side_across(side), base + doors::HEIGHT / 2.0),
            spec.axis.extents(gap.width, doors::HEIGHT, walls::THICKNESS),
            spec.wall_color,
        ));
    }

    for (name, at, cap) in [("start", spec.start, &spec.cap_start), ("end", spec.end, &spec.cap_end)] {
        if let Some(gaps) = cap {
            let line = spec.cap_line(at);
            plan.extend_primitives(line.punched(&format!("{} cap {name}", spec.label), gaps)?);
        }
    }

    for (i, &along) in spec.lights.iter().enumerate() {
        plan.add_light(LightPlacement {
            label: format!("{} light {i}", spec.label),
            position: spec
                .axis
                .point(along, spec.across, base + walls::HEIGHT - lights::CORRIDOR_DROP),
            color: spec.light_color,
            enabled: true,
            flicker: spec.flicker,
        });
    }

    debug!(
        "corridor '{}' {:?} [{:.1}, {:.1}] with {} gaps, {} lights",
        spec.label,
        spec.axis,
        spec.start,
        spec.end,
        spec.gaps.len(),
        spec.lights.len()
    );
    Ok(())
}

// ── Stairs ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairSpec {
    pub label: String,
    pub axis: Axis,
    pub across: f32,
    /// Where the first step begins.
    pub start: f32,
    /// +1 climbs towards increasing coordinates, -1 the other way.
    pub direction: f32,
    pub width: f32,
    pub base_height: f32,
    pub color: Color,
}

impl StairSpec {
    /// Height of the landing above `base_height`.
    pub fn rise(&self) -> f32 {
        stairs::STEPS as f32 * stairs::RISE
    }

    /// Distance covered by the steps along the axis.
    pub fn run(&self) -> f32 {
        stairs::STEPS as f32 * stairs::RUN
    }
}

/// Solid steps up to a landing. Each step's top sits one rise above the
/// previous one; the landing is flush with the last step.
pub fn build_stairs(spec: &StairSpec, plan: &mut LevelPlan) -> Result<(), LayoutError> {
    if !(spec.width.is_finite() && spec.width > 0.0) || spec.direction.abs() != 1.0 {
        return Err(LayoutError::InvalidDimensions {
            what: format!("stairs '{}'", spec.label),
            width: spec.width,
            depth: spec.direction,
        });
    }
    let dir = spec.direction;
    for i in 0..stairs::STEPS {
        let along = spec.start + dir * (i as f32 + 0.5) * stairs::RUN;
        let top = spec.base_height + (i + 1) as f32 * stairs::RISE;
        plan.add_primitive(Primitive::cube(
            format!("{} step {i}", spec.label),
            spec.axis.point(along, spec.across, top - stairs::RISE / 2.0),
            spec.axis.extents(stairs::RUN, stairs::RISE, spec.width),
            spec.color,
        ));
    }
    let landing_center = spec.start + dir * (spec.run() + stairs::LANDING_DEPTH / 2.0);
    let extents = spec.axis.extents(stairs::LANDING_DEPTH, 0.0, spec.width);
    plan.add_primitive(Primitive::plane(
        format!("{} landing", spec.label),
        spec.axis
            .point(landing_center, spec.across, spec.base_height + spec.rise()),
        extents.x,
        extents.z,
        Color::GRAY,
    ));
    Ok(())
}

/// Helper for callers laying out a run of stairs at a corridor end.
pub fn stairs_at_end(corridor: &CorridorSpec, color: Color) -> StairSpec {
    StairSpec {
        label: format!("{} stairs", corridor.label),
        axis: corridor.axis,
        across: corridor.across,
        start: corridor.end,
        direction: 1.0,
        width: corridor.width,
        base_height: corridor.base_height,
        color,
    }
}
