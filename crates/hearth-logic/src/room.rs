//! Room construction: four walls with one punched door opening, floor,
//! ceiling, light and switch, an optional carved sub-room and decorators.
//!
//! Rooms are rectangles centered at `(x, z)` with `width` along X and
//! `depth` along Z. `door_direction` is the heading of a player walking in
//! through the door, so a room entered heading `West` has its opening in
//! the east wall at `x + width / 2`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{doors, lights, sub_rooms, switches, walls};
use crate::error::LayoutError;
use crate::flicker::FlickerProfile;
use crate::plan::{
    DoorPlacement, LevelPlan, LightId, LightPlacement, PhotoPlacement, RoomId, ScriptedEvent, SwitchPlacement,
};
use crate::primitives::{AssetRef, Color, Primitive, Vec3};
use crate::segments::{compute_segments, segment_wall, Axis, GapSpec, WallLine};

// ── Directions ──────────────────────────────────────────────────────────

/// Compass direction. North is +Z, East is +X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Next direction clockwise seen from above.
    pub fn clockwise(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Unit vector pointing this way.
    pub fn normal(self) -> Vec3 {
        match self {
            Direction::North => Vec3::new(0.0, 0.0, 1.0),
            Direction::South => Vec3::new(0.0, 0.0, -1.0),
            Direction::East => Vec3::new(1.0, 0.0, 0.0),
            Direction::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// +1 or -1 along `self.across_axis()`.
    pub fn sign(self) -> f32 {
        match self {
            Direction::North | Direction::East => 1.0,
            Direction::South | Direction::West => -1.0,
        }
    }

    /// Axis a wall on this side of a room runs along.
    pub fn wall_axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::X,
            Direction::East | Direction::West => Axis::Z,
        }
    }

    /// Axis this direction points along.
    pub fn across_axis(self) -> Axis {
        self.wall_axis().other()
    }

    /// Yaw that turns a fixture's local -Z to face this way.
    pub fn yaw(self) -> f32 {
        match self {
            Direction::South => 0.0,
            Direction::West => 90.0,
            Direction::North => 180.0,
            Direction::East => 270.0,
        }
    }
}

// ── Specs ───────────────────────────────────────────────────────────────

/// Horizontal point: X and Z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub z: f32,
}

impl Point2 {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn at_height(self, y: f32) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }
}

/// Who builds the wall holding the door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Seam {
    /// The room builds its own door wall, segments and header included.
    Own,
    /// A corridor wall already covers `[start, end]` along the door wall's
    /// axis, door gap included. The room only builds what sticks out.
    Corridor { start: f32, end: f32 },
}

/// Hidden prop revealed the first time the room's switch is turned on.
/// `offset` is relative to the room's floor center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstActivate {
    pub label: String,
    pub offset: Vec3,
    pub scale: Vec3,
    pub color: Color,
}

impl FirstActivate {
    /// A tall dark figure standing near the wall opposite the door.
    pub fn figure() -> Self {
        Self {
            label: "figure".into(),
            offset: Vec3::new(0.0, 1.0, 0.0),
            scale: Vec3::new(0.6, 2.0, 0.4),
            color: Color::rgb(0.05, 0.05, 0.05),
        }
    }
}

/// What a decorator sees of a finished room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomFootprint {
    pub label: String,
    /// Floor center.
    pub center: Vec3,
    pub width: f32,
    pub depth: f32,
    pub door_side: Direction,
}

impl RoomFootprint {
    /// Inner face of the wall on `side`, at floor height.
    pub fn wall_face(&self, side: Direction) -> Vec3 {
        let reach = match side.across_axis() {
            Axis::X => self.width / 2.0,
            Axis::Z => self.depth / 2.0,
        } - walls::THICKNESS / 2.0;
        self.center + side.normal() * reach
    }
}

/// Extra furnishing applied after a room's core geometry.
#[derive(Clone)]
pub enum Decorator {
    /// Table with an interactive photo in the middle of the room.
    PhotoTable { texture: AssetRef },
    /// Framed pictures hung on the wall opposite the door.
    WallFrames { textures: Vec<AssetRef> },
    Custom(fn(&mut LevelPlan, &RoomFootprint)),
}

impl std::fmt::Debug for Decorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decorator::PhotoTable { texture } => f.debug_struct("PhotoTable").field("texture", texture).finish(),
            Decorator::WallFrames { textures } => f.debug_struct("WallFrames").field("textures", textures).finish(),
            Decorator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Decorator {
    pub fn apply(&self, plan: &mut LevelPlan, room: &RoomFootprint) {
        match self {
            Decorator::PhotoTable { texture } => photo_table(plan, room, texture),
            Decorator::WallFrames { textures } => wall_frames(plan, room, textures),
            Decorator::Custom(f) => f(plan, room),
        }
    }
}

/// A bathroom-style carve-out in one corner of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRoomSpec {
    pub label: String,
    /// Explicit (width, depth); `None` takes a fraction of the parent.
    pub size: Option<(f32, f32)>,
    pub wall_color: Color,
    pub light_color: Color,
    pub start_on: bool,
}

impl SubRoomSpec {
    pub fn bathroom() -> Self {
        Self {
            label: "Bathroom".into(),
            size: None,
            wall_color: Color::WHITE,
            light_color: Color::rgb(0.9, 0.95, 1.0),
            start_on: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoomSpec {
    pub label: String,
    pub center: Point2,
    /// (width along X, depth along Z).
    pub size: (f32, f32),
    pub door_direction: Direction,
    /// Offset of the door center from the middle of its wall.
    pub door_offset: f32,
    pub base_height: f32,
    pub wall_color: Color,
    pub light_color: Color,
    pub flicker: bool,
    /// Profile used when `flicker` is set.
    pub flicker_profile: FlickerProfile,
    pub start_on: bool,
    pub seam: Seam,
    pub sub_room: Option<SubRoomSpec>,
    pub first_activate: Option<FirstActivate>,
    pub decorators: Vec<Decorator>,
}

impl RoomSpec {
    pub fn new(label: impl Into<String>, center: Point2, size: (f32, f32), door_direction: Direction) -> Self {
        Self {
            label: label.into(),
            center,
            size,
            door_direction,
            door_offset: 0.0,
            base_height: 0.0,
            wall_color: Color::WHITE,
            light_color: Color::WHITE,
            flicker: false,
            flicker_profile: FlickerProfile::unstable(),
            start_on: true,
            seam: Seam::Own,
            sub_room: None,
            first_activate: None,
            decorators: Vec::new(),
        }
    }

    /// Side of the room holding the door.
    pub fn door_side(&self) -> Direction {
        self.door_direction.opposite()
    }

    fn wall_line(&self, side: Direction) -> WallLine {
        let (w, d) = self.size;
        let axis = side.wall_axis();
        let (along_center, half_len, across) = match axis {
            Axis::X => (self.center.x, w / 2.0, self.center.z + side.sign() * d / 2.0),
            Axis::Z => (self.center.z, d / 2.0, self.center.x + side.sign() * w / 2.0),
        };
        WallLine {
            axis,
            across,
            start: along_center - half_len,
            end: along_center + half_len,
            base_y: self.base_height,
            color: self.wall_color,
        }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let (w, d) = self.size;
        let finite = w.is_finite() && d.is_finite() && self.center.x.is_finite() && self.center.z.is_finite();
        if !finite || w <= 0.0 || d <= 0.0 {
            return Err(LayoutError::InvalidDimensions {
                what: format!("room '{}'", self.label),
                width: w,
                depth: d,
            });
        }
        if self.flicker {
            self.flicker_profile.validate()?;
        }
        Ok(())
    }
}

// ── Records ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallRecord {
    pub side: Direction,
    pub axis: Axis,
    pub across: f32,
    pub start: f32,
    pub end: f32,
    pub opening: Option<GapSpec>,
}

/// What a room build produced, kept for validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub footprint: RoomFootprint,
    pub walls: Vec<WallRecord>,
    pub parent: Option<RoomId>,
    pub switch: Option<usize>,
}

impl RoomRecord {
    pub fn openings(&self) -> impl Iterator<Item = &WallRecord> {
        self.walls.iter().filter(|w| w.opening.is_some())
    }

    /// Floor-plan bounds as (min_x, min_z, max_x, max_z).
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let f = &self.footprint;
        (
            f.center.x - f.width / 2.0,
            f.center.z - f.depth / 2.0,
            f.center.x + f.width / 2.0,
            f.center.z + f.depth / 2.0,
        )
    }
}

// ── Builder ─────────────────────────────────────────────────────────────

/// Build a room and everything attached to it into `plan`.
pub fn build_room(spec: &RoomSpec, plan: &mut LevelPlan) -> Result<RoomId, LayoutError> {
    build_room_inner(spec, None, plan)
}

fn build_room_inner(spec: &RoomSpec, parent: Option<RoomId>, plan: &mut LevelPlan) -> Result<RoomId, LayoutError> {
    spec.validate()?;
    let (w, d) = spec.size;
    let base = spec.base_height;
    let door_side = spec.door_side();
    let is_sub_room = parent.is_some();

    // Floor and ceiling. A sub-room shares its parent's.
    if !is_sub_room {
        plan.add_primitive(Primitive::plane(
            format!("{} floor", spec.label),
            spec.center.at_height(base),
            w,
            d,
            Color::GRAY,
        ));
        plan.add_primitive(Primitive::cube(
            format!("{} ceiling", spec.label),
            spec.center.at_height(base + walls::HEIGHT),
            Vec3::new(w, walls::CEILING_THICKNESS, d),
            spec.wall_color,
        ));
    }

    // Walls
    let mut records = Vec::with_capacity(4);
    let mut opening = None;
    for side in Direction::ALL {
        let line = spec.wall_line(side);
        let label = format!("{} wall {:?}", spec.label, side);
        if side != door_side {
            plan.extend_primitives(line.punched(&label, &[])?);
            records.push(WallRecord {
                side,
                axis: line.axis,
                across: line.across,
                start: line.start,
                end: line.end,
                opening: None,
            });
            continue;
        }

        let gap = GapSpec::door((line.start + line.end) / 2.0 + spec.door_offset);
        // Fails if the door doesn't fit in its wall.
        compute_segments(line.start, line.end, &[gap])?;
        match spec.seam {
            Seam::Own => plan.extend_primitives(line.punched(&label, &[gap])?),
            Seam::Corridor { start, end } => {
                let covered = GapSpec::new(
                    (start.max(line.start) + end.min(line.end)) / 2.0,
                    end.min(line.end) - start.max(line.start),
                );
                if covered.start() > gap.start() || covered.end() < gap.end() {
                    return Err(LayoutError::GapOutOfRange {
                        center: gap.center,
                        width: gap.width,
                        end: covered.end(),
                    });
                }
                for (i, segment) in compute_segments(line.start, line.end, &[covered])?.iter().enumerate() {
                    plan.add_primitive(segment_wall(
                        &format!("{label} return {i}"),
                        segment,
                        line.axis,
                        line.across,
                        base,
                        line.color,
                    ));
                }
            }
        }
        records.push(WallRecord {
            side,
            axis: line.axis,
            across: line.across,
            start: line.start,
            end: line.end,
            opening: Some(gap),
        });
        opening = Some((line, gap));
    }

    let (door_line, gap) = opening.ok_or_else(|| LayoutError::InvalidDimensions {
        what: format!("room '{}' door wall", spec.label),
        width: w,
        depth: d,
    })?;

    let room_id = RoomId(plan.rooms.len());
    let footprint = RoomFootprint {
        label: spec.label.clone(),
        center: spec.center.at_height(base),
        width: w,
        depth: d,
        door_side,
    };

    // Door
    plan.add_door(place_door(&spec.label, &door_line, &gap, door_side, room_id));

    // Light
    let light = plan.add_light(LightPlacement {
        label: format!("{} light", spec.label),
        position: spec.center.at_height(base + walls::HEIGHT - lights::CEILING_DROP),
        color: spec.light_color,
        enabled: spec.start_on,
        flicker: spec.flicker.then_some(spec.flicker_profile),
    });

    // Scripted prop
    let on_first_activate = spec.first_activate.as_ref().map(|scare| {
        // Push it towards the far wall, away from the entrance.
        let far = door_side.opposite();
        let reach = match far.across_axis() {
            Axis::X => w / 2.0,
            Axis::Z => d / 2.0,
        } - 1.0;
        let offset = scare.offset + far.normal() * reach.max(0.0);
        let prop = plan.add_prop(
            Primitive::cube(
                format!("{} {}", spec.label, scare.label),
                footprint.center + offset,
                scare.scale,
                scare.color,
            ),
            true,
        );
        ScriptedEvent::Reveal(prop)
    });

    // Switch, outside the door wall on the side away from the hinge.
    let switch = plan.add_switch(place_switch(spec, &door_line, &gap, door_side, light, on_first_activate)?)?;

    plan.add_room(RoomRecord {
        footprint: footprint.clone(),
        walls: records,
        parent,
        switch: Some(switch),
    });
    debug!(
        "room '{}' at ({:.1}, {:.1}) {}×{} door {:?}",
        spec.label, spec.center.x, spec.center.z, w, d, door_side
    );

    if let Some(sub) = &spec.sub_room {
        match carve_sub_room(spec, sub) {
            Some(sub_spec) => {
                build_room_inner(&sub_spec, Some(room_id), plan)?;
            }
            None => debug!("room '{}': sub-room '{}' too small, skipped", spec.label, sub.label),
        }
    }

    for decorator in &spec.decorators {
        decorator.apply(plan, &footprint);
    }

    Ok(room_id)
}

fn place_door(label: &str, line: &WallLine, gap: &GapSpec, door_side: Direction, room: RoomId) -> DoorPlacement {
    let axis = line.axis;
    let position = axis.point(gap.center, line.across, line.base_y + doors::HEIGHT / 2.0);
    let hinge = axis.point(gap.start(), line.across, line.base_y + doors::HEIGHT / 2.0);
    let closed_yaw = match axis {
        Axis::X => 0.0,
        Axis::Z => 90.0,
    };
    // Open into the room: the leaf's offset from the hinge must end up
    // pointing inwards after the swing.
    let inward = -door_side.normal();
    let offset = position - hinge;
    let open_yaw = if offset.rotate_y(doors::SWING_DEGREES).dot(&inward) > 0.0 {
        doors::SWING_DEGREES
    } else {
        -doors::SWING_DEGREES
    };
    DoorPlacement {
        label: format!("{label} door"),
        position,
        hinge,
        closed_yaw,
        open_yaw,
        leaf: Primitive::cube(
            format!("{label} door leaf"),
            position,
            Vec3::new(gap.width, doors::HEIGHT, doors::THICKNESS),
            Color::SADDLE_BROWN,
        )
        .with_yaw(closed_yaw),
        room: Some(room),
    }
}

fn place_switch(
    spec: &RoomSpec,
    line: &WallLine,
    gap: &GapSpec,
    door_side: Direction,
    light: LightId,
    on_first_activate: Option<ScriptedEvent>,
) -> Result<SwitchPlacement, LayoutError> {
    let along = switch_along(line, gap).ok_or_else(|| LayoutError::InvalidDimensions {
        what: format!("room '{}' door wall, no space for a switch", spec.label),
        width: line.end - line.start,
        depth: gap.width,
    })?;
    let standoff = walls::THICKNESS / 2.0 + switches::STANDOFF + switches::PLATE.2 / 2.0;
    let across = line.across + door_side.sign() * standoff;
    Ok(SwitchPlacement {
        label: format!("{} switch", spec.label),
        position: line.axis.point(along, across, spec.base_height + switches::MOUNT_HEIGHT),
        yaw: door_side.yaw(),
        start_on: spec.start_on,
        light: Some(light),
        on_first_activate,
        prompt_on: format!("[E] Turn off the {} light", spec.label.to_lowercase()),
        prompt_off: format!("[E] Turn on the {} light", spec.label.to_lowercase()),
    })
}

/// Position of the switch along its wall. Prefers full clearance past the
/// opening's far edge, then before its hinge edge. On a short wall the plate
/// is centered in the wider strip between opening and corner, so it never
/// leaves the wall's run.
fn switch_along(line: &WallLine, gap: &GapSpec) -> Option<f32> {
    let after = gap.end() + switches::LATERAL_CLEARANCE;
    if after <= line.end - switches::LATERAL_CLEARANCE / 2.0 {
        return Some(after);
    }
    let before = gap.start() - switches::LATERAL_CLEARANCE;
    if before >= line.start + switches::LATERAL_CLEARANCE / 2.0 {
        return Some(before);
    }
    let after_space = line.end - gap.end();
    let before_space = gap.start() - line.start;
    if after_space >= before_space && after_space >= switches::PLATE.0 {
        Some((gap.end() + line.end) / 2.0)
    } else if before_space >= switches::PLATE.0 {
        Some((line.start + gap.start()) / 2.0)
    } else {
        None
    }
}

/// Derive the sub-room spec, or `None` when it would be degenerate.
///
/// The sub-room sits in the corner farthest from the parent's door, on the
/// clockwise side. Its door faces sideways into the parent room rather than
/// back at the parent's door.
pub fn carve_sub_room(parent: &RoomSpec, sub: &SubRoomSpec) -> Option<RoomSpec> {
    let (w, d) = parent.size;
    let (sw, sd) = sub
        .size
        .unwrap_or((w * sub_rooms::DEFAULT_FRACTION, d * sub_rooms::DEFAULT_FRACTION));
    let inset = sub_rooms::INSET + walls::THICKNESS;

    if !(sw.is_finite() && sd.is_finite())
        || sw < sub_rooms::MIN_SIZE
        || sd < sub_rooms::MIN_SIZE
        || sw >= w - 2.0 * inset
        || sd >= d - 2.0 * inset
    {
        return None;
    }

    let far = parent.door_side().opposite();
    let lateral = far.clockwise();
    let mut center = parent.center;
    for side in [far, lateral] {
        match side.across_axis() {
            Axis::X => center.x += side.sign() * (w / 2.0 - inset - sw / 2.0),
            Axis::Z => center.z += side.sign() * (d / 2.0 - inset - sd / 2.0),
        }
    }

    let mut spec = RoomSpec::new(
        format!("{} {}", parent.label, sub.label),
        center,
        (sw, sd),
        // Walking in heads towards the lateral wall; the door is on the
        // sub-room's side facing back into the parent.
        lateral,
    );
    spec.base_height = parent.base_height;
    spec.wall_color = sub.wall_color;
    spec.light_color = sub.light_color;
    spec.start_on = sub.start_on;
    Some(spec)
}

// ── Built-in decorators ─────────────────────────────────────────────────

/// Parts of a small table with a standing photo, relative to the table
/// center on the floor.
pub fn photo_table_parts(texture: &AssetRef) -> Vec<Primitive> {
    let wood = Color::rgb(0.36, 0.25, 0.2);
    let top_y = 0.8;
    let mut parts = vec![Primitive::cube("table top", Vec3::new(0.0, top_y, 0.0), Vec3::new(1.2, 0.08, 0.8), wood)];
    for (i, (x, z)) in [(-0.5, -0.3), (0.5, -0.3), (-0.5, 0.3), (0.5, 0.3)].into_iter().enumerate() {
        parts.push(Primitive::cube(
            format!("table leg {i}"),
            Vec3::new(x, top_y / 2.0, z),
            Vec3::new(0.08, top_y, 0.08),
            wood,
        ));
    }
    parts.push(Primitive::cube(
        "photo frame",
        Vec3::new(0.0, top_y + 0.2, 0.0),
        Vec3::new(0.4, 0.32, 0.04),
        Color::rgb(0.15, 0.1, 0.05),
    ));
    parts.push(
        Primitive::quad("photo", Vec3::new(0.0, top_y + 0.2, -0.025), 0.34, 0.26, texture.clone())
            .with_collider(true)
            .unlit(),
    );
    parts
}

fn photo_table(plan: &mut LevelPlan, room: &RoomFootprint, texture: &AssetRef) {
    plan.add_photo(PhotoPlacement {
        label: format!("{} photo table", room.label),
        position: room.center,
        // Photo faces the entrance.
        yaw: room.door_side.yaw(),
        texture: texture.clone(),
        parts: photo_table_parts(texture),
    });
}

fn wall_frames(plan: &mut LevelPlan, room: &RoomFootprint, textures: &[AssetRef]) {
    if textures.is_empty() {
        return;
    }
    let far = room.door_side.opposite();
    let face = room.wall_face(far) - far.normal() * 0.02;
    let along_axis = far.wall_axis();
    let span = match along_axis {
        Axis::X => room.width,
        Axis::Z => room.depth,
    };
    let spacing = span / (textures.len() as f32 + 1.0);
    let start = along_axis.component(room.center) - span / 2.0;
    for (i, texture) in textures.iter().enumerate() {
        let along = start + spacing * (i as f32 + 1.0);
        let position = along_axis.point(along, far.across_axis().component(face), room.center.y + 2.0);
        plan.add_primitive(
            Primitive::quad(format!("{} frame {i}", room.label), position, 0.8, 1.0, texture.clone())
                // Face back into the room.
                .with_yaw(far.opposite().yaw()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn west_room() -> RoomSpec {
        RoomSpec::new("Living Room", Point2::new(-9.0, 0.0), (8.0, 8.0), Direction::West)
    }

    #[test]
    fn test_direction_basics() {
        assert_eq!(Direction::West.opposite(), Direction::East);
        assert_eq!(Direction::North.clockwise(), Direction::East);
        assert_eq!(Direction::East.wall_axis(), Axis::Z);
        assert_eq!(Direction::North.normal(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_west_room_door_on_east_wall() {
        let mut plan = LevelPlan::new();
        let id = build_room(&west_room(), &mut plan).unwrap();
        assert_eq!(plan.doors.len(), 1);
        let door = &plan.doors[0];
        assert!((door.position.x + 5.0).abs() < 1e-5);
        assert!(door.position.z.abs() < 1e-5);
        assert_eq!(door.room, Some(id));
        assert_eq!(door.closed_yaw, 90.0);
    }

    #[test]
    fn test_exactly_one_opening() {
        for dir in Direction::ALL {
            let mut plan = LevelPlan::new();
            let spec = RoomSpec::new("r", Point2::new(3.0, -2.0), (6.0, 9.0), dir);
            build_room(&spec, &mut plan).unwrap();
            let room = &plan.rooms[0];
            assert_eq!(room.openings().count(), 1, "direction {dir:?}");
            assert_eq!(room.openings().next().unwrap().side, dir.opposite());
        }
    }

    #[test]
    fn test_door_opens_into_room() {
        for dir in Direction::ALL {
            let mut plan = LevelPlan::new();
            let spec = RoomSpec::new("r", Point2::new(0.0, 0.0), (8.0, 8.0), dir);
            build_room(&spec, &mut plan).unwrap();
            let door = &plan.doors[0];
            let swung = (door.position - door.hinge).rotate_y(door.open_yaw);
            let leaf_center = door.hinge + swung;
            // Open leaf is inside the footprint.
            assert!(leaf_center.x.abs() < 4.0 && leaf_center.z.abs() < 4.0, "direction {dir:?}");
        }
    }

    #[test]
    fn test_light_and_switch_wired() {
        let mut plan = LevelPlan::new();
        build_room(&west_room(), &mut plan).unwrap();
        assert_eq!(plan.lights.len(), 1);
        assert_eq!(plan.switches.len(), 1);
        let switch = &plan.switches[0];
        assert_eq!(switch.light, Some(crate::plan::LightId(0)));
        assert!(switch.start_on);
        assert!(plan.lights[0].enabled);
        // Outside the east wall, clear of the opening.
        assert!(switch.position.x > -5.0);
        assert!(switch.position.z.abs() > doors::WIDTH / 2.0);
    }

    #[test]
    fn test_own_seam_emits_segments_and_header() {
        let mut plan = LevelPlan::new();
        build_room(&west_room(), &mut plan).unwrap();
        let door_wall: Vec<_> = plan
            .primitives
            .iter()
            .filter(|p| p.label.starts_with("Living Room wall East"))
            .collect();
        assert_eq!(door_wall.len(), 3);
        assert!(door_wall.iter().any(|p| p.label.contains("header")));
    }

    #[test]
    fn test_corridor_seam_skips_covered_wall() {
        let mut spec = west_room();
        spec.seam = Seam::Corridor { start: -15.0, end: 15.0 };
        let mut plan = LevelPlan::new();
        build_room(&spec, &mut plan).unwrap();
        assert!(!plan.primitives.iter().any(|p| p.label.starts_with("Living Room wall East")));
        assert_eq!(plan.rooms[0].openings().count(), 1);
    }

    #[test]
    fn test_corridor_seam_builds_returns_for_wider_room() {
        let mut spec = RoomSpec::new("Bedroom", Point2::new(0.0, -20.0), (10.0, 10.0), Direction::South);
        spec.seam = Seam::Corridor { start: -2.0, end: 2.0 };
        let mut plan = LevelPlan::new();
        build_room(&spec, &mut plan).unwrap();
        let returns: Vec<_> = plan.primitives.iter().filter(|p| p.label.contains("return")).collect();
        assert_eq!(returns.len(), 2);
        for r in returns {
            assert!((r.scale.x - 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_corridor_seam_must_cover_door() {
        let mut spec = west_room();
        spec.seam = Seam::Corridor { start: 2.0, end: 15.0 };
        let mut plan = LevelPlan::new();
        assert!(build_room(&spec, &mut plan).is_err());
    }

    #[test]
    fn test_invalid_dimensions_fail() {
        let spec = RoomSpec::new("bad", Point2::new(0.0, 0.0), (0.0, 5.0), Direction::North);
        let err = build_room(&spec, &mut LevelPlan::new()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_room_narrower_than_door_fails() {
        let spec = RoomSpec::new("closet", Point2::new(0.0, 0.0), (1.5, 5.0), Direction::North);
        assert!(build_room(&spec, &mut LevelPlan::new()).is_err());
    }

    #[test]
    fn test_sub_room_carved_in_far_corner() {
        let mut spec = RoomSpec::new("Bedroom", Point2::new(0.0, -20.0), (10.0, 10.0), Direction::South);
        spec.sub_room = Some(SubRoomSpec::bathroom());
        let mut plan = LevelPlan::new();
        let parent = build_room(&spec, &mut plan).unwrap();

        assert_eq!(plan.rooms.len(), 2);
        let sub = &plan.rooms[1];
        assert_eq!(sub.parent, Some(parent));
        // Door of parent is on the north side; the sub-room sits south.
        assert!(sub.footprint.center.z < -20.0);
        // Sub-room door doesn't face the parent door.
        assert_ne!(sub.footprint.door_side, Direction::North);
        assert_eq!(plan.doors.len(), 2);
        assert_eq!(plan.switches.len(), 2);
        // Sub-room has no floor or ceiling of its own.
        assert!(!plan.primitives.iter().any(|p| p.label == "Bedroom Bathroom floor"));

        let (pminx, pminz, pmaxx, pmaxz) = plan.rooms[0].bounds();
        let (sminx, sminz, smaxx, smaxz) = sub.bounds();
        assert!(sminx > pminx && smaxx < pmaxx && sminz > pminz && smaxz < pmaxz);
    }

    #[test]
    fn test_smallest_sub_room_keeps_switch_on_its_wall() {
        let mut spec = RoomSpec::new("Den", Point2::new(0.0, 0.0), (8.0, 8.0), Direction::South);
        spec.sub_room = Some(SubRoomSpec {
            size: Some((sub_rooms::MIN_SIZE, sub_rooms::MIN_SIZE)),
            ..SubRoomSpec::bathroom()
        });
        let mut plan = LevelPlan::new();
        build_room(&spec, &mut plan).unwrap();
        assert_eq!(plan.rooms.len(), 2);

        let wall = plan.rooms[1].openings().next().unwrap();
        let gap = wall.opening.unwrap();
        let along = wall.axis.component(plan.switches[1].position);
        let half = switches::PLATE.0 / 2.0;
        assert!(along - half >= wall.start && along + half <= wall.end, "{along} off [{}, {}]", wall.start, wall.end);
        assert!(along - half >= gap.end() || along + half <= gap.start(), "{along} in the opening");
        let errs = crate::geometry::validate_all(&plan);
        assert!(errs.is_empty(), "{errs:?}");
    }

    #[test]
    fn test_switch_along_prefers_full_clearance() {
        let line = |start: f32, end: f32| WallLine {
            axis: Axis::X,
            across: 0.0,
            start,
            end,
            base_y: 0.0,
            color: Color::WHITE,
        };
        let door = GapSpec::door(0.0);
        assert_eq!(switch_along(&line(-4.0, 4.0), &door), Some(1.0 + switches::LATERAL_CLEARANCE));
        // Only the hinge side has full clearance.
        let off_center = GapSpec::door(2.5);
        assert_eq!(switch_along(&line(-4.0, 4.0), &off_center), Some(1.5 - switches::LATERAL_CLEARANCE));
        // Squeezed between the opening and the corner.
        assert_eq!(switch_along(&line(-1.25, 1.25), &door), Some(1.125));
        // No strip wide enough for the plate.
        assert_eq!(switch_along(&line(-1.05, 1.05), &door), None);
    }

    #[test]
    fn test_door_filling_wall_has_no_switch_space() {
        let spec = RoomSpec::new("closet", Point2::new(0.0, 0.0), (2.1, 5.0), Direction::North);
        assert!(build_room(&spec, &mut LevelPlan::new()).is_err());
    }

    #[test]
    fn test_degenerate_sub_room_skipped() {
        let mut spec = RoomSpec::new("Box", Point2::new(0.0, 0.0), (5.0, 5.0), Direction::North);
        spec.sub_room = Some(SubRoomSpec::bathroom());
        let mut plan = LevelPlan::new();
        build_room(&spec, &mut plan).unwrap();
        assert_eq!(plan.rooms.len(), 1);
        assert_eq!(plan.doors.len(), 1);

        let oversized = SubRoomSpec {
            size: Some((4.9, 3.0)),
            ..SubRoomSpec::bathroom()
        };
        let spec = RoomSpec::new("Box", Point2::new(0.0, 0.0), (5.0, 8.0), Direction::North);
        assert!(carve_sub_room(&spec, &oversized).is_none());
    }

    #[test]
    fn test_first_activate_creates_hidden_prop() {
        let mut spec = west_room();
        spec.start_on = false;
        spec.first_activate = Some(FirstActivate::figure());
        let mut plan = LevelPlan::new();
        build_room(&spec, &mut plan).unwrap();
        assert_eq!(plan.props.len(), 1);
        assert!(plan.props[0].hidden);
        assert_eq!(
            plan.switches[0].on_first_activate,
            Some(ScriptedEvent::Reveal(crate::plan::PropId(0)))
        );
        // Far from the east-wall door.
        assert!(plan.props[0].primitive.position.x < -9.0);
    }

    #[test]
    fn test_decorators_run_in_order() {
        fn mark_a(plan: &mut LevelPlan, room: &RoomFootprint) {
            plan.add_primitive(Primitive::cube("a", room.center, Vec3::ONE, Color::RED));
        }
        fn mark_b(plan: &mut LevelPlan, room: &RoomFootprint) {
            plan.add_primitive(Primitive::cube("b", room.center, Vec3::ONE, Color::BLUE));
        }
        let mut spec = west_room();
        spec.decorators = vec![
            Decorator::Custom(mark_a),
            Decorator::PhotoTable {
                texture: AssetRef::new("photos/a.png"),
            },
            Decorator::Custom(mark_b),
        ];
        let mut plan = LevelPlan::new();
        build_room(&spec, &mut plan).unwrap();
        let labels: Vec<_> = plan.primitives.iter().map(|p| p.label.as_str()).collect();
        let a = labels.iter().position(|l| *l == "a").unwrap();
        let b = labels.iter().position(|l| *l == "b").unwrap();
        assert!(a < b);
        assert_eq!(plan.photos.len(), 1);
    }

    #[test]
    fn test_wall_frames_hang_on_far_wall() {
        let mut spec = west_room();
        spec.decorators = vec![Decorator::WallFrames {
            textures: vec![AssetRef::new("a.png"), AssetRef::new("b.png")],
        }];
        let mut plan = LevelPlan::new();
        build_room(&spec, &mut plan).unwrap();
        let frames: Vec<_> = plan.primitives.iter().filter(|p| p.label.contains("frame")).collect();
        assert_eq!(frames.len(), 2);
        for f in frames {
            // Far wall of a room whose door is east is the west wall at x = -13.
            assert!(f.position.x < -12.8 && f.position.x > -13.0);
        }
    }
}
