//! Layout and interaction tunables.
//!
//! Plain `f32` constants with no engine dependency. Units are world units
//! (roughly meters); angles are degrees; durations are seconds.

pub mod walls {
    /// Thickness of every wall box.
    pub const THICKNESS: f32 = 0.2;
    /// Floor-to-ceiling height of rooms and corridors.
    pub const HEIGHT: f32 = 4.0;
    /// Thickness of ceiling slabs.
    pub const CEILING_THICKNESS: f32 = 0.2;
}

pub mod doors {
    /// Width of a door leaf and of the opening punched for it.
    pub const WIDTH: f32 = 2.0;
    /// Height of a door leaf; the header strip fills the rest of the wall.
    pub const HEIGHT: f32 = 3.5;
    /// Thickness of a door leaf.
    pub const THICKNESS: f32 = 0.2;
    /// Duration of one open/close swing.
    pub const SWING_SECONDS: f32 = 0.5;
    /// Rotation applied by one swing.
    pub const SWING_DEGREES: f32 = 90.0;
}

pub mod switches {
    /// Height of the switch plate center above the floor.
    pub const MOUNT_HEIGHT: f32 = 1.5;
    /// Distance from the edge of the door opening to the switch center.
    pub const LATERAL_CLEARANCE: f32 = 0.6;
    /// Gap between the wall face and the switch plate.
    pub const STANDOFF: f32 = 0.05;
    /// Switch plate size (width, height, depth).
    pub const PLATE: (f32, f32, f32) = (0.2, 0.3, 0.05);
}

pub mod lights {
    /// Distance below the ceiling at which room lights hang.
    pub const CEILING_DROP: f32 = 1.0;
    /// Distance below the ceiling at which corridor lights hang.
    pub const CORRIDOR_DROP: f32 = 0.5;
    /// Exponential approach rate of flicker intensity towards its target.
    pub const SMOOTHING_RATE: f32 = 8.0;
}

pub mod sub_rooms {
    /// Minimum width or depth of a carved sub-room. Smaller carves are skipped.
    pub const MIN_SIZE: f32 = 2.5;
    /// Gap between the parent's walls and the sub-room's walls.
    pub const INSET: f32 = 0.2;
    /// Default footprint as a fraction of the parent footprint.
    pub const DEFAULT_FRACTION: f32 = 0.4;
}

pub mod stairs {
    pub const STEPS: u32 = 10;
    pub const RISE: f32 = 0.4;
    pub const RUN: f32 = 0.5;
    /// Depth of the landing at the top of the flight.
    pub const LANDING_DEPTH: f32 = 4.0;
}

pub mod interaction {
    /// Maximum ray length when looking for an interactable.
    pub const MAX_DISTANCE: f32 = 5.0;
}
