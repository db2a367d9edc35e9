//! House configuration and assembly.
//!
//! A house is a stack of floors. Each floor has one corridor running along Z
//! with rooms in bays on either side, an optional room beyond the corridor's
//! start, and optionally a flight of stairs past its end.
//!
//! # Assembly
//!
//! 1. Corridor: floor, ceiling, paired side walls cut at every bay
//! 2. Bay rooms: door wall supplied by the corridor, door facing the gap
//! 3. Start room: door wall shared with the corridor's start cap
//! 4. Stairs up to the next floor's height
//!
//! ```
//! use hearth_logic::level::{build_house, HouseConfig};
//!
//! let plan = build_house(&HouseConfig::default()).unwrap();
//! assert_eq!(plan.rooms.iter().filter(|r| r.parent.is_none()).count(), 6);
//! ```

use log::info;
use serde::{Deserialize, Serialize};

use crate::corridor::{build_corridor, build_stairs, stairs_at_end, CorridorSide, CorridorSpec};
use crate::error::LayoutError;
use crate::flicker::FlickerProfile;
use crate::plan::LevelPlan;
use crate::primitives::{AssetRef, Color};
use crate::room::{build_room, Decorator, Direction, FirstActivate, Point2, RoomSpec, Seam, SubRoomSpec};
use crate::segments::{Axis, GapSpec};

/// One room off a corridor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub label: String,
    /// Size along the corridor.
    pub frontage: f32,
    /// Size away from the corridor.
    pub depth: f32,
    pub wall_color: Color,
    pub light_color: Color,
    #[serde(default)]
    pub flicker: Option<FlickerProfile>,
    #[serde(default = "default_true")]
    pub start_on: bool,
    /// Carve a bathroom into the far corner.
    #[serde(default)]
    pub bathroom: bool,
    /// Photo on a table in the middle of the room.
    #[serde(default)]
    pub photo: Option<AssetRef>,
    /// Pictures on the wall opposite the door.
    #[serde(default)]
    pub frames: Vec<AssetRef>,
    /// Hidden figure revealed the first time the light is switched on.
    #[serde(default)]
    pub scare: bool,
}

fn default_true() -> bool {
    true
}

impl RoomConfig {
    pub fn new(label: impl Into<String>, frontage: f32, depth: f32, wall_color: Color, light_color: Color) -> Self {
        Self {
            label: label.into(),
            frontage,
            depth,
            wall_color,
            light_color,
            flicker: None,
            start_on: true,
            bathroom: false,
            photo: None,
            frames: Vec::new(),
            scare: false,
        }
    }

    fn to_spec(&self, center: Point2, size: (f32, f32), door_direction: Direction, base: f32, seam: Seam) -> RoomSpec {
        let mut spec = RoomSpec::new(self.label.clone(), center, size, door_direction);
        spec.base_height = base;
        spec.wall_color = self.wall_color;
        spec.light_color = self.light_color;
        if let Some(profile) = self.flicker {
            spec.flicker = true;
            spec.flicker_profile = profile;
        }
        spec.start_on = self.start_on;
        spec.seam = seam;
        if self.bathroom {
            spec.sub_room = Some(SubRoomSpec::bathroom());
        }
        if self.scare {
            spec.first_activate = Some(FirstActivate::figure());
        }
        if let Some(texture) = &self.photo {
            spec.decorators.push(Decorator::PhotoTable {
                texture: texture.clone(),
            });
        }
        if !self.frames.is_empty() {
            spec.decorators.push(Decorator::WallFrames {
                textures: self.frames.clone(),
            });
        }
        spec
    }
}

/// A door gap in the corridor and the rooms behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bay {
    /// Position of the door along the corridor.
    pub along: f32,
    #[serde(default)]
    pub left: Option<RoomConfig>,
    #[serde(default)]
    pub right: Option<RoomConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    pub label: String,
    /// Sorted by `along`.
    pub bays: Vec<Bay>,
    /// Room past the corridor's start, entered through its end cap.
    #[serde(default)]
    pub start_room: Option<RoomConfig>,
    /// Stairs past the corridor's end, up to the next floor.
    #[serde(default)]
    pub stairs_up: bool,
    /// Leave the corridor's end open (e.g. onto a landing).
    #[serde(default)]
    pub open_end: bool,
    #[serde(default)]
    pub corridor_lights: Vec<f32>,
}

/// Everything needed to build a house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseConfig {
    /// Seed for runtime randomness (flicker).
    pub seed: u64,
    pub corridor_length: f32,
    pub corridor_width: f32,
    /// Height between consecutive floors.
    pub floor_height: f32,
    pub corridor_color: Color,
    pub corridor_light_color: Color,
    pub corridor_flicker: Option<FlickerProfile>,
    pub stair_color: Color,
    pub ambient: Color,
    pub floors: Vec<FloorConfig>,
}

impl Default for HouseConfig {
    fn default() -> Self {
        let mut study = RoomConfig::new("Study", 9.0, 10.0, Color::rgb(0.3, 0.25, 0.2), Color::rgb(1.0, 0.85, 0.6));
        study.flicker = Some(FlickerProfile::unstable());
        study.start_on = false;
        study.scare = true;

        let mut nursery = RoomConfig::new("Nursery", 9.0, 8.0, Color::rgb(0.9, 0.8, 0.85), Color::rgb(1.0, 0.9, 0.8));
        nursery.photo = Some(AssetRef::new("photos/nursery.png"));
        nursery.flicker = Some(FlickerProfile::steady_dim());

        let mut bedroom = RoomConfig::new("Master Bedroom", 10.0, 10.0, Color::BLUE, Color::CYAN);
        bedroom.bathroom = true;
        bedroom.photo = Some(AssetRef::new("photos/family.png"));
        bedroom.frames = vec![
            AssetRef::new("photos/wedding.png"),
            AssetRef::new("photos/beach.png"),
            AssetRef::new("photos/graduation.png"),
        ];

        Self {
            seed: 0,
            corridor_length: 30.0,
            corridor_width: 4.0,
            floor_height: 4.0,
            corridor_color: Color::LIGHT_GRAY,
            corridor_light_color: Color::rgb8(200, 200, 150),
            corridor_flicker: Some(FlickerProfile::strobe()),
            stair_color: Color::rgb8(100, 100, 100),
            ambient: Color::rgb8(30, 30, 30),
            floors: vec![
                FloorConfig {
                    label: "Ground".into(),
                    bays: vec![
                        Bay {
                            along: -10.0,
                            left: Some(RoomConfig::new(
                                "Dining Room",
                                9.0,
                                10.0,
                                Color::rgb(0.5, 0.35, 0.2),
                                Color::rgb(1.0, 0.9, 0.7),
                            )),
                            right: None,
                        },
                        Bay {
                            along: 0.0,
                            left: Some(RoomConfig::new("Living Room", 9.0, 10.0, Color::RED, Color::ORANGE)),
                            right: Some(RoomConfig::new("Kitchen", 9.0, 10.0, Color::CYAN, Color::WHITE)),
                        },
                        Bay {
                            along: 10.0,
                            left: None,
                            right: Some(study),
                        },
                    ],
                    start_room: None,
                    stairs_up: true,
                    open_end: true,
                    corridor_lights: vec![-10.0, 0.0, 10.0],
                },
                FloorConfig {
                    label: "Upper".into(),
                    bays: vec![Bay {
                        along: 5.0,
                        left: Some(nursery),
                        right: None,
                    }],
                    start_room: Some(bedroom),
                    stairs_up: false,
                    open_end: true,
                    corridor_lights: vec![-10.0, 0.0, 10.0],
                },
            ],
        }
    }
}

/// Build every floor of the house into one plan.
pub fn build_house(config: &HouseConfig) -> Result<LevelPlan, LayoutError> {
    let mut plan = LevelPlan::new();
    plan.ambient = Some(config.ambient);

    for (index, floor) in config.floors.iter().enumerate() {
        let base = index as f32 * config.floor_height;
        build_floor(config, floor, base, &mut plan)?;
    }

    let summary = plan.summary();
    info!(
        "house built: {} floors, {} rooms, {} doors, {} switches, {} lights ({} flickering), {} primitives",
        config.floors.len(),
        summary.rooms,
        summary.doors,
        summary.switches,
        summary.lights,
        summary.flickering_lights,
        summary.primitives
    );
    Ok(plan)
}

fn build_floor(config: &HouseConfig, floor: &FloorConfig, base: f32, plan: &mut LevelPlan) -> Result<(), LayoutError> {
    let half = config.corridor_length / 2.0;
    let half_width = config.corridor_width / 2.0;

    let mut corridor = CorridorSpec::new(
        format!("{} corridor", floor.label),
        Axis::Z,
        -half,
        half,
        config.corridor_width,
    );
    corridor.base_height = base;
    corridor.wall_color = config.corridor_color;
    corridor.light_color = config.corridor_light_color;
    corridor.flicker = config.corridor_flicker;
    corridor.lights = floor.corridor_lights.clone();
    corridor.gaps = floor.bays.iter().map(|bay| GapSpec::door(bay.along)).collect();
    for (i, bay) in floor.bays.iter().enumerate() {
        if bay.left.is_none() {
            corridor.closed.push((CorridorSide::Left, i));
        }
        if bay.right.is_none() {
            corridor.closed.push((CorridorSide::Right, i));
        }
    }
    corridor.cap_start = Some(match floor.start_room {
        Some(_) => vec![GapSpec::door(0.0)],
        None => Vec::new(),
    });
    corridor.cap_end = (!floor.open_end && !floor.stairs_up).then(Vec::new);
    build_corridor(&corridor, plan)?;

    let seam = Seam::Corridor { start: -half, end: half };
    for bay in &floor.bays {
        if let Some(room) = &bay.left {
            let center = Point2::new(-(half_width + room.depth / 2.0), bay.along);
            build_room(&room.to_spec(center, (room.depth, room.frontage), Direction::West, base, seam), plan)?;
        }
        if let Some(room) = &bay.right {
            let center = Point2::new(half_width + room.depth / 2.0, bay.along);
            build_room(&room.to_spec(center, (room.depth, room.frontage), Direction::East, base, seam), plan)?;
        }
    }

    if let Some(room) = &floor.start_room {
        let center = Point2::new(0.0, -half - room.depth / 2.0);
        let seam = Seam::Corridor {
            start: -half_width,
            end: half_width,
        };
        build_room(&room.to_spec(center, (room.frontage, room.depth), Direction::South, base, seam), plan)?;
    }

    if floor.stairs_up {
        build_stairs(&stairs_at_end(&corridor, config.stair_color), plan)?;
    }
    Ok(())
}
