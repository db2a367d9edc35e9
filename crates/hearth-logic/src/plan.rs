//! The level plan: everything the layout pass decided, as plain data.
//!
//! Builders append to a `LevelPlan`; the runtime spawns it into the engine
//! once and never revisits it. Placements reference each other through typed
//! indices rather than pointers.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::flicker::FlickerProfile;
use crate::primitives::{AssetRef, Color, Primitive, Vec3};
use crate::room::RoomRecord;

/// Index of a light in `LevelPlan::lights`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightId(pub usize);

/// Index of a prop in `LevelPlan::props`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropId(pub usize);

/// Index of a room in `LevelPlan::rooms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// One-time scripted consequence of a switch's first activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptedEvent {
    /// Make a hidden prop visible.
    Reveal(PropId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightPlacement {
    pub label: String,
    pub position: Vec3,
    pub color: Color,
    pub enabled: bool,
    pub flicker: Option<FlickerProfile>,
}

/// A hinged door filling an opening.
///
/// `position` is the center of the closed leaf, which is also the center of
/// the opening. The leaf rotates about the vertical edge at `hinge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorPlacement {
    pub label: String,
    pub position: Vec3,
    pub hinge: Vec3,
    /// Yaw of the closed leaf (0 for walls along X, 90 for walls along Z).
    pub closed_yaw: f32,
    /// Signed pivot rotation that opens the door into its room.
    pub open_yaw: f32,
    pub leaf: Primitive,
    pub room: Option<RoomId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchPlacement {
    pub label: String,
    pub position: Vec3,
    pub yaw: f32,
    pub start_on: bool,
    pub light: Option<LightId>,
    pub on_first_activate: Option<ScriptedEvent>,
    pub prompt_on: String,
    pub prompt_off: String,
}

/// A table with a photo on it. `parts` are relative to `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoPlacement {
    pub label: String,
    pub position: Vec3,
    pub yaw: f32,
    pub texture: AssetRef,
    pub parts: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    pub primitive: Primitive,
    pub hidden: bool,
}

/// Everything a level build produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelPlan {
    pub primitives: Vec<Primitive>,
    pub lights: Vec<LightPlacement>,
    pub doors: Vec<DoorPlacement>,
    pub switches: Vec<SwitchPlacement>,
    pub photos: Vec<PhotoPlacement>,
    pub props: Vec<PropPlacement>,
    pub rooms: Vec<RoomRecord>,
    pub ambient: Option<Color>,
}

impl LevelPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend_primitives(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        self.primitives.extend(primitives);
    }

    pub fn add_light(&mut self, light: LightPlacement) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    pub fn add_prop(&mut self, primitive: Primitive, hidden: bool) -> PropId {
        self.props.push(PropPlacement { primitive, hidden });
        PropId(self.props.len() - 1)
    }

    pub fn add_door(&mut self, door: DoorPlacement) -> usize {
        self.doors.push(door);
        self.doors.len() - 1
    }

    pub fn add_switch(&mut self, switch: SwitchPlacement) -> Result<usize, LayoutError> {
        if let Some(LightId(index)) = switch.light {
            if index >= self.lights.len() {
                return Err(LayoutError::UnknownPlacement { what: "light", index });
            }
        }
        if let Some(ScriptedEvent::Reveal(PropId(index))) = switch.on_first_activate {
            if index >= self.props.len() {
                return Err(LayoutError::UnknownPlacement { what: "prop", index });
            }
        }
        self.switches.push(switch);
        Ok(self.switches.len() - 1)
    }

    pub fn add_photo(&mut self, photo: PhotoPlacement) {
        self.photos.push(photo);
    }

    pub fn add_room(&mut self, room: RoomRecord) -> RoomId {
        self.rooms.push(room);
        RoomId(self.rooms.len() - 1)
    }

    pub fn light(&self, id: LightId) -> Option<&LightPlacement> {
        self.lights.get(id.0)
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomRecord> {
        self.rooms.get(id.0)
    }

    /// Doors belonging to a room.
    pub fn doors_of(&self, id: RoomId) -> impl Iterator<Item = &DoorPlacement> {
        self.doors.iter().filter(move |d| d.room == Some(id))
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            primitives: self.primitives.len(),
            lights: self.lights.len(),
            flickering_lights: self.lights.iter().filter(|l| l.flicker.is_some()).count(),
            doors: self.doors.len(),
            switches: self.switches.len(),
            photos: self.photos.len(),
            props: self.props.len(),
            rooms: self.rooms.len(),
        }
    }
}

/// Placement counts, for logging and the harness report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub primitives: usize,
    pub lights: usize,
    pub flickering_lights: usize,
    pub doors: usize,
    pub switches: usize,
    pub photos: usize,
    pub props: usize,
    pub rooms: usize,
}
