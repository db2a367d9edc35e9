//! Host port: the contract a real-time engine implements to run a level.
//!
//! The runtime owns all state and decisions; the host only draws, casts
//! rays and shows UI. Entities are `hecs` ids, reused as the host's keys.

use hecs::Entity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hearth_logic::primitives::{AssetRef, Color, Primitive, Vec3};

/// Error reported by a host while creating scene objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// A texture or model could not be loaded. The caller may retry with a
    /// placeholder material.
    #[error("asset not found: {}", .0.as_str())]
    NotFound(AssetRef),
    /// The host refused the request outright.
    #[error("host rejected '{label}': {reason}")]
    Rejected { label: String, reason: String },
}

/// A ray in world space. `direction` need not be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` through `target`.
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, (target - origin).normalize())
    }
}

/// First-person controller parameters frozen while a photo is open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerControls {
    pub speed: f32,
    pub mouse_sensitivity: (f32, f32),
}

impl PlayerControls {
    /// Movement and look disabled.
    pub const FROZEN: Self = Self {
        speed: 0.0,
        mouse_sensitivity: (0.0, 0.0),
    };
}

impl Default for PlayerControls {
    fn default() -> Self {
        Self {
            speed: 5.0,
            mouse_sensitivity: (40.0, 40.0),
        }
    }
}

/// Crosshair highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Crosshair {
    #[default]
    Idle,
    /// Something under the cursor can be used.
    Interactable,
}

/// Engine port.
///
/// Positions passed with a `parent` are relative to that parent's transform
/// (rotated by its yaw); without one they are world positions.
pub trait Host {
    /// Create a drawable (and, if `primitive.collider`, ray-hittable) object.
    fn spawn_primitive(&mut self, entity: Entity, parent: Option<Entity>, primitive: &Primitive)
        -> Result<(), AssetError>;

    /// Create an empty transform node other objects can be parented to.
    fn spawn_node(&mut self, entity: Entity, parent: Option<Entity>, position: Vec3, yaw: f32);

    /// Set an object's local yaw in degrees.
    fn set_yaw(&mut self, entity: Entity, yaw: f32);

    fn set_visible(&mut self, entity: Entity, visible: bool);

    fn set_color(&mut self, entity: Entity, color: Color);

    fn spawn_light(&mut self, entity: Entity, position: Vec3, color: Color, enabled: bool);

    fn set_light(&mut self, entity: Entity, enabled: bool, color: Color);

    fn set_ambient(&mut self, color: Color);

    /// Nearest visible collider hit within `max_distance`.
    fn raycast(&self, ray: Ray, max_distance: f32) -> Option<Entity>;

    /// Current camera ray.
    fn view_ray(&self) -> Ray;

    /// Show `Some(text)` as the interaction prompt, or hide it.
    fn set_prompt(&mut self, text: Option<&str>);

    fn set_crosshair(&mut self, crosshair: Crosshair);

    /// Full-screen photo overlay.
    fn show_photo(&mut self, texture: &AssetRef);

    fn hide_photo(&mut self);

    fn player_controls(&self) -> PlayerControls;

    fn set_player_controls(&mut self, controls: PlayerControls);
}
