//! In-memory `Host` for tests and the simtest harness.
//!
//! Keeps a flat scene graph keyed by entity, composes parent-relative
//! transforms on demand and raycasts against the world-space bounds of
//! visible colliders. UI writes are recorded and counted.

use std::collections::{HashMap, HashSet};

use hecs::Entity;
use log::warn;

use hearth_logic::primitives::{Aabb, AssetRef, Color, Primitive, Vec3};

use crate::host::{AssetError, Crosshair, Host, PlayerControls, Ray};

/// A transform node, optionally carrying a primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct HostNode {
    pub parent: Option<Entity>,
    pub position: Vec3,
    pub yaw: f32,
    pub primitive: Option<Primitive>,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostLight {
    pub position: Vec3,
    pub color: Color,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    pub nodes: HashMap<Entity, HostNode>,
    pub lights: HashMap<Entity, HostLight>,
    missing: HashSet<String>,
    pub ambient: Option<Color>,
    pub prompt: Option<String>,
    pub prompt_writes: usize,
    pub crosshair: Crosshair,
    pub crosshair_writes: usize,
    pub photo: Option<AssetRef>,
    pub controls: PlayerControls,
    pub view: Ray,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            lights: HashMap::new(),
            missing: HashSet::new(),
            ambient: None,
            prompt: None,
            prompt_writes: 0,
            crosshair: Crosshair::Idle,
            crosshair_writes: 0,
            photo: None,
            controls: PlayerControls::default(),
            // Pointing down from below the floor: hits nothing by default.
            view: Ray::new(Vec3::new(0.0, -100.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
        }
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `path` as missing whenever a primitive asks for it.
    pub fn with_missing_asset(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }

    /// Point the camera from `eye` at `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.view = Ray::towards(eye, target);
    }

    pub fn node(&self, entity: Entity) -> Option<&HostNode> {
        self.nodes.get(&entity)
    }

    pub fn light(&self, entity: Entity) -> Option<&HostLight> {
        self.lights.get(&entity)
    }

    /// Current color of a node's primitive.
    pub fn color(&self, entity: Entity) -> Option<Color> {
        self.node(entity)?.primitive.as_ref().map(|p| p.color)
    }

    /// World position and yaw, composed through the parent chain.
    pub fn world_transform(&self, entity: Entity) -> Option<(Vec3, f32)> {
        let mut node = self.nodes.get(&entity)?;
        let mut position = node.position;
        let mut yaw = node.yaw;
        let mut visited = HashSet::from([entity]);
        while let Some(parent) = node.parent {
            if !visited.insert(parent) {
                return None;
            }
            node = self.nodes.get(&parent)?;
            position = node.position + position.rotate_y(node.yaw);
            yaw += node.yaw;
        }
        Some((position, yaw))
    }

    /// Visible only if the node and all its ancestors are.
    pub fn is_visible(&self, entity: Entity) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(entity);
        while let Some(e) = current {
            if !visited.insert(e) {
                return false;
            }
            match self.nodes.get(&e) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// World-space bounds of a node's primitive.
    pub fn world_bounds(&self, entity: Entity) -> Option<Aabb> {
        let primitive = self.nodes.get(&entity)?.primitive.as_ref()?;
        let (position, yaw) = self.world_transform(entity)?;
        Some(Aabb::from_rotated(position, primitive.extents(), yaw))
    }

    /// First node whose primitive carries `label`.
    pub fn find(&self, label: &str) -> Option<Entity> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.primitive.as_ref().is_some_and(|p| p.label == label))
            .map(|(e, _)| *e)
            .min()
    }

    fn insert(&mut self, entity: Entity, node: HostNode) -> Result<(), AssetError> {
        if let Some(parent) = node.parent {
            if !self.nodes.contains_key(&parent) {
                return Err(AssetError::Rejected {
                    label: node.primitive.map(|p| p.label).unwrap_or_default(),
                    reason: format!("unknown parent {parent:?}"),
                });
            }
        }
        self.nodes.insert(entity, node);
        Ok(())
    }
}

impl Host for HeadlessHost {
    fn spawn_primitive(
        &mut self,
        entity: Entity,
        parent: Option<Entity>,
        primitive: &Primitive,
    ) -> Result<(), AssetError> {
        if let Some(texture) = &primitive.texture {
            if self.missing.contains(texture.as_str()) {
                return Err(AssetError::NotFound(texture.clone()));
            }
        }
        self.insert(
            entity,
            HostNode {
                parent,
                position: primitive.position,
                yaw: primitive.yaw,
                primitive: Some(primitive.clone()),
                visible: true,
            },
        )
    }

    fn spawn_node(&mut self, entity: Entity, parent: Option<Entity>, position: Vec3, yaw: f32) {
        let node = HostNode {
            parent,
            position,
            yaw,
            primitive: None,
            visible: true,
        };
        if let Err(e) = self.insert(entity, node) {
            warn!("node {:?} not created: {}", entity, e);
        }
    }

    fn set_yaw(&mut self, entity: Entity, yaw: f32) {
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.yaw = yaw;
        }
    }

    fn set_visible(&mut self, entity: Entity, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.visible = visible;
        }
    }

    fn set_color(&mut self, entity: Entity, color: Color) {
        if let Some(primitive) = self.nodes.get_mut(&entity).and_then(|n| n.primitive.as_mut()) {
            primitive.color = color;
        }
    }

    fn spawn_light(&mut self, entity: Entity, position: Vec3, color: Color, enabled: bool) {
        self.lights.insert(
            entity,
            HostLight {
                position,
                color,
                enabled,
            },
        );
    }

    fn set_light(&mut self, entity: Entity, enabled: bool, color: Color) {
        if let Some(light) = self.lights.get_mut(&entity) {
            light.enabled = enabled;
            light.color = color;
        }
    }

    fn set_ambient(&mut self, color: Color) {
        self.ambient = Some(color);
    }

    fn raycast(&self, ray: Ray, max_distance: f32) -> Option<Entity> {
        let mut best: Option<(f32, Entity)> = None;
        for (&entity, node) in &self.nodes {
            if !node.primitive.as_ref().is_some_and(|p| p.collider) || !self.is_visible(entity) {
                continue;
            }
            let Some(bounds) = self.world_bounds(entity) else {
                continue;
            };
            if let Some(distance) = bounds.ray_distance(ray.origin, ray.direction, max_distance) {
                let closer = match best {
                    None => true,
                    Some((d, e)) => distance < d || (distance == d && entity < e),
                };
                if closer {
                    best = Some((distance, entity));
                }
            }
        }
        best.map(|(_, e)| e)
    }

    fn view_ray(&self) -> Ray {
        self.view
    }

    fn set_prompt(&mut self, text: Option<&str>) {
        self.prompt = text.map(str::to_string);
        self.prompt_writes += 1;
    }

    fn set_crosshair(&mut self, crosshair: Crosshair) {
        self.crosshair = crosshair;
        self.crosshair_writes += 1;
    }

    fn show_photo(&mut self, texture: &AssetRef) {
        self.photo = Some(texture.clone());
    }

    fn hide_photo(&mut self) {
        self.photo = None;
    }

    fn player_controls(&self) -> PlayerControls {
        self.controls
    }

    fn set_player_controls(&mut self, controls: PlayerControls) {
        self.controls = controls;
    }
}
