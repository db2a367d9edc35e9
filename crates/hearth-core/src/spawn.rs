//! Spawning a `LevelPlan` into the world and the host, once.

use hecs::{Entity, World};
use log::{debug, info, warn};
use thiserror::Error;

use hearth_logic::constants::switches;
use hearth_logic::error::LayoutError;
use hearth_logic::flicker::FlickerController;
use hearth_logic::interact::{Door, LightSwitch, PhotoViewer};
use hearth_logic::plan::{LevelPlan, ScriptedEvent};
use hearth_logic::primitives::{Color, Primitive, Vec3};

use crate::components::{indicator, Hidden, Interactable, Label, Parent, PointLight, SwitchWiring};
use crate::host::{AssetError, Host};

/// Errors that stop a level from spawning.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("host error: {0}")]
    Host(#[from] AssetError),
}

/// Entities created for a level, in plan order.
#[derive(Debug, Default)]
pub struct SpawnedLevel {
    pub geometry: Vec<Entity>,
    pub lights: Vec<Entity>,
    pub doors: Vec<Entity>,
    pub switches: Vec<Entity>,
    pub photos: Vec<Entity>,
    pub props: Vec<Entity>,
    /// Flickering lights and their controllers.
    pub flickers: Vec<(Entity, FlickerController)>,
    /// Primitives that fell back to the placeholder material.
    pub fallbacks: usize,
}

/// Spawn a primitive, retrying without its texture if the host can't find it.
/// Returns whether the fallback was used.
pub fn spawn_with_fallback(
    host: &mut impl Host,
    entity: Entity,
    parent: Option<Entity>,
    primitive: &Primitive,
) -> Result<bool, AssetError> {
    match host.spawn_primitive(entity, parent, primitive) {
        Ok(()) => Ok(false),
        Err(AssetError::NotFound(asset)) => {
            warn!(
                "'{}': asset '{}' not found, using placeholder material",
                primitive.label,
                asset.as_str()
            );
            let placeholder = Primitive {
                texture: None,
                ..primitive.clone()
            };
            host.spawn_primitive(entity, parent, &placeholder)?;
            Ok(true)
        }
        Err(e) => Err(e),
    }
}

/// Spawn everything in `plan`.
///
/// Every switch's light is forced to match the switch's starting state,
/// whatever the plan says.
pub fn spawn_level(world: &mut World, host: &mut impl Host, plan: &LevelPlan) -> Result<SpawnedLevel, SpawnError> {
    let mut level = SpawnedLevel::default();

    if let Some(ambient) = plan.ambient {
        host.set_ambient(ambient);
    }

    for primitive in &plan.primitives {
        let entity = world.spawn((Label(primitive.label.clone()),));
        level.fallbacks += usize::from(spawn_with_fallback(host, entity, None, primitive)?);
        level.geometry.push(entity);
    }

    for light in &plan.lights {
        let entity = world.spawn((
            Label(light.label.clone()),
            PointLight {
                enabled: light.enabled,
                color: light.color,
            },
        ));
        host.spawn_light(entity, light.position, light.color, light.enabled);
        if let Some(profile) = light.flicker {
            level.flickers.push((entity, FlickerController::new(light.color, profile)?));
        }
        level.lights.push(entity);
    }

    for prop in &plan.props {
        let label = Label(prop.primitive.label.clone());
        let entity = if prop.hidden {
            world.spawn((label, Hidden))
        } else {
            world.spawn((label,))
        };
        level.fallbacks += usize::from(spawn_with_fallback(host, entity, None, &prop.primitive)?);
        if prop.hidden {
            host.set_visible(entity, false);
        }
        level.props.push(entity);
    }

    for door in &plan.doors {
        // The pivot sits on the hinge; the leaf hangs off it.
        let pivot = world.spawn((
            Label(door.label.clone()),
            Interactable::Door(Door::new(door.open_yaw)),
        ));
        host.spawn_node(pivot, None, door.hinge, 0.0);
        let leaf = Primitive {
            position: door.position - door.hinge,
            ..door.leaf.clone()
        };
        let leaf_entity = world.spawn((Label(leaf.label.clone()), Parent(pivot)));
        level.fallbacks += usize::from(spawn_with_fallback(host, leaf_entity, Some(pivot), &leaf)?);
        level.doors.push(pivot);
    }

    for switch in &plan.switches {
        let light = switch.light.and_then(|id| level.lights.get(id.0).copied());
        let reveal = switch
            .on_first_activate
            .and_then(|ScriptedEvent::Reveal(id)| level.props.get(id.0).copied());

        let mut state = LightSwitch::new(switch.start_on).with_prompts(&switch.prompt_on, &switch.prompt_off);
        if let Some(event) = switch.on_first_activate {
            state = state.with_first_activate(event);
        }

        let (pw, ph, pd) = switches::PLATE;
        let plate = Primitive::cube(
            switch.label.clone(),
            switch.position,
            Vec3::new(pw, ph, pd),
            Color::LIGHT_GRAY,
        )
        .with_yaw(switch.yaw);
        let wiring = SwitchWiring {
            light,
            indicator: None,
            reveal,
        };
        let entity = world.spawn((Label(switch.label.clone()), Interactable::Switch(state), wiring));
        level.fallbacks += usize::from(spawn_with_fallback(host, entity, None, &plate)?);

        // Small lamp on the plate's front face, local -Z.
        let lamp = Primitive::cube(
            format!("{} indicator", switch.label),
            Vec3::new(0.0, ph / 4.0, -(pd / 2.0 + 0.01)),
            Vec3::new(0.05, 0.05, 0.02),
            indicator::color(switch.start_on),
        )
        .with_collider(false)
        .unlit();
        let lamp_entity = world.spawn((Label(lamp.label.clone()), Parent(entity)));
        level.fallbacks += usize::from(spawn_with_fallback(host, lamp_entity, Some(entity), &lamp)?);

        if let Ok(mut wiring) = world.get::<&mut SwitchWiring>(entity) {
            wiring.indicator = Some(lamp_entity);
        }

        if let Some(light) = light {
            sync_light(world, host, light, switch.start_on);
        }
        level.switches.push(entity);
    }

    for photo in &plan.photos {
        let entity = world.spawn((
            Label(photo.label.clone()),
            Interactable::Photo(PhotoViewer::new(photo.texture.clone())),
        ));
        host.spawn_node(entity, None, photo.position, photo.yaw);
        for part in &photo.parts {
            let child = world.spawn((Label(part.label.clone()), Parent(entity)));
            level.fallbacks += usize::from(spawn_with_fallback(host, child, Some(entity), part)?);
        }
        level.photos.push(entity);
    }

    info!(
        "level spawned: {} entities, {} lights ({} flickering), {} doors, {} switches, {} photos, {} fallbacks",
        world.len(),
        level.lights.len(),
        level.flickers.len(),
        level.doors.len(),
        level.switches.len(),
        level.photos.len(),
        level.fallbacks
    );
    Ok(level)
}

/// Set a light's enabled flag in the world and on the host.
pub fn sync_light(world: &mut World, host: &mut impl Host, light: Entity, enabled: bool) {
    if let Ok(mut state) = world.get::<&mut PointLight>(light) {
        if state.enabled != enabled {
            debug!("light {:?} enabled -> {}", light, enabled);
        }
        state.enabled = enabled;
        host.set_light(light, enabled, state.color);
    }
}
