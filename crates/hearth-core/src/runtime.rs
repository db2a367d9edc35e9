//! Level runtime - owns the world and everything that changes per frame

use hecs::{Entity, World};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hearth_logic::flicker::FlickerController;
use hearth_logic::interact::Interaction;
use hearth_logic::level::{build_house, HouseConfig};
use hearth_logic::plan::LevelPlan;

use crate::components::Label;
use crate::host::Host;
use crate::interaction::InteractionResolver;
use crate::overlay::PhotoOverlay;
use crate::spawn::{spawn_level, SpawnError, SpawnedLevel};
use crate::systems::*;

/// Discrete input the runtime reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Interact,
    Cancel,
}

/// One running level: the spawned world plus per-frame state.
pub struct LevelRuntime {
    /// ECS world containing every spawned entity
    pub world: World,
    level: SpawnedLevel,
    flickers: Vec<(Entity, FlickerController)>,
    resolver: InteractionResolver,
    overlay: PhotoOverlay,
    rng: StdRng,
    elapsed: f64,
}

impl LevelRuntime {
    /// Spawn `plan` through `host`. `seed` drives the flicker rng.
    pub fn new(plan: &LevelPlan, host: &mut impl Host, seed: u64) -> Result<Self, SpawnError> {
        let mut world = World::new();
        let mut level = spawn_level(&mut world, host, plan)?;
        // Controllers live on the runtime from here on.
        let flickers = std::mem::take(&mut level.flickers);
        Ok(Self {
            world,
            level,
            flickers,
            resolver: InteractionResolver::new(),
            overlay: PhotoOverlay::new(),
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
        })
    }

    /// Build the house described by `config` and spawn it.
    pub fn from_config(config: &HouseConfig, host: &mut impl Host) -> Result<Self, SpawnError> {
        let plan = build_house(config)?;
        let runtime = Self::new(&plan, host, config.seed)?;
        info!("runtime ready (seed {})", config.seed);
        Ok(runtime)
    }

    /// One frame: flickers, then door swings, then focus. Focus is frozen
    /// while a photo is open.
    pub fn update(&mut self, dt: f32, host: &mut impl Host) {
        self.elapsed += f64::from(dt.max(0.0));
        flicker_system(&mut self.world, host, &mut self.flickers, dt, &mut self.rng);
        door_system(&mut self.world, host, dt);
        if !self.overlay.is_open() {
            self.resolver.update(&self.world, host);
        }
    }

    /// React to a key press. Returns what the interaction did, if anything.
    pub fn handle_input(&mut self, event: InputEvent, host: &mut impl Host) -> Option<Interaction> {
        if self.overlay.is_open() {
            // Either key puts the photo down.
            self.overlay.close(host);
            self.resolver.invalidate();
            self.resolver.update(&self.world, host);
            return None;
        }
        if event == InputEvent::Cancel {
            return None;
        }

        let (entity, interaction) = self.resolver.activate(&mut self.world)?;
        match &interaction {
            Interaction::Door { open } => {
                debug!("{} -> open={}", self.label(entity), open);
            }
            Interaction::Switch(toggle) => {
                apply_switch_toggle(&mut self.world, host, entity, *toggle);
            }
            Interaction::Photo { texture } => {
                self.overlay.open(host, texture);
                self.resolver.invalidate();
                return Some(interaction);
            }
        }
        // The prompt text may have changed with the state.
        self.resolver.update(&self.world, host);
        Some(interaction)
    }

    pub fn level(&self) -> &SpawnedLevel {
        &self.level
    }

    pub fn flickers(&self) -> &[(Entity, FlickerController)] {
        &self.flickers
    }

    pub fn focus(&self) -> Option<Entity> {
        self.resolver.focus()
    }

    pub fn overlay(&self) -> &PhotoOverlay {
        &self.overlay
    }

    /// Seconds of frame time simulated so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// First entity with the given label.
    pub fn find(&self, label: &str) -> Option<Entity> {
        self.world
            .query::<&Label>()
            .iter()
            .find(|(_, l)| l.as_str() == label)
            .map(|(e, _)| e)
    }

    fn label(&self, entity: Entity) -> String {
        self.world
            .get::<&Label>(entity)
            .map(|l| l.0.clone())
            .unwrap_or_else(|_| format!("{entity:?}"))
    }
}
