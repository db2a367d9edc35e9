//! Interaction resolution: what the player is looking at, and using it.

use std::collections::HashSet;

use hecs::{Entity, World};
use log::{debug, warn};

use hearth_logic::constants::interaction::MAX_DISTANCE;
use hearth_logic::interact::Interaction;

use crate::components::{Interactable, Parent};
use crate::host::{Crosshair, Host};

/// Walk from `hit` up its `Parent` chain to the first entity carrying an
/// `Interactable`. Chains of any depth are followed; a parent cycle
/// resolves to `None`.
pub fn resolve_interactable(world: &World, hit: Entity) -> Option<Entity> {
    let mut visited = HashSet::new();
    let mut current = hit;
    loop {
        if world.get::<&Interactable>(current).is_ok() {
            return Some(current);
        }
        if !visited.insert(current) {
            warn!("parent cycle through {:?}", current);
            return None;
        }
        current = world.get::<&Parent>(current).ok()?.0;
    }
}

/// Tracks the focused interactable and what was last written to the UI.
#[derive(Debug, Default)]
pub struct InteractionResolver {
    focus: Option<Entity>,
    /// Last prompt pushed to the host; `None` before the first write.
    shown_prompt: Option<Option<String>>,
    shown_crosshair: Option<Crosshair>,
}

impl InteractionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<Entity> {
        self.focus
    }

    /// Cast the view ray, resolve the target and update prompt and crosshair.
    /// Nothing is written when target and prompt are unchanged.
    pub fn update(&mut self, world: &World, host: &mut impl Host) {
        let hit = host.raycast(host.view_ray(), MAX_DISTANCE);
        let target = hit.and_then(|e| resolve_interactable(world, e));
        let prompt = target.and_then(|e| {
            world
                .get::<&Interactable>(e)
                .ok()
                .map(|i| i.prompt_text().to_string())
        });

        if target != self.focus {
            debug!("focus {:?} -> {:?}", self.focus, target);
            self.focus = target;
        }

        if self.shown_prompt.as_ref() != Some(&prompt) {
            host.set_prompt(prompt.as_deref());
            self.shown_prompt = Some(prompt);
        }

        let crosshair = if target.is_some() {
            Crosshair::Interactable
        } else {
            Crosshair::Idle
        };
        if self.shown_crosshair != Some(crosshair) {
            host.set_crosshair(crosshair);
            self.shown_crosshair = Some(crosshair);
        }
    }

    /// Forget what the UI shows, so the next `update` rewrites it. Needed
    /// after something else (the photo overlay) has taken over the prompt.
    pub fn invalidate(&mut self) {
        self.shown_prompt = None;
        self.shown_crosshair = None;
    }

    /// Use the focused interactable, if any.
    pub fn activate(&mut self, world: &mut World) -> Option<(Entity, Interaction)> {
        let entity = self.focus?;
        let mut item = world.get::<&mut Interactable>(entity).ok()?;
        let interaction = item.interact();
        debug!("{} {:?}: {:?}", item.kind(), entity, interaction);
        Some((entity, interaction))
    }
}
