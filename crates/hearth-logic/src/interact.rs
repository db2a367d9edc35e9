//! Interactive fixture state machines: doors, light switches, photo viewers.
//!
//! These hold only their own state. Side effects on the scene (light enable
//! flags, overlays, revealed props) are reported back to the caller, which
//! applies them.

use serde::{Deserialize, Serialize};

use crate::constants::doors;
use crate::plan::ScriptedEvent;
use crate::primitives::AssetRef;

// ── Door ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Swing {
    from: f32,
    to: f32,
    elapsed: f32,
}

/// A hinged door. `yaw` is the pivot rotation away from closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    is_open: bool,
    yaw: f32,
    open_yaw: f32,
    swing: Option<Swing>,
}

impl Door {
    /// A closed door that swings to `open_yaw` degrees when opened.
    pub fn new(open_yaw: f32) -> Self {
        Self {
            is_open: false,
            yaw: 0.0,
            open_yaw,
            swing: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip open/closed and start swinging from wherever the leaf is now.
    /// Toggling mid-swing just retargets.
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.swing = Some(Swing {
            from: self.yaw,
            to: self.target_yaw(),
            elapsed: 0.0,
        });
        self.is_open
    }

    /// Advance the swing. Returns the new yaw if the leaf moved.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        let swing = self.swing.as_mut()?;
        swing.elapsed += dt.max(0.0);
        let t = (swing.elapsed / doors::SWING_SECONDS).min(1.0);
        self.yaw = swing.from + (swing.to - swing.from) * t;
        if t >= 1.0 {
            self.swing = None;
        }
        Some(self.yaw)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pivot yaw when fully open.
    pub fn open_yaw(&self) -> f32 {
        self.open_yaw
    }

    pub fn target_yaw(&self) -> f32 {
        if self.is_open {
            self.open_yaw
        } else {
            0.0
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.swing.is_some()
    }

    pub fn prompt_text(&self) -> &str {
        if self.is_open {
            "[E] Close door"
        } else {
            "[E] Open door"
        }
    }
}

// ── Light switch ────────────────────────────────────────────────────────

/// Outcome of flipping a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchToggle {
    pub is_on: bool,
    /// The one-time event, if this toggle was the first activation.
    pub fired: Option<ScriptedEvent>,
}

/// A wall switch controlling at most one light.
///
/// A switch that starts on counts as already activated: its one-time event
/// can never fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSwitch {
    is_on: bool,
    has_triggered_once: bool,
    on_first_activate: Option<ScriptedEvent>,
    prompt_on: String,
    prompt_off: String,
}

impl LightSwitch {
    pub fn new(start_on: bool) -> Self {
        Self {
            is_on: start_on,
            has_triggered_once: start_on,
            on_first_activate: None,
            prompt_on: "[E] Turn light off".to_string(),
            prompt_off: "[E] Turn light on".to_string(),
        }
    }

    pub fn with_first_activate(mut self, event: ScriptedEvent) -> Self {
        self.on_first_activate = Some(event);
        self
    }

    /// Prompts shown while the switch is on and while it is off.
    pub fn with_prompts(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.prompt_on = on.into();
        self.prompt_off = off.into();
        self
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn has_triggered_once(&self) -> bool {
        self.has_triggered_once
    }

    pub fn toggle(&mut self) -> SwitchToggle {
        self.is_on = !self.is_on;
        let mut fired = None;
        if self.is_on && !self.has_triggered_once {
            fired = self.on_first_activate;
            self.has_triggered_once = true;
        }
        SwitchToggle {
            is_on: self.is_on,
            fired,
        }
    }

    pub fn prompt_text(&self) -> &str {
        if self.is_on {
            &self.prompt_on
        } else {
            &self.prompt_off
        }
    }
}

// ── Photo viewer ────────────────────────────────────────────────────────

/// A photo on a table. Opening the overlay is the runtime's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoViewer {
    texture: AssetRef,
}

impl PhotoViewer {
    pub fn new(texture: AssetRef) -> Self {
        Self { texture }
    }

    pub fn texture(&self) -> &AssetRef {
        &self.texture
    }

    pub fn prompt_text(&self) -> &str {
        "[E] Look at photo"
    }
}

/// Prompt shown while a photo overlay is open.
pub const PHOTO_DISMISS_PROMPT: &str = "[E] / [Esc] Put the photo down";

// ── Interactable ────────────────────────────────────────────────────────

/// What an interaction did, for the caller to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Door { open: bool },
    Switch(SwitchToggle),
    Photo { texture: AssetRef },
}

/// Anything the player can use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Interactable {
    Door(Door),
    Switch(LightSwitch),
    Photo(PhotoViewer),
}

impl Interactable {
    pub fn interact(&mut self) -> Interaction {
        match self {
            Interactable::Door(door) => Interaction::Door { open: door.toggle() },
            Interactable::Switch(switch) => Interaction::Switch(switch.toggle()),
            Interactable::Photo(photo) => Interaction::Photo {
                texture: photo.texture().clone(),
            },
        }
    }

    pub fn prompt_text(&self) -> &str {
        match self {
            Interactable::Door(door) => door.prompt_text(),
            Interactable::Switch(switch) => switch.prompt_text(),
            Interactable::Photo(photo) => photo.prompt_text(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Interactable::Door(_) => "door",
            Interactable::Switch(_) => "switch",
            Interactable::Photo(_) => "photo",
        }
    }
}
