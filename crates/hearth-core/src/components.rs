//! Component definitions for the level world.
//!
//! Components are pure data attached to entities. Behavior lives in
//! systems and in the `hearth_logic::interact` state machines, which are
//! stored here as the `Interactable` component.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use hearth_logic::primitives::Color;

pub use hearth_logic::interact::Interactable;

/// Scene-graph parent. Transforms and interaction resolve through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Human-readable name, for logs and lookups in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label(pub String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A point light as last pushed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub enabled: bool,
    pub color: Color,
}

/// Not rendered until something reveals it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hidden;

/// What a light switch drives besides its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchWiring {
    pub light: Option<Entity>,
    /// Child whose color shows the switch state.
    pub indicator: Option<Entity>,
    /// Prop revealed on first activation.
    pub reveal: Option<Entity>,
}

/// Indicator colors.
pub mod indicator {
    use hearth_logic::primitives::Color;

    pub const ON: Color = Color::GREEN;
    pub const OFF: Color = Color::RED;

    pub fn color(is_on: bool) -> Color {
        if is_on {
            ON
        } else {
            OFF
        }
    }
}
