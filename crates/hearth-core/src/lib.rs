//! Hearth Core - ECS runtime for the house
//!
//! Spawns a `hearth_logic::plan::LevelPlan` into a `hecs` world and a
//! [`host::Host`] (the real-time engine), then drives it frame by frame:
//! flickering lights, swinging doors, the focused interactable and the
//! photo overlay.
//!
//! # Architecture
//!
//! - **Entities**: geometry, lights, door pivots, switch plates, photo tables
//! - **Components**: `Label`, `Parent`, `PointLight`, `Hidden`, `SwitchWiring`
//!   and the `Interactable` state machines from `hearth_logic`
//! - **Systems**: flicker, door swing and switch wiring
//!
//! # Example
//!
//! ```rust
//! use hearth_core::prelude::*;
//! use hearth_logic::level::HouseConfig;
//!
//! let mut host = HeadlessHost::new();
//! let mut runtime = LevelRuntime::from_config(&HouseConfig::default(), &mut host).unwrap();
//!
//! for _ in 0..60 {
//!     runtime.update(1.0 / 60.0, &mut host);
//! }
//! runtime.handle_input(InputEvent::Interact, &mut host);
//! ```

pub mod components;
pub mod headless;
pub mod host;
pub mod interaction;
pub mod overlay;
pub mod runtime;
pub mod spawn;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::headless::HeadlessHost;
    pub use crate::host::{AssetError, Crosshair, Host, PlayerControls, Ray};
    pub use crate::runtime::{InputEvent, LevelRuntime};
    pub use crate::spawn::{SpawnError, SpawnedLevel};
}
