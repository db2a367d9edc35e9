//! Pure layout and interaction logic for Hearth.
//!
//! This crate contains everything about the house that is independent of
//! the engine: wall segmentation, room and corridor construction, fixture
//! placement, and the state machines behind doors, switches, photos and
//! flickering lights. Functions take plain data and return plain data; the
//! `hearth-core` crate spawns the result into an ECS world.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Wall, door, switch, light, stair and interaction tunables |
//! | [`corridor`] | Corridors with paired segmented walls, end caps, stairs |
//! | [`error`] | `LayoutError`: configuration errors raised during assembly |
//! | [`flicker`] | Randomized retarget + smoothed intensity flicker |
//! | [`geometry`] | Layout validation (openings, door alignment, clearance) |
//! | [`interact`] | Door, light switch and photo viewer state machines |
//! | [`level`] | `HouseConfig` and whole-house assembly |
//! | [`plan`] | `LevelPlan`: the placement list handed to the engine |
//! | [`primitives`] | `Vec3`, `Color`, `Primitive`, `Aabb` |
//! | [`room`] | Rooms with one door opening, sub-room carving, decorators |
//! | [`segments`] | Splitting a wall line around door gaps |

pub mod constants;
pub mod corridor;
pub mod error;
pub mod flicker;
pub mod geometry;
pub mod interact;
pub mod level;
pub mod plan;
pub mod primitives;
pub mod room;
pub mod segments;
