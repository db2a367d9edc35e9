//! Systems - per-frame logic over the level world

mod doors;
mod lighting;

pub use doors::*;
pub use lighting::*;
