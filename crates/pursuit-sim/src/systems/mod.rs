//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over the world and the id index. They own no
//! state; everything lives in components.

pub mod pursuit;
pub mod snapshot;
