//! Simulation engine for PURSUIT.
//!
//! Owns the entity registry (a hecs world indexed by `EntityId`), steps every
//! robot against the target once per tick, and produces `RenderFrame`s for
//! whatever renderer is attached.

pub mod engine;
pub mod systems;
pub mod world_setup;

pub use engine::Simulation;
pub use pursuit_core as core;
