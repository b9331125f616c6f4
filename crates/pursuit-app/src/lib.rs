//! PURSUIT runner.
//!
//! Wires the simulation engine to a fixed-interval tick loop and a frame
//! sink. Drawing is left to whatever consumes the frames.

pub mod game_loop;
pub mod sink;

pub use pursuit_core as core;
pub use pursuit_sim as sim;
