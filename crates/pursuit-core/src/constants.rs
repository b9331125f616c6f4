//! Simulation constants and tuning defaults.

use std::time::Duration;

// --- Arena ---

/// Default arena width in arena units.
pub const ARENA_WIDTH: f64 = 1000.0;

/// Default arena height in arena units.
pub const ARENA_HEIGHT: f64 = 1000.0;

/// Largest arena side. Integer respawn positions stay exact up to 2^53.
pub const ARENA_MAX_EXTENT: f64 = 9_007_199_254_740_992.0;

// --- Timing ---

/// Default wall-clock interval between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

// --- Proximity ---

/// A robot closer than this to the target triggers a respawn.
pub const PROXIMITY_THRESHOLD: f64 = 50.0;

// --- Robot ---

/// Render diameter of a robot.
pub const ROBOT_SIZE: f64 = 50.0;

/// Length of the heading indicator drawn from the robot centre.
pub const HEADING_LINE_LENGTH: f64 = 50.0;

/// Stroke width of the heading indicator.
pub const HEADING_LINE_WIDTH: u32 = 2;

/// Velocity saturation bound (units per tick).
pub const MAX_VELOCITY: f64 = 10.0;

// --- Controller gains ---

/// Proportional gain on distance error.
pub const KP_DISTANCE: f64 = 0.1;

/// Proportional gain on angle error.
pub const KP_ANGLE: f64 = 0.25;

/// Gain on the previous tick's error.
pub const KD: f64 = 0.1;

/// Gain on the accumulated error.
pub const KI: f64 = 0.075;

/// Divisor applied to the derivative term of the PD-special controller.
pub const PD_SPECIAL_RATE: f64 = 60.0;

// --- Target ---

/// Render diameter of the target.
pub const TARGET_SIZE: f64 = 30.0;
