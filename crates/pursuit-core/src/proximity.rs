//! Proximity trigger: a robot that reaches the target sends it elsewhere.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Arena, Target};
use crate::constants::PROXIMITY_THRESHOLD;
use crate::types::Vec2;

/// When and where the target respawns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityRule {
    /// Distances strictly below this count as reaching the target.
    pub threshold: f64,
    /// Bounds for the new position.
    pub arena: Arena,
}

impl Default for ProximityRule {
    fn default() -> Self {
        Self {
            threshold: PROXIMITY_THRESHOLD,
            arena: Arena::default(),
        }
    }
}

/// A target move caused by the proximity trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Respawn {
    pub from: Vec2,
    pub to: Vec2,
}

/// Respawn `target` if `distance` is inside the threshold.
///
/// Fires on every call made while in range, not only on arrival.
pub fn maybe_respawn<R: Rng>(
    target: &mut Target,
    distance: f64,
    rule: &ProximityRule,
    rng: &mut R,
) -> Option<Respawn> {
    if distance >= rule.threshold {
        return None;
    }

    let from = target.position;
    target.respawn(&rule.arena, rng);
    Some(Respawn {
        from,
        to: target.position,
    })
}
