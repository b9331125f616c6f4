//! Events emitted by the simulation during a tick.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Vec2};

/// Something notable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A robot came within range and the target moved.
    TargetRespawned {
        robot: EntityId,
        target: EntityId,
        from: Vec2,
        to: Vec2,
    },
}
