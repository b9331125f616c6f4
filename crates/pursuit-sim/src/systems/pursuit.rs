//! Pursuit system: every robot takes one control step against the target.
//!
//! Robots run in ascending id order. A respawn triggered by one robot moves
//! the target before the next robot measures it.

use std::collections::BTreeMap;

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use pursuit_core::components::{Robot, Target};
use pursuit_core::enums::EntityKind;
use pursuit_core::error::{SimError, SimResult};
use pursuit_core::events::SimEvent;
use pursuit_core::proximity::ProximityRule;
use pursuit_core::types::EntityId;

use crate::engine::Slot;

/// Step every registered robot against `target_id`.
pub(crate) fn run(
    world: &World,
    index: &BTreeMap<EntityId, Slot>,
    target_id: EntityId,
    rule: &ProximityRule,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
) -> SimResult<()> {
    let target_slot = index.get(&target_id).ok_or(SimError::MissingTarget)?;
    let mut target = world
        .get::<&mut Target>(target_slot.entity)
        .map_err(|e| SimError::Registry(format!("target {target_id}: {e}")))?;

    for (&robot_id, slot) in index.iter().filter(|(_, s)| s.kind == EntityKind::Robot) {
        let mut robot = world
            .get::<&mut Robot>(slot.entity)
            .map_err(|e| SimError::Registry(format!("robot {robot_id}: {e}")))?;

        if let Some(respawn) = robot.update(&mut target, rule, rng) {
            debug!(
                robot = %robot_id,
                target = %target_id,
                from = ?respawn.from,
                to = ?respawn.to,
                "target respawned"
            );
            events.push(SimEvent::TargetRespawned {
                robot: robot_id,
                target: target_id,
                from: respawn.from,
                to: respawn.to,
            });
        }
    }

    Ok(())
}
