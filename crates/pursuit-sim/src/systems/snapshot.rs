//! Snapshot system: builds a `RenderFrame` from the current world.
//!
//! This system is read-only; it never modifies the world.

use std::collections::BTreeMap;

use hecs::World;

use pursuit_core::components::{Robot, Target};
use pursuit_core::enums::EntityKind;
use pursuit_core::events::SimEvent;
use pursuit_core::state::{EntityView, RenderFrame};
use pursuit_core::types::{EntityId, SimTime};

use crate::engine::Slot;

/// Build a complete frame. Entities appear in id order.
pub(crate) fn build_frame(
    world: &World,
    index: &BTreeMap<EntityId, Slot>,
    time: SimTime,
    events: Vec<SimEvent>,
) -> RenderFrame {
    let entities = index
        .iter()
        .filter_map(|(&id, slot)| build_view(world, id, slot))
        .collect();

    RenderFrame {
        time,
        entities,
        events,
    }
}

fn build_view(world: &World, id: EntityId, slot: &Slot) -> Option<EntityView> {
    match slot.kind {
        EntityKind::Robot => {
            let robot = world.get::<&Robot>(slot.entity).ok()?;
            Some(EntityView {
                id,
                kind: EntityKind::Robot,
                circle: robot.circle(),
                heading_line: Some(robot.heading_line()),
                telemetry: Some(robot.telemetry()),
            })
        }
        EntityKind::Target => {
            let target = world.get::<&Target>(slot.entity).ok()?;
            Some(EntityView {
                id,
                kind: EntityKind::Target,
                circle: target.circle(),
                heading_line: None,
                telemetry: None,
            })
        }
    }
}
