//! Simulation engine.
//!
//! `Simulation` owns the hecs world, the id index, the RNG and the clock.
//! Completely headless, so runs are deterministic under a fixed seed.

use std::collections::BTreeMap;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace, warn};

use pursuit_core::components::{Entity, Robot, Target};
use pursuit_core::config::SimConfig;
use pursuit_core::enums::EntityKind;
use pursuit_core::error::{SimError, SimResult};
use pursuit_core::events::SimEvent;
use pursuit_core::state::RenderFrame;
use pursuit_core::types::{EntityId, SimTime};

use crate::systems;

/// Registry entry: where the entity lives in the world and what it is.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub(crate) entity: hecs::Entity,
    pub(crate) kind: EntityKind,
}

/// The simulation. Owns the registry and all sim state.
pub struct Simulation {
    world: World,
    /// Ordered by id; iteration order is update order.
    index: BTreeMap<EntityId, Slot>,
    next_id: u64,
    config: SimConfig,
    rng: ChaCha8Rng,
    time: SimTime,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Create an empty simulation with the given config.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            world: World::new(),
            index: BTreeMap::new(),
            next_id: 0,
            config,
            rng,
            time: SimTime::default(),
            events: Vec::new(),
        })
    }

    /// Register an entity and return its id.
    pub fn add(&mut self, entity: impl Into<Entity>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let entity = entity.into();
        let kind = entity.kind();
        let handle = match entity {
            Entity::Robot(robot) => {
                let controller = robot.controller().kind();
                info!(%id, %controller, position = ?robot.position, "robot added");
                self.world.spawn((id, robot))
            }
            Entity::Target(target) => {
                info!(%id, position = ?target.position, "target added");
                self.world.spawn((id, target))
            }
        };
        self.index.insert(
            id,
            Slot {
                entity: handle,
                kind,
            },
        );

        if kind == EntityKind::Target && self.target_ids().count() > 1 {
            warn!(%id, "more than one target registered; robots chase the lowest id");
        }
        id
    }

    /// Remove an entity. Returns whether it was present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.index.remove(&id) else {
            return false;
        };
        if let Err(e) = self.world.despawn(slot.entity) {
            warn!(%id, error = %e, "entity missing from world on remove");
        }
        info!(%id, kind = ?slot.kind, "entity removed");
        true
    }

    /// Advance the simulation by one tick and return the resulting frame.
    ///
    /// Fails with `MissingTarget`, leaving all state untouched, when no
    /// target is registered. A `Registry` error can stop the tick partway;
    /// robots already stepped keep their motion, their events are dropped
    /// and the clock does not advance.
    pub fn tick(&mut self) -> SimResult<RenderFrame> {
        let target_id = self.primary_target().ok_or(SimError::MissingTarget)?;
        let rule = self.config.proximity_rule();

        if let Err(e) = systems::pursuit::run(
            &self.world,
            &self.index,
            target_id,
            &rule,
            &mut self.rng,
            &mut self.events,
        ) {
            warn!(error = %e, tick = self.time.tick, "tick aborted");
            self.events.clear();
            return Err(e);
        }
        self.time.advance();
        trace!(tick = self.time.tick, events = self.events.len(), "tick complete");

        let events = std::mem::take(&mut self.events);
        Ok(systems::snapshot::build_frame(
            &self.world,
            &self.index,
            self.time,
            events,
        ))
    }

    /// Frame of the current state without advancing. Read-only.
    pub fn snapshot(&self) -> RenderFrame {
        systems::snapshot::build_frame(&self.world, &self.index, self.time, Vec::new())
    }

    /// Lowest-id target, the one every robot chases.
    pub fn primary_target(&self) -> Option<EntityId> {
        self.target_ids().next()
    }

    /// All registered ids in update order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.index.keys().copied()
    }

    /// Copy of the robot registered under `id`.
    pub fn robot(&self, id: EntityId) -> Option<Robot> {
        let slot = self.index.get(&id)?;
        self.world
            .get::<&Robot>(slot.entity)
            .ok()
            .map(|robot| (*robot).clone())
    }

    /// Copy of the target registered under `id`.
    pub fn target(&self, id: EntityId) -> Option<Target> {
        let slot = self.index.get(&id)?;
        self.world
            .get::<&Target>(slot.entity)
            .ok()
            .map(|target| (*target).clone())
    }

    /// Mutable access to a target, for scripted placement.
    pub fn target_mut(&mut self, id: EntityId) -> Option<hecs::RefMut<'_, Target>> {
        let slot = self.index.get(&id)?;
        self.world.get::<&mut Target>(slot.entity).ok()
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    fn target_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.index
            .iter()
            .filter(|(_, slot)| slot.kind == EntityKind::Target)
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pursuit_core::enums::ControllerKind;
    use pursuit_core::types::Vec2;

    fn robot(x: f64, y: f64, kind: ControllerKind) -> Robot {
        Robot::new(Vec2::new(x, y), Vec2::X, kind).unwrap()
    }

    #[test]
    fn test_aborted_tick_drops_partial_events() {
        let mut sim = Simulation::new(SimConfig::seeded(3)).unwrap();
        let target = sim.add(Target::new(Vec2::new(100.0, 100.0), 30.0).unwrap());
        let near = sim.add(robot(100.0, 120.0, ControllerKind::P));
        let broken = sim.add(robot(500.0, 500.0, ControllerKind::P));

        // Desync the world from the index behind the registry's back.
        let handle = sim.index[&broken].entity;
        sim.world.despawn(handle).unwrap();

        let err = sim.tick().unwrap_err();
        assert!(matches!(err, SimError::Registry(_)));
        assert!(sim.events.is_empty());
        assert_eq!(sim.time().tick, 0);
        assert_eq!(sim.target(target).unwrap().respawns, 1);

        // Remove still clears the index entry when the world has lost it.
        assert!(sim.remove(broken));
        assert_eq!(sim.world().len(), 2);

        let frame = sim.tick().unwrap();
        assert_eq!(frame.time.tick, 1);
        assert!(frame.events.iter().all(|e| matches!(
            e,
            SimEvent::TargetRespawned { robot, .. } if *robot == near
        )));
        assert!(frame.events.len() <= 1);
    }

    #[test]
    fn test_world_mirrors_index() {
        let mut sim = Simulation::new(SimConfig::seeded(3)).unwrap();
        let t = sim.add(Target::new(Vec2::ZERO, 30.0).unwrap());
        sim.add(robot(300.0, 0.0, ControllerKind::Pid));
        assert_eq!(sim.world().len() as usize, sim.len());

        sim.remove(t);
        assert_eq!(sim.world().len() as usize, sim.len());
        assert_eq!(sim.world().query::<&Target>().iter().count(), 0);
        assert_eq!(sim.world().query::<&Robot>().iter().count(), 1);
    }
}
