//! Populating a simulation from a scenario.

use tracing::info;

use pursuit_core::config::Scenario;
use pursuit_core::error::SimResult;
use pursuit_core::types::EntityId;

use crate::engine::Simulation;

/// Spawn every entity of `scenario`, in file order.
///
/// All specs are built before anything is added, so a bad spec leaves the
/// simulation unchanged.
pub fn spawn_scenario(sim: &mut Simulation, scenario: &Scenario) -> SimResult<Vec<EntityId>> {
    let entities = scenario.build_entities()?;
    let ids: Vec<EntityId> = entities.into_iter().map(|entity| sim.add(entity)).collect();
    info!(count = ids.len(), "scenario spawned");
    Ok(ids)
}

impl Simulation {
    /// Build a simulation from a scenario's config and entities.
    pub fn from_scenario(scenario: &Scenario) -> SimResult<Self> {
        let mut sim = Simulation::new(scenario.sim.clone())?;
        spawn_scenario(&mut sim, scenario)?;
        Ok(sim)
    }
}
