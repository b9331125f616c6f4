//! Simulation and scenario configuration.
//!
//! Scenarios are TOML files:
//!
//! ```toml
//! [sim]
//! seed = 7
//! tick_interval_ms = 20
//!
//! [sim.arena]
//! width = 1000.0
//! height = 1000.0
//!
//! [[entities]]
//! kind = "target"
//! position = [65.0, 65.0]
//!
//! [[entities]]
//! kind = "robot"
//! position = [125.0, 225.0]
//! heading = [1.0, 0.0]
//! controller = "pid"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::components::{Arena, Entity, Robot, Target};
use crate::constants::*;
use crate::controller::Gains;
use crate::enums::ControllerKind;
use crate::error::{SimError, SimResult};
use crate::proximity::ProximityRule;
use crate::types::{Rgb, Vec2};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed, same run. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub arena: Arena,
    /// Wall-clock delay between ticks when driven by a loop.
    pub tick_interval_ms: u64,
    /// Distance below which a robot triggers a target respawn.
    pub proximity_threshold: f64,
    /// Bound on PI/PID error sums. Unbounded when absent.
    pub integral_limit: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            arena: Arena::default(),
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
            proximity_threshold: PROXIMITY_THRESHOLD,
            integral_limit: None,
        }
    }
}

impl SimConfig {
    /// Deterministic config for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        self.arena.validate()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn proximity_rule(&self) -> ProximityRule {
        ProximityRule {
            threshold: self.proximity_threshold,
            arena: self.arena,
        }
    }
}

/// A complete scenario: run configuration plus the entities to spawn, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> SimResult<Self> {
        let scenario: Scenario = toml::from_str(source)?;
        scenario.sim.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SimError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Build every entity, failing on the first bad spec.
    pub fn build_entities(&self) -> SimResult<Vec<Entity>> {
        self.entities
            .iter()
            .map(|spec| spec.build(&self.sim))
            .collect()
    }
}

impl Default for Scenario {
    /// Five robots, one per controller, chasing a single target.
    fn default() -> Self {
        let robot = |x: f64, y: f64, controller: ControllerKind, heading: [f64; 2], color: Rgb| {
            EntitySpec::Robot(RobotSpec {
                position: Vec2::new(x, y),
                heading: Vec2::from_array(heading),
                controller: controller.name().to_owned(),
                color: Some(color),
                ..Default::default()
            })
        };

        Self {
            sim: SimConfig::default(),
            entities: vec![
                robot(125.0, 225.0, ControllerKind::P, [1.0, 0.0], Rgb(0, 0, 255)),
                robot(375.0, 325.0, ControllerKind::Pd, [-1.0, 0.0], Rgb(0, 255, 0)),
                robot(525.0, 924.0, ControllerKind::Pid, [3.0, 2.0], Rgb(255, 0, 222)),
                robot(225.0, 275.0, ControllerKind::Pi, [0.0, -1.0], Rgb(255, 0, 0)),
                robot(75.0, 75.0, ControllerKind::PdSpecial, [0.0, 1.0], Rgb::WHITE),
                EntitySpec::Target(TargetSpec {
                    position: Vec2::new(65.0, 65.0),
                    ..Default::default()
                }),
            ],
        }
    }
}

/// One entity in a scenario file, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EntitySpec {
    Robot(RobotSpec),
    Target(TargetSpec),
}

impl EntitySpec {
    pub fn build(&self, config: &SimConfig) -> SimResult<Entity> {
        match self {
            EntitySpec::Robot(spec) => spec.build(config).map(Entity::Robot),
            EntitySpec::Target(spec) => spec.build().map(Entity::Target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSpec {
    pub position: Vec2,
    pub heading: Vec2,
    /// Controller name: p, pd, pi, pid or pd-special.
    pub controller: String,
    pub color: Option<Rgb>,
    pub gains: Option<Gains>,
    pub max_velocity: Option<f64>,
}

impl Default for RobotSpec {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: Vec2::X,
            controller: ControllerKind::P.name().to_owned(),
            color: None,
            gains: None,
            max_velocity: None,
        }
    }
}

impl RobotSpec {
    pub fn build(&self, config: &SimConfig) -> SimResult<Robot> {
        let kind: ControllerKind = self.controller.parse()?;
        let mut robot = Robot::new(self.position, self.heading, kind)?
            .with_gains(self.gains.unwrap_or_default())
            .with_integral_limit(config.integral_limit);
        if let Some(color) = self.color {
            robot = robot.with_color(color);
        }
        if let Some(max_velocity) = self.max_velocity {
            robot = robot.with_max_velocity(max_velocity);
        }
        Ok(robot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSpec {
    pub position: Vec2,
    pub size: f64,
    pub color: Option<Rgb>,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: TARGET_SIZE,
            color: None,
        }
    }
}

impl TargetSpec {
    pub fn build(&self) -> SimResult<Target> {
        let target = Target::new(self.position, self.size)?;
        Ok(match self.color {
            Some(color) => target.with_color(color),
            None => target,
        })
    }
}
