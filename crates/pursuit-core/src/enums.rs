//! Enumeration types used throughout the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Feedback-control law a robot steers with. Fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControllerKind {
    /// Proportional only.
    #[default]
    P,
    /// Proportional plus previous-tick error.
    Pd,
    /// Proportional plus accumulated error.
    Pi,
    /// Proportional, previous-tick and accumulated error.
    Pid,
    /// PD with the previous-tick term divided by the nominal tick rate.
    PdSpecial,
}

impl ControllerKind {
    pub const ALL: [ControllerKind; 5] = [
        ControllerKind::P,
        ControllerKind::Pd,
        ControllerKind::Pi,
        ControllerKind::Pid,
        ControllerKind::PdSpecial,
    ];

    /// Name used in scenario files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ControllerKind::P => "p",
            ControllerKind::Pd => "pd",
            ControllerKind::Pi => "pi",
            ControllerKind::Pid => "pid",
            ControllerKind::PdSpecial => "pd-special",
        }
    }

    /// Whether the law reads the previous tick's errors.
    pub fn uses_previous_error(self) -> bool {
        matches!(
            self,
            ControllerKind::Pd | ControllerKind::Pid | ControllerKind::PdSpecial
        )
    }

    /// Whether the law accumulates error sums.
    pub fn uses_integral(self) -> bool {
        matches!(self, ControllerKind::Pi | ControllerKind::Pid)
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControllerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SimError::UnknownController(s.to_owned()))
    }
}

/// Kind of entity held by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Robot,
    Target,
}
