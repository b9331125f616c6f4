//! Error taxonomy for construction, configuration and ticking.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown controller '{0}' (expected one of p, pd, pi, pid, pd-special)")]
    UnknownController(String),

    #[error("robot heading must be a non-zero, finite vector")]
    DegenerateHeading,

    #[error("invalid arena dimensions {width}x{height}")]
    InvalidArena { width: f64, height: f64 },

    #[error("invalid entity size {0}")]
    InvalidSize(f64),

    #[error("no target registered; robots have nothing to steer toward")]
    MissingTarget,

    #[error("registry lookup failed: {0}")]
    Registry(String),

    #[error("failed to read scenario '{path}'")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario")]
    ScenarioParse(#[from] toml::de::Error),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
