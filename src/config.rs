//! Planner configuration loaded at startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Point, Registry, DEPOT_MARKER};
use crate::solver::SolveOptions;

/// Default number of destinations per trip.
pub const DEFAULT_TRIP_SIZE: usize = 3;

/// Everything a [`crate::Planner`] needs, in the shape it is stored on disk.
///
/// ```json
/// {
///   "depot": { "x": 0, "y": 0 },
///   "k": 3,
///   "destinations": { "dock_a": { "x": 9, "y": 9 } },
///   "solver": { "strategy": "auto" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_depot")]
    pub depot: Point,
    /// Maximum destinations per trip.
    #[serde(default = "default_trip_size")]
    pub k: usize,
    pub destinations: Registry,
    #[serde(default)]
    pub solver: SolveOptions,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            depot: default_depot(),
            k: DEFAULT_TRIP_SIZE,
            destinations: Registry::default(),
            solver: SolveOptions::default(),
        }
    }
}

fn default_depot() -> Point {
    Point::new(0, 0)
}

fn default_trip_size() -> usize {
    DEFAULT_TRIP_SIZE
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destinations.contains(DEPOT_MARKER) {
            return Err(ConfigError::Invalid(format!(
                "destination id `{DEPOT_MARKER}` is reserved for the depot"
            )));
        }
        self.solver.validate()
    }
}
