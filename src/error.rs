//! Error types for planning and configuration.

use std::io;

use thiserror::Error;

/// Errors returned while routing a selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A destination handed to the optimizer is not in the registry.
    ///
    /// The selector never produces such ids, so this signals a broken
    /// contract between callers rather than bad upstream data.
    #[error("destination `{id}` is not in the registry")]
    UnknownDestination { id: String },
}

/// Errors returned while loading a [`crate::PlannerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read planner config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse planner config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid planner config: {0}")]
    Invalid(String),
}
