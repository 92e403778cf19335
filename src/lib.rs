//! depot-planner core
//!
//! Picks a handful of pending orders and routes them from a fixed depot
//! over a rectilinear grid.

pub mod config;
pub mod error;
pub mod manhattan;
pub mod model;
pub mod planner;
pub mod selector;
pub mod solver;
pub mod traits;

pub use config::PlannerConfig;
pub use error::{ConfigError, PlanError};
pub use model::{Optimality, PendingOrder, Point, Protocol, Registry, Route, Selection, DEPOT_MARKER};
pub use planner::{PlanRequest, PlanResponse, Planner};
pub use selector::select;
pub use solver::{optimize, SolveOptions, SolverStrategy};
