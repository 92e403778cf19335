//! Test fixtures for depot-planner.
//!
//! Provides a small packing-floor layout with two docks per packing line
//! and helpers to turn it into a registry or planner.

pub mod packing_floor;

pub use packing_floor::*;
