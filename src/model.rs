//! Planning data model: grid points, the destination registry, orders,
//! selections and routes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sequence entry that stands for the depot at the head of every route.
pub const DEPOT_MARKER: &str = "DEPOT";

/// A position on the unbounded integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// Read-only mapping from destination identifier to grid position.
///
/// Built once and shared by reference; nothing in the crate mutates a
/// registry after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    locations: HashMap<String, Point>,
}

impl Registry {
    pub fn new(locations: HashMap<String, Point>) -> Self {
        Self { locations }
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.locations.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, Point)> for Registry {
    fn from_iter<I: IntoIterator<Item = (S, Point)>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().map(|(id, point)| (id.into(), point)).collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, (i64, i64))> for Registry {
    fn from_iter<I: IntoIterator<Item = (S, (i64, i64))>>(iter: I) -> Self {
        iter.into_iter().map(|(id, xy)| (id, Point::from(xy))).collect()
    }
}

/// Priority class of a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// High priority: always placed before any low priority order.
    #[serde(rename = "protocol_1")]
    Protocol1,
    /// Low priority: fills whatever slots remain.
    #[serde(rename = "protocol_2")]
    Protocol2,
}

/// An order waiting at the depot for a trip to its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub destination_id: String,
    pub protocol: Protocol,
}

impl PendingOrder {
    pub fn new(destination_id: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            destination_id: destination_id.into(),
            protocol,
        }
    }

    pub fn high(destination_id: impl Into<String>) -> Self {
        Self::new(destination_id, Protocol::Protocol1)
    }

    pub fn low(destination_id: impl Into<String>) -> Self {
        Self::new(destination_id, Protocol::Protocol2)
    }
}

/// Destinations chosen for a single trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// At most `k` unique registry ids, high priority first.
    pub destinations: Vec<String>,
    /// Distinct ids that were discarded because the registry does not know them.
    pub dropped: Vec<String>,
}

/// Whether a route is guaranteed to be minimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimality {
    Exact,
    Approximate,
}

/// Depot-prefixed visiting order with its total rectilinear distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub sequence: Vec<String>,
    pub distance: u64,
    pub optimality: Optimality,
}

impl Route {
    /// The route of an empty trip: just the depot.
    pub fn depot_only() -> Self {
        Self {
            sequence: vec![DEPOT_MARKER.to_string()],
            distance: 0,
            optimality: Optimality::Exact,
        }
    }

    /// Visited destinations, without the depot marker.
    pub fn stops(&self) -> &[String] {
        self.sequence.get(1..).unwrap_or(&[])
    }
}
