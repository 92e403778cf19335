//! Packing floor layout used across integration tests.
//!
//! Every packing line has one dock per protocol, stacked along x = 9 with
//! the depot at the origin.

#![allow(dead_code)]

use depot_planner::{PendingOrder, Planner, Point, Registry};

/// A named dock with grid coordinates.
#[derive(Debug, Clone)]
pub struct Dock {
    pub name: &'static str,
    pub x: i64,
    pub y: i64,
}

impl Dock {
    pub const fn new(name: &'static str, x: i64, y: i64) -> Self {
        Self { name, x, y }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

pub const DEPOT: Point = Point::new(0, 0);

pub const DOCKS: &[Dock] = &[
    Dock::new("line_a_p1", 9, 9),
    Dock::new("line_a_p2", 9, 8),
    Dock::new("line_b_p1", 9, 7),
    Dock::new("line_b_p2", 9, 6),
    Dock::new("line_c_p1", 9, 5),
    Dock::new("line_c_p2", 9, 4),
];

pub fn floor_registry() -> Registry {
    DOCKS.iter().map(|dock| (dock.name, dock.point())).collect()
}

pub fn floor_planner() -> Planner {
    Planner::new(floor_registry(), DEPOT, 3)
}

/// The three-destination registry from the planning walkthrough.
pub fn abc_registry() -> Registry {
    [("A", (9, 9)), ("B", (9, 7)), ("C", (9, 5))].into_iter().collect()
}

pub fn high(id: &str) -> PendingOrder {
    PendingOrder::high(id)
}

pub fn low(id: &str) -> PendingOrder {
    PendingOrder::low(id)
}

/// Sum of rectilinear legs along `stops`, starting at `depot`.
pub fn walk_distance(registry: &Registry, depot: Point, stops: &[String]) -> u64 {
    let mut prev = depot;
    let mut total = 0;
    for id in stops {
        let next = registry.get(id).expect("stop must be registered");
        total += prev.x.abs_diff(next.x) + prev.y.abs_diff(next.y);
        prev = next;
    }
    total
}

/// Minimum walk over every ordering of `stops`, computed independently of
/// the solvers under test.
pub fn reference_minimum(registry: &Registry, depot: Point, stops: &[String]) -> u64 {
    fn search(
        registry: &Registry,
        at: Point,
        remaining: &mut Vec<String>,
        so_far: u64,
        best: &mut u64,
    ) {
        if remaining.is_empty() {
            *best = (*best).min(so_far);
            return;
        }
        for i in 0..remaining.len() {
            let id = remaining.remove(i);
            let next = registry.get(&id).expect("stop must be registered");
            let leg = at.x.abs_diff(next.x) + at.y.abs_diff(next.y);
            search(registry, next, remaining, so_far + leg, best);
            remaining.insert(i, id);
        }
    }

    let mut best = u64::MAX;
    search(registry, depot, &mut stops.to_vec(), 0, &mut best);
    best
}
