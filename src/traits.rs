//! Core seams of the planner.
//!
//! The metric and the search strategy are kept behind small traits so the
//! planner can be handed a different distance model or solver without
//! touching the selection or response code.

use crate::model::Point;

/// Provides a distance matrix for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[Point]) -> Vec<Vec<u64>>;
}

/// An ordering of stops together with the cost of walking it from the depot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    /// Stop indices in visiting order (0-based, depot excluded).
    pub order: Vec<usize>,
    /// Sum of matrix costs from the depot through every stop.
    pub cost: u64,
}

/// Finds an open path that starts at the depot and visits every stop once.
///
/// `matrix` is square with side `n + 1`: row and column 0 are the depot,
/// index `i + 1` is stop `i`.
///
/// Solvers must be `Send + Sync` so a planner can be shared across threads.
pub trait RouteSolver: Send + Sync {
    fn solve(&self, matrix: &[Vec<u64>]) -> Tour;

    /// Whether [`RouteSolver::solve`] always returns a minimum-cost tour.
    fn is_exact(&self) -> bool;
}

/// Cost of walking `order` starting from the depot.
pub fn tour_cost(matrix: &[Vec<u64>], order: &[usize]) -> u64 {
    let mut prev = 0;
    let mut total: u64 = 0;
    for &stop in order {
        total = total.saturating_add(matrix[prev][stop + 1]);
        prev = stop + 1;
    }
    total
}
