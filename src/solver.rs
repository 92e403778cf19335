//! Route optimizer: orders the selected destinations from the depot.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, PlanError};
use crate::manhattan::ManhattanMatrix;
use crate::model::{Optimality, Point, Registry, Route, DEPOT_MARKER};
use crate::traits::{tour_cost, DistanceMatrixProvider, RouteSolver, Tour};

/// Largest stop count Held-Karp is allowed to run on.
///
/// The table holds `2^n * n` costs, which is about 38 MB at 18 stops.
pub const HELD_KARP_MAX_STOPS: usize = 18;

/// Largest stop count the exhaustive search may be configured for.
pub const EXHAUSTIVE_MAX_STOPS: usize = 10;

/// Which search the optimizer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStrategy {
    /// Pick by stop count using the limits in [`SolveOptions`].
    #[default]
    Auto,
    BruteForce,
    HeldKarp,
    NearestNeighbor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    pub strategy: SolverStrategy,
    /// Largest stop count searched exhaustively under [`SolverStrategy::Auto`].
    pub exhaustive_limit: usize,
    /// Largest stop count solved exactly under [`SolverStrategy::Auto`];
    /// above it the heuristic takes over.
    pub exact_limit: usize,
    /// Maximum 2-opt passes for the heuristic.
    pub local_search_iterations: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            strategy: SolverStrategy::Auto,
            exhaustive_limit: 8,
            exact_limit: 16,
            local_search_iterations: 100,
        }
    }
}

impl SolveOptions {
    /// Check that the limits are consistent with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exhaustive_limit > EXHAUSTIVE_MAX_STOPS {
            return Err(ConfigError::Invalid(format!(
                "exhaustive_limit ({}) exceeds the exhaustive search limit of {} stops",
                self.exhaustive_limit, EXHAUSTIVE_MAX_STOPS
            )));
        }
        if self.exhaustive_limit > self.exact_limit {
            return Err(ConfigError::Invalid(format!(
                "exhaustive_limit ({}) must not exceed exact_limit ({})",
                self.exhaustive_limit, self.exact_limit
            )));
        }
        if self.exact_limit > HELD_KARP_MAX_STOPS {
            return Err(ConfigError::Invalid(format!(
                "exact_limit ({}) exceeds the Held-Karp limit of {} stops",
                self.exact_limit, HELD_KARP_MAX_STOPS
            )));
        }
        Ok(())
    }

    /// Solver to use for a trip with `stops` destinations.
    pub fn solver_for(&self, stops: usize) -> Box<dyn RouteSolver> {
        match self.strategy {
            SolverStrategy::BruteForce => Box::new(BruteForce),
            SolverStrategy::HeldKarp if stops <= HELD_KARP_MAX_STOPS => Box::new(HeldKarp),
            SolverStrategy::HeldKarp => {
                warn!(
                    stops,
                    limit = HELD_KARP_MAX_STOPS,
                    "too many stops for Held-Karp, falling back to approximate routing"
                );
                Box::new(self.heuristic())
            }
            SolverStrategy::NearestNeighbor => Box::new(self.heuristic()),
            SolverStrategy::Auto if stops <= self.exhaustive_limit => Box::new(BruteForce),
            SolverStrategy::Auto if stops <= self.exact_limit.min(HELD_KARP_MAX_STOPS) => {
                Box::new(HeldKarp)
            }
            SolverStrategy::Auto => Box::new(self.heuristic()),
        }
    }

    fn heuristic(&self) -> NearestNeighbor {
        NearestNeighbor {
            local_search_iterations: self.local_search_iterations,
        }
    }
}

/// Route `destinations` from `depot` with rectilinear distances.
///
/// Every id must be present in `registry`; an unknown id is a caller bug
/// and yields [`PlanError::UnknownDestination`].
pub fn optimize(
    destinations: &[String],
    registry: &Registry,
    depot: Point,
    options: &SolveOptions,
) -> Result<Route, PlanError> {
    optimize_with(destinations, registry, depot, options, &ManhattanMatrix)
}

/// Like [`optimize`], with a caller-supplied distance model.
pub fn optimize_with<M>(
    destinations: &[String],
    registry: &Registry,
    depot: Point,
    options: &SolveOptions,
    metric: &M,
) -> Result<Route, PlanError>
where
    M: DistanceMatrixProvider,
{
    let mut locations = Vec::with_capacity(destinations.len() + 1);
    locations.push(depot);
    for id in destinations {
        let point = registry
            .get(id)
            .ok_or_else(|| PlanError::UnknownDestination { id: id.clone() })?;
        locations.push(point);
    }

    if destinations.is_empty() {
        return Ok(Route::depot_only());
    }

    let matrix = metric.matrix_for(&locations);
    let solver = options.solver_for(destinations.len());
    let tour = solver.solve(&matrix);

    debug!(
        stops = destinations.len(),
        exact = solver.is_exact(),
        distance = tour.cost,
        "optimized route"
    );

    let mut sequence = Vec::with_capacity(destinations.len() + 1);
    sequence.push(DEPOT_MARKER.to_string());
    sequence.extend(tour.order.iter().map(|&i| destinations[i].clone()));

    Ok(Route {
        sequence,
        distance: tour.cost,
        optimality: if solver.is_exact() {
            Optimality::Exact
        } else {
            Optimality::Approximate
        },
    })
}

fn stop_count(matrix: &[Vec<u64>]) -> usize {
    matrix.len().saturating_sub(1)
}

// ============================================================================
// Exhaustive search
// ============================================================================

/// Tries every ordering of the stops.
///
/// Orderings are enumerated lexicographically over input positions, starting
/// from the input order itself. The first ordering reaching the minimum wins,
/// so among equal-cost routes the lexicographically smallest index sequence is
/// returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl RouteSolver for BruteForce {
    fn solve(&self, matrix: &[Vec<u64>]) -> Tour {
        let mut order: Vec<usize> = (0..stop_count(matrix)).collect();
        let mut best = Tour {
            cost: tour_cost(matrix, &order),
            order: order.clone(),
        };

        while next_permutation(&mut order) {
            let cost = tour_cost(matrix, &order);
            if cost < best.cost {
                best.cost = cost;
                best.order.copy_from_slice(&order);
            }
        }

        best
    }

    fn is_exact(&self) -> bool {
        true
    }
}

/// Advance `items` to the next lexicographic permutation.
///
/// Returns `false` once the last permutation has been reached.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(swap) = items.iter().rposition(|&v| v > items[pivot]) else {
        return false;
    };
    items.swap(pivot, swap);
    items[pivot + 1..].reverse();
    true
}

// ============================================================================
// Held-Karp dynamic programming
// ============================================================================

/// Exact O(n² · 2ⁿ) search.
///
/// The table stores, for every set of unvisited stops and every current stop,
/// the cheapest way to finish. Reconstruction walks forward from the depot and
/// always takes the smallest stop index that still completes an optimal
/// route, which gives the same answer as [`BruteForce`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldKarp;

impl RouteSolver for HeldKarp {
    fn solve(&self, matrix: &[Vec<u64>]) -> Tour {
        let n = stop_count(matrix);
        if n == 0 {
            return Tour {
                order: Vec::new(),
                cost: 0,
            };
        }

        let full = (1usize << n) - 1;
        // finish[mask * n + j]: cheapest path starting at stop j through every stop in mask.
        let mut finish = vec![u64::MAX; (full + 1) * n];
        finish[..n].fill(0);
        for mask in 1..=full {
            for j in (0..n).filter(|&j| mask & (1usize << j) == 0) {
                let mut best = u64::MAX;
                for i in (0..n).filter(|&i| mask & (1usize << i) != 0) {
                    let rest = mask ^ (1usize << i);
                    let cost = matrix[j + 1][i + 1].saturating_add(finish[rest * n + i]);
                    if cost < best {
                        best = cost;
                    }
                }
                finish[mask * n + j] = best;
            }
        }

        let mut order = Vec::with_capacity(n);
        let mut remaining = full;
        let mut current = 0;
        let mut total: u64 = 0;
        while remaining != 0 {
            let mut choice: Option<(usize, u64)> = None;
            for i in (0..n).filter(|&i| remaining & (1usize << i) != 0) {
                let rest = remaining ^ (1usize << i);
                let cost = matrix[current][i + 1].saturating_add(finish[rest * n + i]);
                if choice.is_none_or(|(_, best)| cost < best) {
                    choice = Some((i, cost));
                }
            }
            let Some((next, _)) = choice else {
                break;
            };
            total = total.saturating_add(matrix[current][next + 1]);
            order.push(next);
            remaining ^= 1usize << next;
            current = next + 1;
        }

        Tour { order, cost: total }
    }

    fn is_exact(&self) -> bool {
        true
    }
}

// ============================================================================
// Heuristic
// ============================================================================

/// Nearest-neighbour construction followed by 2-opt improvement.
///
/// Fast on any stop count but not guaranteed optimal.
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighbor {
    pub local_search_iterations: usize,
}

impl Default for NearestNeighbor {
    fn default() -> Self {
        Self {
            local_search_iterations: SolveOptions::default().local_search_iterations,
        }
    }
}

impl RouteSolver for NearestNeighbor {
    fn solve(&self, matrix: &[Vec<u64>]) -> Tour {
        let n = stop_count(matrix);
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut current = 0;

        for _ in 0..n {
            let mut best: Option<(usize, u64)> = None;
            for j in (0..n).filter(|&j| !visited[j]) {
                let cost = matrix[current][j + 1];
                if best.is_none_or(|(_, c)| cost < c) {
                    best = Some((j, cost));
                }
            }
            let Some((next, _)) = best else {
                break;
            };
            visited[next] = true;
            order.push(next);
            current = next + 1;
        }

        let mut cost = tour_cost(matrix, &order);
        for _ in 0..self.local_search_iterations {
            if !two_opt_improve(matrix, &mut order, &mut cost) {
                break;
            }
        }

        Tour { order, cost }
    }

    fn is_exact(&self) -> bool {
        false
    }
}

/// 2-opt: Reverse a segment of the path to reduce its cost.
/// Returns true if an improvement was made.
fn two_opt_improve(matrix: &[Vec<u64>], order: &mut [usize], cost: &mut u64) -> bool {
    let n = order.len();
    if n < 2 {
        return false;
    }

    for i in 0..n - 1 {
        for j in i + 1..n {
            order[i..=j].reverse();
            let candidate = tour_cost(matrix, order);
            if candidate < *cost {
                *cost = candidate;
                return true;
            }
            order[i..=j].reverse();
        }
    }

    false
}
