//! Planning service: selection followed by routing, per request.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::error::{ConfigError, PlanError};
use crate::model::{Optimality, PendingOrder, Point, Registry, Route, Selection};
use crate::selector::select;
use crate::solver::{optimize, SolveOptions};

/// Orders currently waiting at the depot, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub orders: Vec<PendingOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Destinations chosen for this trip, high priority first.
    pub destinations: Vec<String>,
    pub route: Route,
    /// Human-readable summary of the policy that was applied.
    pub notes: String,
    /// Unknown destination ids that were ignored.
    pub dropped: Vec<String>,
}

/// Plans trips against one registry and depot.
///
/// A planner holds no per-request state, so one instance can serve any
/// number of concurrent callers. To reload configuration, build a new
/// planner and swap it in between requests.
#[derive(Debug, Clone)]
pub struct Planner {
    registry: Registry,
    depot: Point,
    k: usize,
    options: SolveOptions,
}

impl Planner {
    pub fn new(registry: Registry, depot: Point, k: usize) -> Self {
        Self {
            registry,
            depot,
            k,
            options: SolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_config(config: PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.destinations, config.depot, config.k).with_options(config.solver))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn depot(&self) -> Point {
        self.depot
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn select<R>(&self, orders: &[PendingOrder], rng: &mut R) -> Selection
    where
        R: Rng + ?Sized,
    {
        select(orders, self.k, &self.registry, rng)
    }

    pub fn optimize(&self, destinations: &[String]) -> Result<Route, PlanError> {
        optimize(destinations, &self.registry, self.depot, &self.options)
    }

    /// Select destinations for `request` and route them.
    ///
    /// `rng` only drives the low priority fill; pass a seeded generator to
    /// make the result reproducible.
    pub fn plan<R>(&self, request: &PlanRequest, rng: &mut R) -> Result<PlanResponse, PlanError>
    where
        R: Rng + ?Sized,
    {
        let selection = self.select(&request.orders, rng);
        let route = self.optimize(&selection.destinations)?;
        let notes = summarize(&route, selection.dropped.len());

        debug!(
            orders = request.orders.len(),
            selected = selection.destinations.len(),
            dropped = selection.dropped.len(),
            distance = route.distance,
            "planned trip"
        );

        Ok(PlanResponse {
            destinations: selection.destinations,
            route,
            notes,
            dropped: selection.dropped,
        })
    }

    /// [`Planner::plan`] with a freshly seeded generator.
    pub fn plan_with_entropy(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError> {
        self.plan(request, &mut StdRng::from_entropy())
    }

    /// Plan independent requests in parallel.
    ///
    /// Each request gets its own generator: seeded with `seed + index` when a
    /// seed is given, from entropy otherwise. Results keep request order.
    pub fn plan_batch(
        &self,
        requests: &[PlanRequest],
        seed: Option<u64>,
    ) -> Vec<Result<PlanResponse, PlanError>> {
        requests
            .par_iter()
            .enumerate()
            .map(|(index, request)| {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
                    None => StdRng::from_entropy(),
                };
                self.plan(request, &mut rng)
            })
            .collect()
    }
}

fn summarize(route: &Route, dropped: usize) -> String {
    let mut notes = String::from(
        "protocol_1 destinations were placed first; remaining slots were filled \
         at random from protocol_2. No destination repeats within the trip. ",
    );
    notes.push_str(match route.optimality {
        Optimality::Exact => "Route minimizes rectilinear distance by exact search.",
        Optimality::Approximate => {
            "Route uses rectilinear distance with a nearest-neighbour and 2-opt heuristic; it may not be minimal."
        }
    });
    if dropped > 0 {
        notes.push_str(&format!(" Ignored {dropped} unknown destination(s)."));
    }
    notes
}
