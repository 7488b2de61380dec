use std::sync::atomic::AtomicBool;
use std::time::Duration;

use serde::Serialize;

use crate::config::constant;
use crate::distance::DistanceMatrix;
use crate::error::{OptimizerError, Result};

pub mod greedy;
pub mod runner;
pub mod tabu_search;

pub use greedy::greedy_route;
pub use runner::solve_bounded;
pub use tabu_search::TabuSearchSolver;

/// Parameters of one solver invocation. Passed explicitly into every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverConfig {
    pub vehicles: usize,
    pub depot: usize,
    pub time_limit: Duration,
    pub max_iterations: usize,
    pub seed: u64,
    pub tabu_len: usize,
    pub tabu_lower_bound_len: usize,
    pub tabu_upper_bound_len: usize,
    /// Tabu moves landing within this many km of the best tour are still allowed.
    pub aspiration_threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            vehicles: constant::VEHICLES,
            depot: constant::DEPOT,
            time_limit: Duration::from_secs(constant::TIME_LIMIT_SECS),
            max_iterations: constant::MAX_ITERATIONS,
            seed: constant::SEED,
            tabu_len: constant::TABU_LEN,
            tabu_lower_bound_len: constant::TABU_LOWER_BOUND_LEN,
            tabu_upper_bound_len: constant::TABU_UPPER_BOUND_LEN,
            aspiration_threshold: constant::ASPIRATION_THRESHOLD,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the configuration against a problem of `size` branches.
    pub fn validate(&self, size: usize) -> Result<()> {
        if self.vehicles != 1 {
            return Err(OptimizerError::UnsupportedVehicleCount(self.vehicles));
        }
        if size > 0 && self.depot >= size {
            return Err(OptimizerError::DepotOutOfRange {
                depot: self.depot,
                size,
            });
        }
        Ok(())
    }
}

/// A routing backend that turns a distance matrix into a closed single-vehicle tour.
pub trait RouteSolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the visiting order as matrix indices, starting at `config.depot` with the
    /// return to the depot implied. `None` means no tour was found within the budget.
    /// Implementations must return promptly once `cancel` is set.
    fn solve(
        &self,
        dm: &DistanceMatrix,
        config: &SolverConfig,
        cancel: &AtomicBool,
    ) -> Option<Vec<usize>>;
}
