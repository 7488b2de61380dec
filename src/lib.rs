pub mod app;
pub mod config;
pub mod database;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod optimizer;
pub mod report;
pub mod solver;
pub mod utils;

pub use distance::DistanceMatrix;
pub use domain::types::{Branch, NewBranch, Route, RouteComparison, RouteOutcome};
pub use error::{OptimizerError, Result};
pub use optimizer::{optimize_routes, optimize_routes_with, optimize_stored_routes};
pub use solver::{greedy_route, RouteSolver, SolverConfig, TabuSearchSolver};
