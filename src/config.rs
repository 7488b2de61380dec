use std::env;
use std::time::Duration;

use dotenv::dotenv;
use tracing::{info, warn};

use crate::solver::SolverConfig;

pub mod constant {
    pub(crate) const TIME_LIMIT_SECS: u64 = 10;
    pub(crate) const MAX_ITERATIONS: usize = 20_000;
    pub(crate) const VEHICLES: usize = 1;
    pub(crate) const DEPOT: usize = 0;
    pub(crate) const SEED: u64 = 12345;
    pub(crate) const TABU_LEN: usize = 20;
    pub(crate) const TABU_LOWER_BOUND_LEN: usize = 11;
    pub(crate) const TABU_UPPER_BOUND_LEN: usize = 29;
    pub(crate) const ASPIRATION_THRESHOLD: f64 = 0.5;
    pub(crate) const DATABASE_URL: &str = "sqlite:branch_routes.sqlite";
    pub(crate) const ROUTE_CSV_PATH: &str = "routes.csv";
}

/// Runtime settings for the `route-optimizer` binary, read from `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub branch_csv_path: Option<String>,
    pub route_csv_path: String,
    pub print_json: bool,
    pub solver: SolverConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            warn!("DATABASE_URL not set, using default SQLite file");
            constant::DATABASE_URL.to_string()
        });

        let mut solver = SolverConfig::default();
        if let Some(secs) = parse_var::<u64>("SOLVER_TIME_LIMIT_SECS") {
            solver.time_limit = Duration::from_secs(secs);
        }
        if let Some(iterations) = parse_var::<usize>("SOLVER_MAX_ITERATIONS") {
            solver.max_iterations = iterations;
        }
        if let Some(seed) = parse_var::<u64>("SOLVER_SEED") {
            solver.seed = seed;
        }

        let config = Self {
            database_url,
            branch_csv_path: env::var("BRANCH_CSV_PATH").ok().filter(|p| !p.trim().is_empty()),
            route_csv_path: env::var("ROUTE_CSV_PATH")
                .unwrap_or_else(|_| constant::ROUTE_CSV_PATH.to_string()),
            print_json: env::var("ROUTE_JSON")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            solver,
        };

        info!(
            "Loaded config: time limit {:?}, max iterations {}, seed {}",
            config.solver.time_limit, config.solver.max_iterations, config.solver.seed
        );
        config
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}
