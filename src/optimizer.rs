use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, span, Instrument, Level};

use crate::database::branches::list_branches;
use crate::distance::DistanceMatrix;
use crate::domain::types::{Branch, RouteComparison};
use crate::error::{OptimizerError, Result};
use crate::solver::{greedy_route, solve_bounded, RouteSolver, SolverConfig, TabuSearchSolver};

/// Compute the solver route and the greedy route for `branches`, independently and side by side.
pub async fn optimize_routes(branches: Vec<Branch>, config: &SolverConfig) -> Result<RouteComparison> {
    optimize_routes_with(Arc::new(TabuSearchSolver), branches, config, None).await
}

/// As [`optimize_routes`], with an explicit solver backend and an optional request timeout.
pub async fn optimize_routes_with(
    solver: Arc<dyn RouteSolver>,
    branches: Vec<Branch>,
    config: &SolverConfig,
    request_timeout: Option<Duration>,
) -> Result<RouteComparison> {
    if let Some(bad) = branches.iter().find(|b| !b.has_valid_coordinates()) {
        return Err(OptimizerError::InvalidCoordinates {
            name: bad.name.clone(),
            latitude: bad.latitude,
            longitude: bad.longitude,
        });
    }
    config.validate(branches.len())?;

    let branch_count = branches.len();
    info!("Optimizing routes over {} branches", branch_count);

    let dm = Arc::new(DistanceMatrix::from_branches(&branches));
    dm.log_rows();

    let branches = Arc::new(branches);
    let greedy_branches = Arc::clone(&branches);
    let greedy_task = tokio::task::spawn_blocking(move || greedy_route(&greedy_branches));
    let solver_task = solve_bounded(solver, &branches, dm, config, request_timeout);

    let (greedy, solver) = futures::join!(
        greedy_task,
        solver_task.instrument(span!(Level::INFO, "solver_route"))
    );
    let greedy = greedy.map_err(|e| OptimizerError::Join(e.to_string()))?;
    let solver = solver?;

    Ok(RouteComparison {
        branch_count,
        solver,
        greedy,
        computed_at: Utc::now(),
    })
}

/// Load every stored branch, ordered by id, and optimize over them.
pub async fn optimize_stored_routes(pool: &SqlitePool, config: &SolverConfig) -> Result<RouteComparison> {
    let branches = list_branches(pool).await?;
    optimize_routes(branches, config).await
}
