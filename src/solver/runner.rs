use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{error, info, span, warn, Instrument, Level};

use super::{RouteSolver, SolverConfig};
use crate::distance::DistanceMatrix;
use crate::domain::solution::{normalize_depot_tour, route_from_order};
use crate::domain::types::{Branch, RouteOutcome};
use crate::error::{OptimizerError, Result};

/// Extra time granted to the blocking task beyond the solver's own time limit.
pub const GRACE_PERIOD: Duration = Duration::from_millis(500);

/// Raises the shared flag when dropped, so an abandoned request stops its search.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Run `solver` on a blocking worker, bounded by the configured time limit and by the
/// caller's own `request_timeout` when one is given. A request timeout shorter than the
/// time limit shrinks the search deadline to leave the worker a margin before the bound.
///
/// The returned outcome distinguishes an empty branch set from a search that produced no tour.
pub async fn solve_bounded(
    solver: Arc<dyn RouteSolver>,
    branches: &[Branch],
    dm: Arc<DistanceMatrix>,
    config: &SolverConfig,
    request_timeout: Option<Duration>,
) -> Result<RouteOutcome> {
    config.validate(branches.len())?;
    if branches.is_empty() {
        info!("No branches stored, nothing to route");
        return Ok(RouteOutcome::NoBranches);
    }

    let mut solver_config = config.clone();
    let mut bound = config.time_limit + GRACE_PERIOD;
    if let Some(request_timeout) = request_timeout {
        if request_timeout < bound {
            // the search must stop early enough to hand its tour back before the caller gives up
            let margin = GRACE_PERIOD.min(request_timeout / 4);
            solver_config.time_limit = solver_config
                .time_limit
                .min(request_timeout.saturating_sub(margin));
            bound = request_timeout;
        }
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(Arc::clone(&cancel));

    let solver_name = solver.name();
    let task_cancel = Arc::clone(&cancel);
    let task_dm = Arc::clone(&dm);
    let started = Instant::now();
    let handle = tokio::task::spawn_blocking(move || {
        solver.solve(&task_dm, &solver_config, &task_cancel)
    });

    let solve_span = span!(Level::INFO, "solve_bounded", solver = solver_name, branches = branches.len());
    let joined = timeout(bound, handle).instrument(solve_span).await;

    let order = match joined {
        Ok(Ok(Some(order))) => order,
        Ok(Ok(None)) => {
            warn!("{} found no tour within {:?}", solver_name, config.time_limit);
            return Ok(RouteOutcome::NoSolutionFound);
        }
        Ok(Err(join_err)) => {
            error!("{} task failed: {}", solver_name, join_err);
            return Err(OptimizerError::Join(join_err.to_string()));
        }
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            warn!("{} did not finish within {:?}, cancelled", solver_name, bound);
            return Ok(RouteOutcome::NoSolutionFound);
        }
    };

    let order = normalize_depot_tour(order, config.depot);
    if !is_full_tour(&order, branches.len()) {
        warn!("{} returned an incomplete tour {:?}", solver_name, order);
        return Ok(RouteOutcome::NoSolutionFound);
    }

    let route = route_from_order(branches, &order, &dm);
    info!(
        "{} route over {} branches: {:.2} km (closed) in {:?}",
        solver_name,
        route.len(),
        route.closed_km,
        started.elapsed()
    );
    Ok(RouteOutcome::Solved(route))
}

fn is_full_tour(order: &[usize], n: usize) -> bool {
    let mut seen = vec![false; n];
    order.len() == n
        && order
            .iter()
            .all(|&i| i < n && !std::mem::replace(&mut seen[i], true))
}
