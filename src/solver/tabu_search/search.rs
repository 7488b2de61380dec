use std::cmp::max;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, span, trace, warn, Level};

use super::diversification::{final_mutation, perform_rollback};
use super::neighborhood::find_neighbours;
use super::state::{SearchState, Tour};
use super::tabu::{choose_best_candidate, insert_and_adjust_tabu_list};
use crate::distance::DistanceMatrix;
use crate::evaluation::fitness::find_fitness;
use crate::solver::greedy::nearest_neighbour_order;
use crate::solver::{RouteSolver, SolverConfig};
use crate::utils::{steer_towards_best, temperature};

/// Single-vehicle tour search: cheapest-arc construction from the depot, then tabu search
/// over swap and 2-opt moves until the time limit, iteration cap, stagnation or cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabuSearchSolver;

impl RouteSolver for TabuSearchSolver {
    fn name(&self) -> &'static str {
        "tabu-search"
    }

    fn solve(
        &self,
        dm: &DistanceMatrix,
        config: &SolverConfig,
        cancel: &AtomicBool,
    ) -> Option<Vec<usize>> {
        let started = Instant::now();
        let n = dm.size();

        if n == 0 || config.depot >= n {
            return None;
        }
        if !dm.is_finite() {
            warn!("Distance matrix contains non-finite costs, no tour can be built");
            return None;
        }
        if cancel.load(Ordering::Relaxed) || started.elapsed() >= config.time_limit {
            warn!("Search budget exhausted before a first solution was built");
            return None;
        }

        let initial_solution = Tour::new(nearest_neighbour_order(dm, config.depot), dm);
        info!(
            "Initial tour over {} branches: {:.2} km",
            n, initial_solution.fitness
        );

        // with a symmetric matrix every tour over three stops has the same length
        if n < 4 {
            return Some(initial_solution.order);
        }

        let max_no_improvement = calculate_max_no_improvement(n);
        let mut state = SearchState::new(initial_solution, config);

        let loop_span = span!(
            Level::DEBUG,
            "tabu_search_loop",
            branches = n,
            max_iterations = config.max_iterations
        );
        let _loop_guard = loop_span.enter();

        for iteration in 1..=config.max_iterations {
            if cancel.load(Ordering::Relaxed) {
                info!("Search cancelled at iteration {}", iteration);
                break;
            }
            let elapsed = started.elapsed();
            if elapsed >= config.time_limit {
                info!("Time limit reached at iteration {}", iteration);
                break;
            }
            if state.has_ended {
                break;
            }

            let progress = f64::max(
                iteration as f64 / config.max_iterations as f64,
                elapsed.as_secs_f64() / config.time_limit.as_secs_f64(),
            );
            perform_iteration(iteration, &mut state, dm, config, max_no_improvement, progress);
        }

        report_final_stats(&state);
        Some(state.best_so_far.order)
    }
}

/// Iterations without improvement before the search stops early.
pub fn calculate_max_no_improvement(locations_len: usize) -> usize {
    let scaling_factor = if locations_len < 50 { 15.0 } else { 9.0 };
    max(
        300,
        (scaling_factor * (locations_len as f64).powf(1.33)) as usize,
    )
}

fn perform_iteration(
    iteration: usize,
    state: &mut SearchState,
    dm: &DistanceMatrix,
    config: &SolverConfig,
    max_no_improvement: usize,
    progress: f64,
) {
    trace!("=== Iteration {} ===", iteration);

    let window = config.tabu_upper_bound_len.saturating_mul(4) + 1;
    state.record_fitness(state.current_solution.fitness, window);

    let candidates = find_neighbours(&state.current_solution, dm);
    let Some((fitness, chosen_move)) = choose_best_candidate(
        &candidates,
        &state.tabu_list,
        &state.best_so_far,
        config.aspiration_threshold,
        &state.parent_move,
    ) else {
        state.has_ended = true;
        return;
    };
    trace!("chosen move: {:.3}, {:?}", fitness, chosen_move);

    let mut final_neighbour = state.current_solution.clone();
    chosen_move.apply(&mut final_neighbour.order);
    final_neighbour.fitness = fitness;

    insert_and_adjust_tabu_list(&mut state.tabu_list, chosen_move, state.len_tabu_list);

    if state.offer_best(&final_neighbour, iteration) {
        debug!(
            "New best at iteration {}: {:.3} km",
            iteration, state.best_so_far.fitness
        );
    }
    state.parent_move = chosen_move.pair();

    let mut next_solution = final_neighbour;
    apply_diversifications(iteration, state, &mut next_solution, config, progress);

    // deltas accumulate rounding error, so re-measure after the move and any mutation
    next_solution.fitness = find_fitness(&next_solution.order, dm);

    if state.offer_best(&next_solution, iteration) {
        debug!(
            "New best at iteration {}: {:.3} km",
            iteration, state.best_so_far.fitness
        );
    }

    if state.best_so_far_iteration != iteration {
        state.stagnation += 1;
        if state.stagnation >= max_no_improvement && !state.has_ended {
            info!("Ended early at iteration {}", iteration);
            state.has_ended = true;
        } else if state.stagnation >= max_no_improvement / 2 {
            state.temperature_factor = 2;
        }
    } else {
        state.max_stagnation = max(state.stagnation, state.max_stagnation);
        state.stagnation = 0;
        state.temperature_factor = 1;
    }

    state.current_solution = next_solution;
}

/// Rollback or steer towards the best tour, resize the tabu list, and occasionally mutate.
fn apply_diversifications(
    iteration: usize,
    state: &mut SearchState,
    next_solution: &mut Tour,
    config: &SolverConfig,
    progress: f64,
) {
    let temp = temperature(progress, state.temperature_factor);

    let mutate_to_best_check = iteration % 50;
    let mutate_steer_best_check = iteration % 40;
    let mutate_tabu_len_check = iteration % 20;
    let mutate_check = iteration % 10;

    if state.rng.gen::<f64>() * state.rng.gen_range(0.3..0.6)
        <= temp * state.rng.gen_range(0.9..1.0)
        && mutate_to_best_check == 0
        && state.recent_fitness.len() > state.len_tabu_list * 4
    {
        state.rollbacks += 1;
        *next_solution = perform_rollback(
            &state.recent_fitness,
            state.len_tabu_list * 4,
            next_solution,
            &state.best_so_far,
        );
    } else if mutate_steer_best_check == 0 {
        state.steers += 1;
        let num_to_change =
            ((next_solution.order.len() as f64) * temp * state.rng.gen::<f64>()).ceil() as usize;
        steer_towards_best(next_solution, &state.best_so_far, num_to_change, &mut state.rng);
    }

    if mutate_tabu_len_check == 0 && config.tabu_lower_bound_len < config.tabu_upper_bound_len {
        state.tabu_resizes += 1;
        state.len_tabu_list = state
            .rng
            .gen_range(config.tabu_lower_bound_len..config.tabu_upper_bound_len);
    }

    if mutate_check == 0
        && state.rng.gen::<f64>() * state.rng.gen_range(0.4..0.6)
            <= temp * state.rng.gen_range(0.8..1.0)
    {
        state.mutations += 1;
        final_mutation(next_solution, &mut state.rng);
    }
}

fn report_final_stats(state: &SearchState) {
    info!(
        "Search complete. Best tour {:.2} km found at iteration {} ({} improvements)",
        state.best_so_far.fitness,
        state.best_so_far_iteration,
        state.best_so_far_updates.len()
    );
    debug!("Max stagnation: {}", state.max_stagnation);
    debug!(
        "Diversification counts - rollback: {}, steer: {}, tabu_len: {}, mutation: {}",
        state.rollbacks, state.steers, state.tabu_resizes, state.mutations
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quick_config() -> SolverConfig {
        SolverConfig::default()
            .with_time_limit(Duration::from_secs(5))
            .with_max_iterations(300)
    }

    fn ring(n: usize) -> Vec<(f64, f64)> {
        // points on a small circle, deliberately listed out of order
        let mut coords: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let angle = 2.0 * std::f64::consts::PI * (k as f64) / (n as f64);
                (23.8 + 0.05 * angle.sin(), 90.4 + 0.05 * angle.cos())
            })
            .collect();
        for k in (1..n).step_by(2) {
            let swap_with = (k * 7) % n;
            if swap_with != 0 {
                coords.swap(k, swap_with);
            }
        }
        coords
    }

    #[test]
    fn test_square_gives_perimeter() {
        let dm = DistanceMatrix::from_coords(&[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0)]);
        let order = TabuSearchSolver
            .solve(&dm, &quick_config(), &AtomicBool::new(false))
            .unwrap();
        assert_eq!(order[0], 0);
        // the diagonal partner 1 must sit in the middle of the tour
        assert_eq!(order[2], 1);
    }

    #[test]
    fn test_never_worse_than_construction() {
        let dm = DistanceMatrix::from_coords(&ring(12));
        let initial = find_fitness(&nearest_neighbour_order(&dm, 0), &dm);
        let order = TabuSearchSolver
            .solve(&dm, &quick_config(), &AtomicBool::new(false))
            .unwrap();

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..12).collect::<Vec<_>>());
        assert_eq!(order[0], 0);
        assert!(find_fitness(&order, &dm) <= initial + 1e-9);
    }

    #[test]
    fn test_cancelled_before_start_finds_nothing() {
        let dm = DistanceMatrix::from_coords(&ring(6));
        let result = TabuSearchSolver.solve(&dm, &quick_config(), &AtomicBool::new(true));
        assert!(result.is_none());
    }

    #[test]
    fn test_zero_budget_finds_nothing() {
        let dm = DistanceMatrix::from_coords(&ring(6));
        let config = quick_config().with_time_limit(Duration::ZERO);
        assert!(TabuSearchSolver
            .solve(&dm, &config, &AtomicBool::new(false))
            .is_none());
    }

    #[test]
    fn test_non_finite_matrix_finds_nothing() {
        let dm = DistanceMatrix::from_coords(&[(0.0, 0.0), (f64::NAN, 1.0)]);
        assert!(TabuSearchSolver
            .solve(&dm, &quick_config(), &AtomicBool::new(false))
            .is_none());
    }

    #[test]
    fn test_single_branch_is_its_own_tour() {
        let dm = DistanceMatrix::from_coords(&[(23.8, 90.4)]);
        let order = TabuSearchSolver
            .solve(&dm, &quick_config(), &AtomicBool::new(false))
            .unwrap();
        assert_eq!(order, vec![0]);
    }

    #[test]
    fn test_stagnation_floor() {
        assert_eq!(calculate_max_no_improvement(5), 300);
        assert!(calculate_max_no_improvement(200) > 300);
    }
}
