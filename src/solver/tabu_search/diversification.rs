use std::collections::VecDeque;

use rand::seq::IteratorRandom;
use rand_chacha::ChaCha8Rng;

use super::state::Tour;

/// Return to the best tour when the recent window shows net improvement and the
/// search has drifted away from it; otherwise keep `next_solution`.
pub fn perform_rollback(
    recent_fitness: &VecDeque<f64>,
    window: usize,
    next_solution: &Tour,
    best_so_far: &Tour,
) -> Tour {
    if window == 0 || recent_fitness.len() < window + 1 {
        return next_solution.clone();
    }

    let start = recent_fitness.len() - window;
    let overall_reduction: f64 = (start..recent_fitness.len())
        .map(|ind| recent_fitness[ind - 1] - recent_fitness[ind])
        .sum();

    if overall_reduction > 0.0 && next_solution.order != best_so_far.order {
        best_so_far.clone()
    } else {
        next_solution.clone()
    }
}

/// Reverse a random segment, then rotate three random positions. Position 0 stays put.
pub fn final_mutation(next_solution: &mut Tour, rng: &mut ChaCha8Rng) {
    let n = next_solution.order.len();
    if n < 3 {
        return;
    }

    let mut pair: Vec<usize> = (1..n).choose_multiple(rng, 2);
    pair.sort_unstable();
    let (a, b) = (pair[0], pair[1]);
    next_solution.order[a..=b].reverse();

    if n >= 4 {
        let mut triple: Vec<usize> = (1..n).choose_multiple(rng, 3);
        triple.sort_unstable();
        let (x, y, z) = (triple[0], triple[1], triple[2]);
        next_solution.order.swap(x, y);
        next_solution.order.swap(y, z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tour(order: Vec<usize>, fitness: f64) -> Tour {
        Tour { order, fitness }
    }

    #[test]
    fn test_rollback_after_net_improvement() {
        let history = VecDeque::from(vec![12.0, 11.0, 10.0, 9.0]);
        let next = tour(vec![0, 2, 1, 3], 9.5);
        let best = tour(vec![0, 1, 2, 3], 8.0);
        assert_eq!(perform_rollback(&history, 3, &next, &best), best);
    }

    #[test]
    fn test_no_rollback_without_history() {
        let history = VecDeque::from(vec![12.0]);
        let next = tour(vec![0, 2, 1, 3], 9.5);
        let best = tour(vec![0, 1, 2, 3], 8.0);
        assert_eq!(perform_rollback(&history, 3, &next, &best), next);
    }

    #[test]
    fn test_mutation_keeps_depot_and_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut t = tour((0..8).collect(), 0.0);
        for _ in 0..50 {
            final_mutation(&mut t, &mut rng);
            assert_eq!(t.order[0], 0);
        }
        let mut sorted = t.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..8).collect::<Vec<_>>());
    }
}
