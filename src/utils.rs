use rand::seq::IteratorRandom;
use rand_chacha::ChaCha8Rng;

use crate::solver::tabu_search::state::Tour;

/// Linear cooling from `factor` at the start of the search to zero at the end.
/// `progress` is the consumed share of the budget in `[0, 1]`.
pub fn temperature(progress: f64, temperature_factor: i32) -> f64 {
    (1.0 - progress.clamp(0.0, 1.0)) * (temperature_factor as f64)
}

/// Move `num_indices` randomly chosen positions of `current` to the branch `best` has there.
/// Position 0 holds the depot in both tours and is never picked.
pub fn steer_towards_best(
    current: &mut Tour,
    best: &Tour,
    num_indices: usize,
    rng: &mut ChaCha8Rng,
) {
    let n = current.order.len();
    if n < 3 || best.order.len() != n {
        return;
    }

    let chosen_indices: Vec<usize> = (1..n).choose_multiple(rng, num_indices.min(n - 1));

    for &idx in &chosen_indices {
        let target_value = best.order[idx];
        if let Some(current_idx) = current.order.iter().position(|&x| x == target_value) {
            current.order.swap(idx, current_idx);
        }
    }
}

pub fn swaps_overlap(a: &(usize, usize), b: &(usize, usize)) -> bool {
    a.0 == b.0 || a.0 == b.1 || a.1 == b.0 || a.1 == b.1
}

pub fn ordered_pair(pair: (usize, usize)) -> (usize, usize) {
    if pair.0 < pair.1 {
        pair
    } else {
        (pair.1, pair.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_temperature_cools_to_zero() {
        assert_eq!(temperature(0.0, 1), 1.0);
        assert_eq!(temperature(0.5, 2), 1.0);
        assert_eq!(temperature(1.5, 1), 0.0);
    }

    #[test]
    fn test_steer_fully_copies_best() {
        let mut current = Tour {
            order: vec![0, 3, 1, 4, 2],
            fitness: 0.0,
        };
        let best = Tour {
            order: vec![0, 1, 2, 3, 4],
            fitness: 0.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        steer_towards_best(&mut current, &best, 4, &mut rng);
        assert_eq!(current.order, best.order);
    }

    #[test]
    fn test_overlap_and_ordering() {
        assert!(swaps_overlap(&(1, 2), &(2, 5)));
        assert!(!swaps_overlap(&(1, 2), &(3, 4)));
        assert_eq!(ordered_pair((4, 1)), (1, 4));
    }
}
