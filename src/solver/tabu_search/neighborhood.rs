use itertools::Itertools;
use rayon::prelude::*;

use super::state::{Move, Tour};
use crate::distance::DistanceMatrix;
use crate::evaluation::fitness::{reverse_delta, swap_delta};

/// Score every swap and 2-opt reversal of non-depot positions, shortest tour first.
pub fn find_neighbours(current_solution: &Tour, dm: &DistanceMatrix) -> Vec<(f64, Move)> {
    let n = current_solution.order.len();
    let order = &current_solution.order;
    let base = current_solution.fitness;

    let pairs: Vec<(usize, usize)> = (1..n).tuple_combinations().collect();

    let mut candidates: Vec<(f64, Move)> = pairs
        .par_iter()
        .flat_map_iter(|&(i, j)| {
            let mut scored = Vec::with_capacity(2);
            scored.push((base + swap_delta(order, i, j, dm), Move::swap(i, j)));
            // reversing two adjacent positions is the same as swapping them
            if j > i + 1 {
                scored.push((base + reverse_delta(order, i, j, dm), Move::reverse(i, j)));
            }
            scored
        })
        .collect();

    candidates.par_sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates
}
