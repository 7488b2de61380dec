use crate::distance::DistanceMatrix;

/// Closed tour length of `order`, returning to the first index.
pub fn find_fitness(order: &[usize], dm: &DistanceMatrix) -> f64 {
    dm.tour_length(order, true)
}

pub fn dist_between(from_loc: usize, to_loc: usize, dm: &DistanceMatrix) -> f64 {
    dm.get(from_loc, to_loc)
}

/// Change in closed tour length from swapping positions `i` and `j`.
pub fn swap_delta(order: &[usize], i: usize, j: usize, dm: &DistanceMatrix) -> f64 {
    let n = order.len();
    if n < 2 || i == j {
        return 0.0;
    }

    let at = |p: usize, swapped: bool| -> usize {
        if !swapped {
            order[p]
        } else if p == i {
            order[j]
        } else if p == j {
            order[i]
        } else {
            order[p]
        }
    };

    // edges are identified by the position they start from
    let mut starts = [(i + n - 1) % n, i, (j + n - 1) % n, j];
    starts.sort_unstable();
    let mut delta = 0.0;
    let mut last = None;
    for &k in &starts {
        if last == Some(k) {
            continue;
        }
        last = Some(k);
        let next = (k + 1) % n;
        delta += dist_between(at(k, true), at(next, true), dm);
        delta -= dist_between(at(k, false), at(next, false), dm);
    }
    delta
}

/// Change in closed tour length from reversing positions `i..=j` (2-opt).
///
/// Assumes a symmetric matrix and `0 < i < j < order.len()`.
pub fn reverse_delta(order: &[usize], i: usize, j: usize, dm: &DistanceMatrix) -> f64 {
    let n = order.len();
    let before = order[i - 1];
    let after = order[(j + 1) % n];
    dist_between(before, order[j], dm) + dist_between(order[i], after, dm)
        - dist_between(before, order[i], dm)
        - dist_between(order[j], after, dm)
}
