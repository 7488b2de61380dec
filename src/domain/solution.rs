use std::collections::HashMap;

use crate::distance::DistanceMatrix;
use crate::domain::types::{Branch, Route};

/// Materialize an index order over `branches` as a `Route`, measuring it against `dm`.
pub fn route_from_order(branches: &[Branch], order: &[usize], dm: &DistanceMatrix) -> Route {
    Route {
        stops: order.iter().map(|&i| branches[i].clone()).collect(),
        open_km: dm.tour_length(order, false),
        closed_km: dm.tour_length(order, true),
    }
}

/// Rotate a closed tour so it starts at `depot` and drop a repeated depot at the end.
pub fn normalize_depot_tour(mut order: Vec<usize>, depot: usize) -> Vec<usize> {
    if order.len() > 1 && order.first() == order.last() {
        order.pop();
    }
    if let Some(pos) = order.iter().position(|&i| i == depot) {
        order.rotate_left(pos);
    }
    order
}

/// True when `route` visits every branch of `branches` exactly once and nothing else.
pub fn is_permutation_of(route: &Route, branches: &[Branch]) -> bool {
    if route.len() != branches.len() {
        return false;
    }
    let mut counts: HashMap<i64, i64> = HashMap::new();
    for b in branches {
        *counts.entry(b.id).or_default() += 1;
    }
    for b in &route.stops {
        *counts.entry(b.id).or_default() -= 1;
    }
    counts.values().all(|&c| c == 0)
}
