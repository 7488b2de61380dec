use tracing::{info, trace};

use crate::distance::{haversine_km, DistanceMatrix};
use crate::domain::types::{Branch, Route};

/// Nearest-neighbour route over `branches`, starting at the first one.
///
/// Each step moves to the closest unvisited branch by haversine distance; on ties the
/// branch earliest in the input wins. Does not return to the start.
pub fn greedy_route(branches: &[Branch]) -> Route {
    let order = nearest_neighbour_by(branches.len(), 0, |from, to| {
        haversine_km(branches[from].coords(), branches[to].coords())
    });

    let legs: Vec<f64> = order
        .windows(2)
        .map(|w| haversine_km(branches[w[0]].coords(), branches[w[1]].coords()))
        .collect();
    let open_km: f64 = legs.iter().sum();
    let closing = match (order.first(), order.last()) {
        (Some(&first), Some(&last)) if order.len() > 1 => {
            haversine_km(branches[last].coords(), branches[first].coords())
        }
        _ => 0.0,
    };

    let route = Route {
        stops: order.iter().map(|&i| branches[i].clone()).collect(),
        open_km,
        closed_km: open_km + closing,
    };
    info!(
        "Greedy route over {} branches: {:.2} km",
        route.len(),
        route.open_km
    );
    route
}

/// Nearest-neighbour index order over a precomputed matrix, starting at `start`.
pub fn nearest_neighbour_order(dm: &DistanceMatrix, start: usize) -> Vec<usize> {
    nearest_neighbour_by(dm.size(), start, |from, to| dm.get(from, to))
}

fn nearest_neighbour_by<F>(n: usize, start: usize, dist: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> f64,
{
    if n == 0 {
        return vec![];
    }

    let mut unvisited: Vec<usize> = (0..n).filter(|&i| i != start).collect();
    let mut order = Vec::with_capacity(n);
    order.push(start);
    let mut current = start;

    while !unvisited.is_empty() {
        let mut best_pos = 0;
        let mut best_dist = f64::INFINITY;
        for (pos, &candidate) in unvisited.iter().enumerate() {
            let d = dist(current, candidate);
            if d < best_dist {
                best_dist = d;
                best_pos = pos;
            }
        }
        // `remove` keeps the remaining candidates in input order for tie-breaking
        current = unvisited.remove(best_pos);
        trace!("Nearest to previous stop: {} ({:.3} km)", current, best_dist);
        order.push(current);
    }

    order
}
