use std::collections::VecDeque;

use super::state::{Move, Tour};
use crate::utils::swaps_overlap;

/// Pick the best non-tabu candidate, letting a tabu move through when it lands within
/// `aspiration_threshold` of the best tour and does not touch the previous move's positions.
/// Tabu entries are per move kind: a tabu swap of two positions leaves their reversal open.
pub fn choose_best_candidate(
    candidates: &[(f64, Move)],
    tabu_list: &VecDeque<Move>,
    best_so_far: &Tour,
    aspiration_threshold: f64,
    parent_move: &(usize, usize),
) -> Option<(f64, Move)> {
    let chosen = *candidates.first()?;

    if !tabu_list.contains(&chosen.1.normalized()) {
        return Some(chosen);
    }

    if chosen.0 <= best_so_far.fitness + aspiration_threshold
        && !swaps_overlap(&chosen.1.pair(), parent_move)
    {
        // aspiration grants permission
        return Some(chosen);
    }

    candidates
        .iter()
        .find(|cand| {
            !tabu_list.contains(&cand.1.normalized())
                && !swaps_overlap(&cand.1.pair(), parent_move)
        })
        .copied()
        .or(Some(chosen))
}

pub fn insert_and_adjust_tabu_list(
    tabu_list: &mut VecDeque<Move>,
    chosen_move: Move,
    len_tabu_list: usize,
) {
    tabu_list.push_front(chosen_move.normalized());

    while tabu_list.len() > len_tabu_list {
        tabu_list.pop_back();
    }
}
