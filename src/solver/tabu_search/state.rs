use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::distance::DistanceMatrix;
use crate::evaluation::fitness::find_fitness;
use crate::solver::SolverConfig;
use crate::utils::ordered_pair;

/// A closed tour as matrix indices, depot first, with its length in km.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub order: Vec<usize>,
    pub fitness: f64,
}

impl Tour {
    pub fn new(order: Vec<usize>, dm: &DistanceMatrix) -> Self {
        let fitness = find_fitness(&order, dm);
        Self { order, fitness }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Swap,
    Reverse,
}

/// A neighbourhood move between two tour positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub kind: MoveKind,
    pub i: usize,
    pub j: usize,
}

impl Move {
    pub fn swap(i: usize, j: usize) -> Self {
        Self {
            kind: MoveKind::Swap,
            i,
            j,
        }
    }

    pub fn reverse(i: usize, j: usize) -> Self {
        Self {
            kind: MoveKind::Reverse,
            i,
            j,
        }
    }

    pub fn pair(&self) -> (usize, usize) {
        (self.i, self.j)
    }

    /// The same move with its positions in ascending order, as stored in the tabu list.
    pub fn normalized(&self) -> Self {
        let (i, j) = ordered_pair(self.pair());
        Self { kind: self.kind, i, j }
    }

    pub fn apply(&self, order: &mut [usize]) {
        match self.kind {
            MoveKind::Swap => order.swap(self.i, self.j),
            MoveKind::Reverse => order[self.i..=self.j].reverse(),
        }
    }
}

pub struct SearchState {
    pub current_solution: Tour,
    pub best_so_far: Tour,
    pub best_so_far_iteration: usize,
    pub best_so_far_updates: Vec<(usize, f64)>,
    /// Fitness of recent current solutions, oldest first.
    pub recent_fitness: VecDeque<f64>,
    pub tabu_list: VecDeque<Move>,
    pub len_tabu_list: usize,
    pub parent_move: (usize, usize),
    pub stagnation: usize,
    pub max_stagnation: usize,
    pub temperature_factor: i32,
    pub has_ended: bool,
    pub rng: ChaCha8Rng,
    pub rollbacks: usize,
    pub steers: usize,
    pub tabu_resizes: usize,
    pub mutations: usize,
}

impl SearchState {
    pub fn new(initial_solution: Tour, config: &SolverConfig) -> Self {
        let n = initial_solution.order.len();
        Self {
            best_so_far: initial_solution.clone(),
            current_solution: initial_solution,
            best_so_far_iteration: 0,
            best_so_far_updates: vec![],
            recent_fitness: VecDeque::new(),
            tabu_list: VecDeque::new(),
            len_tabu_list: config.tabu_len,
            // out-of-range sentinel so nothing overlaps on the first iteration
            parent_move: (n, n),
            stagnation: 0,
            max_stagnation: 0,
            temperature_factor: 1,
            has_ended: false,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            rollbacks: 0,
            steers: 0,
            tabu_resizes: 0,
            mutations: 0,
        }
    }

    pub fn record_fitness(&mut self, fitness: f64, window: usize) {
        self.recent_fitness.push_back(fitness);
        while self.recent_fitness.len() > window {
            self.recent_fitness.pop_front();
        }
    }

    /// Replace `best_so_far` when `candidate` is shorter. Returns whether it did.
    pub fn offer_best(&mut self, candidate: &Tour, iteration: usize) -> bool {
        if candidate.fitness < self.best_so_far.fitness {
            self.best_so_far = candidate.clone();
            self.best_so_far_iteration = iteration;
            self.best_so_far_updates.push((iteration, candidate.fitness));
            true
        } else {
            false
        }
    }
}
