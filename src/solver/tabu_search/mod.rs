pub mod diversification;
pub mod neighborhood;
pub mod search;
pub mod state;
pub mod tabu;

pub use search::TabuSearchSolver;
pub use state::{Move, MoveKind, SearchState, Tour};
