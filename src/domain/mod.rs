pub mod solution;
pub mod types;

pub use types::*;
