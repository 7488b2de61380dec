pub mod branch_loader;

pub use branch_loader::{demo_branches, read_branches_from_csv, read_branches_from_reader, seed_if_empty};
