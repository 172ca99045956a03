//! Cellular automaton core: grid, rules and the evolution engine

pub mod evolution;
pub mod grid;
pub mod io;
pub mod rules;

pub use evolution::Evolution;
pub use grid::{FillPolicy, Grid};
pub use io::{create_example_grids, grid_to_string, load_grid_from_file, save_grid_to_file};
pub use rules::{parse_rules, RuleConfig, RuleMode};
