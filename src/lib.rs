//! Toroidal Game of Life simulator
//!
//! Evolves a wraparound grid of integer cell states under configurable
//! birth/survival rules, including an age-decay variant.

pub mod config;
pub mod error;
pub mod game_of_life;
pub mod utils;

pub use config::Settings;
pub use error::{LifeError, LifeResult};
pub use game_of_life::{parse_rules, Evolution, FillPolicy, Grid, RuleConfig, RuleMode};

use anyhow::Result;

/// Build a ready-to-run engine from settings: load or seed the world, then parse the rule
pub fn build_engine(settings: &Settings) -> Result<Evolution> {
    let grid = match &settings.world.initial_state_file {
        Some(path) => game_of_life::load_grid_from_file(path)?,
        None => Grid::random(
            settings.world.width,
            settings.world.height,
            &settings.world.fill,
            settings.world.seed,
        )?,
    };
    Ok(Evolution::from_rules(grid, settings.rule_config()?))
}
