//! Configuration management for the simulator

pub mod settings;

pub use settings::{
    Settings, WorldConfig, RulesConfig, SimulationConfig, OutputConfig, OutputFormat, CliOverrides
};
