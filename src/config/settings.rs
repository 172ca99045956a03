//! Configuration settings for the simulator

use crate::game_of_life::grid::{FillPolicy, DEFAULT_ALIVE_FRACTION, DEFAULT_WORLD_SIZE};
use crate::game_of_life::rules::{parse_rules, RuleConfig, CONWAY_DESCRIPTOR, DEFAULT_START_AGE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub world: WorldConfig,
    pub rules: RulesConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub fill: FillPolicy,
    /// Seed for the fill policy; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Grid file used instead of the fill policy
    #[serde(default)]
    pub initial_state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub descriptor: String,
    pub start_age: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Delay between generations in the driver loop
    pub interval_ms: u64,
    /// 0 runs until interrupted
    pub max_generations: u64,
    pub stop_when_extinct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_final: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                width: DEFAULT_WORLD_SIZE,
                height: DEFAULT_WORLD_SIZE,
                fill: FillPolicy::Random {
                    probability: DEFAULT_ALIVE_FRACTION,
                },
                seed: None,
                initial_state_file: None,
            },
            rules: RulesConfig {
                descriptor: CONWAY_DESCRIPTOR.to_string(),
                start_age: DEFAULT_START_AGE,
            },
            simulation: SimulationConfig {
                interval_ms: 500,
                max_generations: 0,
                stop_when_extinct: true,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_final: false,
                output_directory: PathBuf::from("output/snapshots"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            log::warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Parse the configured rule, applying the start age
    pub fn rule_config(&self) -> Result<RuleConfig> {
        let rules = parse_rules(&self.rules.descriptor)?.with_start_age(self.rules.start_age);
        Ok(rules)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        match &self.world.initial_state_file {
            Some(file) if !file.exists() => {
                anyhow::bail!("Initial state file does not exist: {}", file.display());
            }
            Some(_) => {}
            None => {
                if self.world.width == 0 || self.world.height == 0 {
                    anyhow::bail!("World width and height must be positive");
                }
                self.world.fill.validate()?;
            }
        }

        self.rule_config()
            .context("Invalid rule configuration")?;

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref descriptor) = cli_overrides.rules {
            self.rules.descriptor = descriptor.clone();
        }
        if let Some(start_age) = cli_overrides.start_age {
            self.rules.start_age = start_age;
        }
        if let Some(width) = cli_overrides.width {
            self.world.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.world.height = height;
        }
        if let Some(fraction) = cli_overrides.alive_fraction {
            self.world.fill = FillPolicy::Random {
                probability: fraction,
            };
        }
        if let Some(seed) = cli_overrides.seed {
            self.world.seed = Some(seed);
        }
        if let Some(ref initial) = cli_overrides.initial_state_file {
            self.world.initial_state_file = Some(initial.clone());
        }
        if let Some(generations) = cli_overrides.max_generations {
            self.simulation.max_generations = generations;
        }
        if let Some(interval) = cli_overrides.interval_ms {
            self.simulation.interval_ms = interval;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rules: Option<String>,
    pub start_age: Option<u32>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub alive_fraction: Option<f64>,
    pub seed: Option<u64>,
    pub initial_state_file: Option<PathBuf>,
    pub max_generations: Option<u64>,
    pub interval_ms: Option<u64>,
    pub output_dir: Option<PathBuf>,
}
