//! Evolution engine: advances a grid one generation at a time

use super::rules::{parse_rules, RuleConfig, RuleMode};
use super::Grid;
use crate::error::LifeResult;
use itertools::iproduct;

/// Drives a [`Grid`] through successive generations under a [`RuleConfig`].
///
/// Every step reads exclusively from the previous generation and writes into
/// a scratch buffer that is swapped in once the whole pass is done.
#[derive(Debug, Clone)]
pub struct Evolution {
    grid: Grid,
    rules: RuleConfig,
    generation: u64,
    scratch: Vec<u32>,
}

impl Evolution {
    /// Create an engine from a rule descriptor such as `B3/S23` or `B3/S23/A5`
    pub fn new(grid: Grid, descriptor: &str) -> LifeResult<Self> {
        Ok(Self::from_rules(grid, parse_rules(descriptor)?))
    }

    /// Create an engine whose decay rule seeds live cells at `start_age`
    pub fn with_start_age(grid: Grid, descriptor: &str, start_age: u32) -> LifeResult<Self> {
        let rules = parse_rules(descriptor)?.with_start_age(start_age);
        Ok(Self::from_rules(grid, rules))
    }

    /// Create an engine from an already parsed rule configuration.
    ///
    /// In decay mode every cell holding `1` is rewritten to the start age.
    pub fn from_rules(mut grid: Grid, rules: RuleConfig) -> Self {
        if let RuleMode::DecayOfAge { start_age, .. } = rules.mode() {
            if start_age != 1 {
                let seeded = grid.replace_value(1, start_age);
                if start_age == 0 && seeded > 0 {
                    log::warn!("Start age 0 cleared all {} seeded cells", seeded);
                } else {
                    log::info!("Normalised {} seeded cells to start age {}", seeded, start_age);
                }
            }
        }

        log::info!(
            "Created {}x{} world with rule {}",
            grid.width(),
            grid.height(),
            rules
        );

        Self {
            grid,
            rules,
            generation: 0,
            scratch: Vec::new(),
        }
    }

    /// Value cell `(x, y)` will hold in the next generation
    pub fn next_state(&self, x: usize, y: usize) -> u32 {
        let current = self.grid.get(x, y);
        let neighbors = self.grid.neighbor_values(x, y);
        self.rules
            .next_state(current, self.rules.alive_neighbors(&neighbors))
    }

    /// Advance one generation and return the new grid
    pub fn step(&mut self) -> &Grid {
        self.generation += 1;

        let mut next = std::mem::take(&mut self.scratch);
        next.clear();
        next.extend(
            iproduct!(0..self.grid.height(), 0..self.grid.width())
                .map(|(y, x)| self.next_state(x, y)),
        );
        self.grid.swap_cells(&mut next);
        self.scratch = next;

        log::debug!(
            "Generation {}: {} living cells",
            self.generation,
            self.grid.living_count()
        );
        &self.grid
    }

    /// Advance `generations` steps and return the resulting grid
    pub fn run(&mut self, generations: u64) -> &Grid {
        for _ in 0..generations {
            self.step();
        }
        &self.grid
    }

    /// Number of completed steps
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn world(&self) -> &Grid {
        &self.grid
    }

    /// Replace the world without touching the generation counter
    pub fn set_world(&mut self, grid: Grid) {
        self.grid = grid;
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }
}
