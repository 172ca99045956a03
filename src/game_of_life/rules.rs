//! Birth/survival/decay rule configuration and the per-cell transition

use crate::error::{LifeError, LifeResult};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Maximum neighbor count in a Moore neighborhood
pub const MAX_NEIGHBOR_COUNT: u8 = 8;

/// Start age used when none is supplied
pub const DEFAULT_START_AGE: u32 = 0;

/// Smallest `max_age` a decay rule accepts
pub const MIN_MAX_AGE: u32 = 2;

/// Conway's classic rule
pub const CONWAY_DESCRIPTOR: &str = "B3/S23";

/// Rule mode, carrying the fields only the decay mode needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// Binary cells: 0 dead, anything else alive; only `1` counts as a live neighbor
    Standard,
    /// Cells hold ages that grow, persist or decay
    DecayOfAge { max_age: u32, start_age: u32 },
}

/// A parsed rule descriptor such as `B3/S23` or `B338/S237/A5`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    birth_counts: BTreeSet<u8>,
    survival_counts: BTreeSet<u8>,
    mode: RuleMode,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::conway()
    }
}

impl RuleConfig {
    /// Conway's Game of Life, B3/S23
    pub fn conway() -> Self {
        Self {
            birth_counts: BTreeSet::from([3]),
            survival_counts: BTreeSet::from([2, 3]),
            mode: RuleMode::Standard,
        }
    }

    pub fn birth_counts(&self) -> &BTreeSet<u8> {
        &self.birth_counts
    }

    pub fn survival_counts(&self) -> &BTreeSet<u8> {
        &self.survival_counts
    }

    pub fn mode(&self) -> RuleMode {
        self.mode
    }

    pub fn is_decay(&self) -> bool {
        matches!(self.mode, RuleMode::DecayOfAge { .. })
    }

    /// Start age of the decay mode, `None` in standard mode
    pub fn start_age(&self) -> Option<u32> {
        match self.mode {
            RuleMode::Standard => None,
            RuleMode::DecayOfAge { start_age, .. } => Some(start_age),
        }
    }

    /// Replace the start age of a decay rule.
    /// Standard rules have no ages and are returned unchanged.
    pub fn with_start_age(mut self, start_age: u32) -> Self {
        if let RuleMode::DecayOfAge { max_age, .. } = self.mode {
            self.mode = RuleMode::DecayOfAge { max_age, start_age };
        }
        self
    }

    /// Whether a neighbor holding `value` counts towards the live-neighbor total
    #[inline]
    pub fn counts_as_alive(&self, value: u32) -> bool {
        match self.mode {
            RuleMode::Standard => value == 1,
            RuleMode::DecayOfAge { .. } => value > 0,
        }
    }

    /// Number of live cells among the eight neighbors
    pub fn alive_neighbors(&self, neighbors: &[u32; 8]) -> u8 {
        neighbors
            .iter()
            .filter(|&&value| self.counts_as_alive(value))
            .count() as u8
    }

    /// Ages that may grow on a birth condition: `[2, max_age - 2]`
    pub fn is_fertile(&self, age: u32) -> bool {
        match self.mode {
            RuleMode::Standard => false,
            RuleMode::DecayOfAge { max_age, .. } => {
                (2..=max_age.saturating_sub(2)).contains(&age)
            }
        }
    }

    /// Next value of a cell holding `current` with `alive_neighbors` live neighbors
    pub fn next_state(&self, current: u32, alive_neighbors: u8) -> u32 {
        let birth = self.birth_counts.contains(&alive_neighbors);
        let survival = self.survival_counts.contains(&alive_neighbors);

        match self.mode {
            RuleMode::Standard => {
                let alive = if current == 0 { birth } else { survival };
                u32::from(alive)
            }
            RuleMode::DecayOfAge { start_age, .. } => {
                if birth && self.is_fertile(current) {
                    current + 1
                } else if survival && current > 0 {
                    current
                } else if birth && current == 0 {
                    start_age
                } else {
                    // Ages never go below zero
                    current.saturating_sub(1)
                }
            }
        }
    }
}

impl fmt::Display for RuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B{}/S{}",
            self.birth_counts.iter().join(""),
            self.survival_counts.iter().join("")
        )?;
        if let RuleMode::DecayOfAge { max_age, .. } = self.mode {
            write!(f, "/A{}", max_age)?;
        }
        Ok(())
    }
}

impl FromStr for RuleConfig {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rules(s)
    }
}

/// Parse a descriptor of the form `B<digits>/S<digits>[/A<digits>]`.
///
/// Prefix letters and any other non-digit characters are ignored. A third
/// segment selects the decay mode, its first integer being `max_age`.
pub fn parse_rules(descriptor: &str) -> LifeResult<RuleConfig> {
    let segments: Vec<&str> = descriptor.trim().split('/').collect();
    if !(2..=3).contains(&segments.len()) {
        return Err(LifeError::descriptor(
            descriptor,
            format!("expected 2 or 3 '/'-separated segments, found {}", segments.len()),
        ));
    }

    let birth_counts = parse_counts(descriptor, segments[0])?;
    let survival_counts = parse_counts(descriptor, segments[1])?;

    let mode = match segments.get(2) {
        None => RuleMode::Standard,
        Some(segment) => RuleMode::DecayOfAge {
            max_age: parse_max_age(descriptor, segment)?,
            start_age: DEFAULT_START_AGE,
        },
    };

    log::debug!("Parsed rule descriptor '{}'", descriptor);
    Ok(RuleConfig {
        birth_counts,
        survival_counts,
        mode,
    })
}

fn parse_counts(descriptor: &str, segment: &str) -> LifeResult<BTreeSet<u8>> {
    segment
        .chars()
        .filter_map(|ch| ch.to_digit(10))
        .map(|digit| {
            let count = digit as u8;
            if is_valid_neighbor_count(count) {
                Ok(count)
            } else {
                Err(LifeError::descriptor(
                    descriptor,
                    format!("neighbor count {} exceeds {}", count, MAX_NEIGHBOR_COUNT),
                ))
            }
        })
        .collect()
}

fn parse_max_age(descriptor: &str, segment: &str) -> LifeResult<u32> {
    let digits: String = segment
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return Err(LifeError::descriptor(descriptor, "age segment holds no integer"));
    }

    let max_age: u32 = digits
        .parse()
        .map_err(|_| LifeError::descriptor(descriptor, format!("max age {} is too large", digits)))?;
    if max_age < MIN_MAX_AGE {
        return Err(LifeError::descriptor(
            descriptor,
            format!("max age must be at least {}, got {}", MIN_MAX_AGE, max_age),
        ));
    }
    Ok(max_age)
}

/// Check if a neighbor count is valid (0-8)
pub fn is_valid_neighbor_count(count: u8) -> bool {
    count <= MAX_NEIGHBOR_COUNT
}
