//! Error types for the cellular automaton core

use thiserror::Error;

/// Errors raised while building grids, rules and evolution engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifeError {
    /// The rule descriptor could not be turned into a rule configuration
    #[error("Invalid rule descriptor '{descriptor}': {reason}")]
    InvalidRuleDescriptor { descriptor: String, reason: String },

    /// A grid must have at least one row and one column
    #[error("Invalid grid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions { width: usize, height: usize },

    /// Rows of a grid built from nested rows differ in length
    #[error("Row {row} has length {found}, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    /// Fill probability or fraction outside [0, 1]
    #[error("Invalid fill policy: {0}")]
    InvalidFill(String),
}

impl LifeError {
    /// Creates a rule descriptor error.
    pub fn descriptor(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        LifeError::InvalidRuleDescriptor {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for core operations.
pub type LifeResult<T> = std::result::Result<T, LifeError>;
