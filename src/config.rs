// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::StrataError;

/// The default number of levels an index may use. At the default level
/// probability this comfortably covers tens of thousands of keys before the
/// top level starts to saturate.
pub const DEFAULT_MAX_HEIGHT: usize = 16;

/// The default chance that a tower in the probabilistic list reaches the next
/// level.
pub const DEFAULT_LEVEL_PROBABILITY: f64 = 0.5;

/// The default upper bound on the number of keys between two consecutive
/// checkpoints of the deterministic list (a 1-2-3 skip list).
pub const DEFAULT_GAP_BOUND: usize = 3;

/// Hard ceiling for `max_height`. The probabilistic header tower is allocated
/// at full height up front.
pub const MAX_SUPPORTED_HEIGHT: usize = 64;

/// Construction-time settings shared by both engines. Fields that only apply
/// to one engine are ignored by the other.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Config {
    /// Structure-wide cap on the number of levels.
    max_height: usize,
    /// Probability, in `(0, 1)`, that a probabilistic tower grows one more
    /// level.
    level_probability: f64,
    /// Largest gap the deterministic list tolerates before it promotes a key.
    gap_bound: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_height: DEFAULT_MAX_HEIGHT,
            level_probability: DEFAULT_LEVEL_PROBABILITY,
            gap_bound: DEFAULT_GAP_BOUND,
        }
    }
}

impl Config {
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_level_probability(mut self, level_probability: f64) -> Self {
        self.level_probability = level_probability;
        self
    }

    pub fn with_gap_bound(mut self, gap_bound: usize) -> Self {
        self.gap_bound = gap_bound;
        self
    }

    /// Rejects settings the engines cannot honour. Nothing is clamped.
    pub fn validate(&self) -> Result<(), StrataError> {
        validate_max_height(self.max_height)?;
        validate_level_probability(self.level_probability)?;
        if self.gap_bound < 2 {
            return Err(StrataError::InvalidConfig(format!(
                "gap_bound must be at least 2, got {}",
                self.gap_bound
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_max_height(max_height: usize) -> Result<(), StrataError> {
    if max_height == 0 {
        return Err(StrataError::InvalidConfig(
            "max_height must be non-zero".to_string(),
        ));
    }
    if max_height > MAX_SUPPORTED_HEIGHT {
        return Err(StrataError::InvalidConfig(format!(
            "max_height must be at most {}, got {}",
            MAX_SUPPORTED_HEIGHT, max_height
        )));
    }
    Ok(())
}

pub(crate) fn validate_level_probability(p: f64) -> Result<(), StrataError> {
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(StrataError::InvalidConfig(format!(
            "level_probability must be in (0, 1), got {}",
            p
        )));
    }
    Ok(())
}
