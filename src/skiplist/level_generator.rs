// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};

use crate::{
    config::{
        validate_level_probability,
        validate_max_height,
    },
    errs::StrataError,
};

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a `LevelGenerator`.
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist for this level
    /// generator.
    fn total(&self) -> usize;
    /// Generate a random tower height in the range `[1, total]`.
    ///
    /// This must never return `0` or a height that is `> self.total()`.
    fn random(&mut self) -> usize;
}

/// A level generator which will produce geometrically distributed numbers.
///
/// The probability of generating height `n` is `p` times the probability of
/// generating height `n-1`, with the probability truncated at the maximum
/// number of levels allowed. Truncation piles the tail of the distribution
/// onto `total`, so towers of exactly `total` levels are over-represented.
#[derive(Debug, Clone)]
pub struct GeometricalLevelGenerator<R = SmallRng> {
    total: usize,
    p: f64,
    rng: R,
}

impl<R: Rng> GeometricalLevelGenerator<R> {
    /// Create a new GeometricalLevelGenerator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level. Heights are drawn from `rng`, which the generator owns.
    ///
    /// `p` must be in `(0, 1)` and `total` must be non-zero, otherwise
    /// [`StrataError::InvalidConfig`] is returned.
    pub fn new(total: usize, p: f64, rng: R) -> Result<Self, StrataError> {
        validate_max_height(total)?;
        validate_level_probability(p)?;
        Ok(GeometricalLevelGenerator { total, p, rng })
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl GeometricalLevelGenerator<SmallRng> {
    /// A reproducible generator; the same seed always yields the same heights.
    pub fn seeded(total: usize, p: f64, seed: u64) -> Result<Self, StrataError> {
        Self::new(total, p, SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy(total: usize, p: f64) -> Result<Self, StrataError> {
        Self::new(total, p, SmallRng::from_entropy())
    }
}

impl<R: Rng> LevelGenerator for GeometricalLevelGenerator<R> {
    fn random(&mut self) -> usize {
        let mut h = 1;
        while h < self.total && self.rng.gen::<f64>() < self.p {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}
