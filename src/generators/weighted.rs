// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Weighted draws over discrete outcomes.
//!
//! Every random decision in the generator goes through one of two shapes:
//! a cumulative frequency table (pick one bucket out of several) or a
//! fraction (a yes/no test). Both draw a uniform integer and compare.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a frequency table from raw weights
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightError {
    #[error("weight table is empty")]
    Empty,
    #[error("weights sum to zero")]
    ZeroTotal,
    #[error("weights sum past {}", u32::MAX)]
    Overflow,
}

/// Prefix-summed weights sampled by a uniform draw and a scan.
///
/// The last entry is the total weight. A draw `r` in `[0, total)` selects
/// the first bucket whose cumulative value is strictly greater than `r`,
/// so zero-weight buckets are never selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeTable {
    cumulative: Vec<u32>,
}

impl CumulativeTable {
    /// Build a table from per-bucket weights
    pub fn from_weights(weights: &[u32]) -> Result<Self, WeightError> {
        if weights.is_empty() {
            return Err(WeightError::Empty);
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut running = 0u32;
        for &weight in weights {
            running = running.checked_add(weight).ok_or(WeightError::Overflow)?;
            cumulative.push(running);
        }

        if running == 0 {
            return Err(WeightError::ZeroTotal);
        }

        Ok(Self { cumulative })
    }

    /// Total weight (the last cumulative entry)
    pub fn total(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Tables built through `from_weights` are never empty
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Cumulative values, one per bucket
    pub fn cumulative(&self) -> &[u32] {
        &self.cumulative
    }

    /// Bucket selected by a given roll in `[0, total)`
    pub fn bucket_for(&self, roll: u32) -> usize {
        self.cumulative
            .iter()
            .position(|&c| c > roll)
            .unwrap_or(self.cumulative.len().saturating_sub(1))
    }

    /// Draw a bucket index
    pub fn draw<R: Rng>(&self, rng: &mut R) -> usize {
        let roll = rng.gen_range(0..self.total());
        self.bucket_for(roll)
    }
}

/// A bernoulli test succeeding with probability `numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    /// A fair coin
    pub const HALF: Fraction = Fraction::new(1, 2);
    /// Always fails
    pub const NEVER: Fraction = Fraction::new(0, 1);
    /// Always succeeds
    pub const ALWAYS: Fraction = Fraction::new(1, 1);

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// A usable fraction has a positive denominator and is at most one
    pub fn is_valid(&self) -> bool {
        self.denominator >= 1 && self.numerator <= self.denominator
    }

    /// Run the test: draw in `[0, denominator)` and succeed below the numerator
    pub fn test<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen_range(0..self.denominator) < self.numerator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_prefix_sums() {
        let table = CumulativeTable::from_weights(&[2, 0, 3, 5]).unwrap();
        assert_eq!(table.cumulative(), &[2, 2, 5, 10]);
        assert_eq!(table.total(), 10);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_invalid_tables() {
        assert_eq!(CumulativeTable::from_weights(&[]), Err(WeightError::Empty));
        assert_eq!(
            CumulativeTable::from_weights(&[0, 0, 0]),
            Err(WeightError::ZeroTotal)
        );
        assert_eq!(
            CumulativeTable::from_weights(&[u32::MAX, 1]),
            Err(WeightError::Overflow)
        );
    }

    #[test]
    fn test_bucket_boundaries_are_strict() {
        let table = CumulativeTable::from_weights(&[2, 0, 3]).unwrap();
        assert_eq!(table.bucket_for(0), 0);
        assert_eq!(table.bucket_for(1), 0);
        // cumulative[0] == 2 is not > 2, and the empty bucket is skipped
        assert_eq!(table.bucket_for(2), 2);
        assert_eq!(table.bucket_for(4), 2);
    }

    #[test]
    fn test_draw_never_hits_empty_buckets() {
        let table = CumulativeTable::from_weights(&[0, 5, 0, 1]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut hits = [0usize; 4];
        for _ in 0..2000 {
            hits[table.draw(&mut rng)] += 1;
        }
        assert_eq!(hits[0], 0);
        assert_eq!(hits[2], 0);
        assert!(hits[1] > hits[3]);
        assert!(hits[3] > 0);
    }

    #[test]
    fn test_fraction_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            assert!(!Fraction::NEVER.test(&mut rng));
            assert!(Fraction::ALWAYS.test(&mut rng));
        }
    }

    #[test]
    fn test_fraction_half_is_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(99);
        let heads = (0..10_000).filter(|_| Fraction::HALF.test(&mut rng)).count();
        assert!(heads > 4_500 && heads < 5_500, "heads = {}", heads);
    }

    #[test]
    fn test_fraction_validity() {
        assert!(Fraction::new(0, 1).is_valid());
        assert!(Fraction::new(3, 3).is_valid());
        assert!(!Fraction::new(1, 0).is_valid());
        assert!(!Fraction::new(4, 3).is_valid());
    }
}
