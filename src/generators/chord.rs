// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord selection for the chords line.
//!
//! A chord is a scale degree plus a chord class. The class fixes which
//! scale steps above the root are chord tones; the degree is drawn from a
//! 14-bucket position table (seven triads, then seven sevenths).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weighted::CumulativeTable;
use crate::music::SCALE_SIZE;

/// Number of buckets in a chord position table
pub const CHORD_POSITIONS: usize = SCALE_SIZE * 2;

/// Chord classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordClass {
    /// Root, third, fifth
    Triad,
    /// Root, third, fifth, seventh
    Seventh,
}

impl ChordClass {
    /// Scale steps above the root that make up the chord
    pub fn shape(self) -> &'static [usize] {
        match self {
            ChordClass::Triad => &[0, 2, 4],
            ChordClass::Seventh => &[0, 2, 4, 6],
        }
    }

    /// Number of distinct chord tones
    pub fn size(self) -> usize {
        self.shape().len()
    }
}

/// A chosen chord: 0-based scale degree of the root and its class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordChoice {
    pub degree: u8,
    pub class: ChordClass,
}

impl ChordChoice {
    pub fn new(degree: u8, class: ChordClass) -> Self {
        Self { degree, class }
    }

    /// Map a position-table bucket to a chord
    pub fn from_bucket(bucket: usize) -> Self {
        if bucket < SCALE_SIZE {
            Self::new(bucket as u8, ChordClass::Triad)
        } else {
            Self::new(((bucket - SCALE_SIZE) % SCALE_SIZE) as u8, ChordClass::Seventh)
        }
    }
}

/// Draw the next chord from a position table
pub fn select_chord<R: Rng>(positions: &CumulativeTable, rng: &mut R) -> ChordChoice {
    ChordChoice::from_bucket(positions.draw(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn positions(weights: [u32; CHORD_POSITIONS]) -> CumulativeTable {
        CumulativeTable::from_weights(&weights).unwrap()
    }

    #[test]
    fn test_chord_shapes() {
        assert_eq!(ChordClass::Triad.shape(), &[0, 2, 4]);
        assert_eq!(ChordClass::Seventh.shape(), &[0, 2, 4, 6]);
        assert_eq!(ChordClass::Triad.size(), 3);
        assert_eq!(ChordClass::Seventh.size(), 4);
    }

    #[test]
    fn test_bucket_mapping() {
        assert_eq!(ChordChoice::from_bucket(0), ChordChoice::new(0, ChordClass::Triad));
        assert_eq!(ChordChoice::from_bucket(6), ChordChoice::new(6, ChordClass::Triad));
        assert_eq!(ChordChoice::from_bucket(7), ChordChoice::new(0, ChordClass::Seventh));
        assert_eq!(ChordChoice::from_bucket(11), ChordChoice::new(4, ChordClass::Seventh));
    }

    #[test]
    fn test_forced_tonic_triad() {
        let mut weights = [0; CHORD_POSITIONS];
        weights[0] = 3;
        let table = positions(weights);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..200 {
            assert_eq!(
                select_chord(&table, &mut rng),
                ChordChoice::new(0, ChordClass::Triad)
            );
        }
    }

    #[test]
    fn test_forced_dominant_seventh() {
        let mut weights = [0; CHORD_POSITIONS];
        weights[SCALE_SIZE + 4] = 1;
        let table = positions(weights);
        let mut rng = StdRng::seed_from_u64(6);

        let chord = select_chord(&table, &mut rng);
        assert_eq!(chord.degree, 4);
        assert_eq!(chord.class, ChordClass::Seventh);
    }

    #[test]
    fn test_mixed_table_covers_both_classes() {
        let mut weights = [0; CHORD_POSITIONS];
        weights[3] = 1;
        weights[SCALE_SIZE + 3] = 1;
        let table = positions(weights);
        let mut rng = StdRng::seed_from_u64(11);

        let mut triads = 0;
        let mut sevenths = 0;
        for _ in 0..400 {
            let chord = select_chord(&table, &mut rng);
            assert_eq!(chord.degree, 3);
            match chord.class {
                ChordClass::Triad => triads += 1,
                ChordClass::Seventh => sevenths += 1,
            }
        }
        assert!(triads > 100 && sevenths > 100);
    }
}
