// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Stochastic engines that fill a piece with note sets.
//!
//! The rhythm tree decides *when* sets happen; chord selection, note
//! voicing and the pitch reference walk decide *what* they contain. Every
//! random decision takes the caller's RNG explicitly so a fixed seed
//! reproduces a piece exactly.

pub mod chord;
pub mod drift;
pub mod rhythm;
pub mod voicing;
pub mod weighted;

use std::collections::TryReserveError;

use thiserror::Error;

pub use chord::{select_chord, ChordChoice, ChordClass, CHORD_POSITIONS};
pub use drift::drift_reference;
pub use rhythm::{build_piece, depth_fits_bar, BeatOutcome, RhythmTreeBuilder, MIN_BEAT_DURATION};
pub use voicing::{NoteChooser, PitchRange, Voicing};
pub use weighted::{CumulativeTable, Fraction, WeightError};

/// Errors that abort generation of the piece in progress
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("out of memory while adding a note set: {0}")]
    Resource(#[from] TryReserveError),
}
