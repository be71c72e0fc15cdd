// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for chordtree.
//!
//! This module provides the scale definitions and pitch constants used
//! when turning chord degrees into concrete notes.

pub mod scale;

pub use scale::{MidiNote, Note, Scale, ScaleType, OCTAVE, PITCH_MAX, SCALE_SIZE};
