// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note selection and voicing for a single rhythmic leaf.
//!
//! Choosing the notes of a set happens in three steps:
//!
//! 1. Draw how many notes to play from the line's richness table, then draw
//!    that many distinct chord tones.
//! 2. Try every inversion of the sorted tones and, for each one, raise it
//!    octave by octave while that brings it closer to the pitch reference.
//!    The inversion and octave with the smallest total distance win.
//! 3. Trim the winning voicing to the line's pitch range.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chord::ChordChoice;
use super::weighted::CumulativeTable;
use crate::music::{MidiNote, Scale, OCTAVE};

/// Inclusive pitch bounds of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchRange {
    pub min: MidiNote,
    pub max: MidiNote,
}

impl PitchRange {
    pub fn new(min: MidiNote, max: MidiNote) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, pitch: MidiNote) -> bool {
        pitch >= self.min && pitch <= self.max
    }

    /// Clamp a pitch into the range
    pub fn clamp(&self, pitch: MidiNote) -> MidiNote {
        pitch.clamp(self.min, self.max)
    }
}

/// The best inversion/octave found for a set of chord tones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Voicing {
    /// How many of the lowest tones were moved up an octave
    pub rotation: usize,
    /// Octaves added to every tone after rotation
    pub octave: i32,
    /// Sum of distances from the pitch reference
    pub deviation: i32,
    /// Resulting ascending pitches, before range clipping
    pub notes: Vec<i32>,
}

/// Total distance of `notes` raised by `octave` octaves from `reference`
pub fn deviation(notes: &[i32], octave: i32, reference: i32) -> i32 {
    notes
        .iter()
        .map(|&n| (n + OCTAVE * octave - reference).abs())
        .sum()
}

/// Raise notes octave by octave from zero while the deviation strictly drops.
///
/// Only upward moves are tried; base pitches start in the lowest octave.
pub fn best_octave(notes: &[i32], reference: i32) -> (i32, i32) {
    let mut octave = 0;
    let mut best = deviation(notes, 0, reference);
    loop {
        let next = deviation(notes, octave + 1, reference);
        if next >= best {
            return (octave, best);
        }
        octave += 1;
        best = next;
    }
}

/// Inversion `rotation` of ascending tones: the lowest `rotation` tones go
/// up an octave and move to the top.
pub fn rotate(sorted: &[i32], rotation: usize) -> Vec<i32> {
    let rotation = rotation.min(sorted.len());
    sorted[rotation..]
        .iter()
        .copied()
        .chain(sorted[..rotation].iter().map(|&n| n + OCTAVE))
        .collect()
}

/// Find the inversion and octave closest to the reference.
///
/// Ties keep the lowest rotation.
pub fn fit_voicing(sorted: &[i32], reference: MidiNote) -> Voicing {
    let reference = i32::from(reference);
    let mut best: Option<Voicing> = None;

    for rotation in 0..sorted.len() {
        let rotated = rotate(sorted, rotation);
        let (octave, deviation) = best_octave(&rotated, reference);
        if best.as_ref().map_or(true, |b| deviation < b.deviation) {
            best = Some(Voicing {
                rotation,
                octave,
                deviation,
                notes: rotated.iter().map(|&n| n + OCTAVE * octave).collect(),
            });
        }
    }

    best.unwrap_or_default()
}

/// Drop notes below the range from the bottom and above it from the top.
///
/// `notes` must be ascending, so only a prefix and a suffix are removed.
pub fn clip_to_range(notes: &[i32], range: PitchRange) -> Vec<MidiNote> {
    let (min, max) = (i32::from(range.min), i32::from(range.max));
    let low = notes.iter().take_while(|&&n| n < min).count();
    let high = notes.len() - notes.iter().rev().take_while(|&&n| n > max).count();
    notes[low..high.max(low)]
        .iter()
        .map(|&n| n as MidiNote)
        .collect()
}

/// Picks and voices the notes of one set within a scale
#[derive(Debug, Clone, Copy)]
pub struct NoteChooser<'a> {
    scale: &'a Scale,
}

impl<'a> NoteChooser<'a> {
    pub fn new(scale: &'a Scale) -> Self {
        Self { scale }
    }

    /// Draw `count` distinct chord tones as base pitches
    pub fn chord_tones<R: Rng>(&self, chord: ChordChoice, count: usize, rng: &mut R) -> Vec<i32> {
        let shape = chord.class.shape();
        let count = count.min(shape.len());
        let mut tones = Vec::with_capacity(count);

        while tones.len() < count {
            let step = shape[rng.gen_range(0..shape.len())];
            let pitch = i32::from(self.scale.base_pitch(chord.degree as usize + step));
            if !tones.contains(&pitch) {
                tones.push(pitch);
            }
        }

        tones
    }

    /// Choose the notes of a set: richness draw, tone draw, voicing, clipping
    pub fn choose_notes<R: Rng>(
        &self,
        richness: &CumulativeTable,
        chord: ChordChoice,
        reference: MidiNote,
        range: PitchRange,
        rng: &mut R,
    ) -> Vec<MidiNote> {
        let count = richness.draw(rng);
        let mut tones = self.chord_tones(chord, count, rng);
        if tones.is_empty() {
            return Vec::new();
        }

        tones.sort_unstable();
        let voicing = fit_voicing(&tones, reference);
        clip_to_range(&voicing.notes, range)
    }
}
