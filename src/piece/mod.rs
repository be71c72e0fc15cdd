// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generated pieces and the lines and note sets they own.
//!
//! A piece is two independent lines (chords and melody). Each line owns an
//! append-only list of note sets laid end to end in time: every set starts
//! where the previous one ended.

pub mod store;

pub use store::{PieceStore, StoreError};

use rand::Rng;

use crate::generators::chord::{ChordChoice, ChordClass};
use crate::generators::drift::drift_reference;
use crate::generators::voicing::PitchRange;
use crate::generators::weighted::{CumulativeTable, Fraction};
use crate::generators::GenerationError;
use crate::music::{MidiNote, Scale};

/// Validated per-line generation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSettings {
    /// Deepest subdivision level a beat may split to
    pub depth_max: u32,
    /// Chance that a beat splits into a nested bar
    pub split: Fraction,
    /// Chance that a beat extends the previous leaf instead of starting a new one
    pub merge: Fraction,
    /// Note-count distribution for triads (0..=3 notes)
    pub richness_triad: CumulativeTable,
    /// Note-count distribution for sevenths (0..=4 notes)
    pub richness_seventh: CumulativeTable,
    pub range: PitchRange,
    /// Per-step continuation chance of the pitch reference walk
    pub reference_drift: Fraction,
}

impl LineSettings {
    /// Richness table for a chord class
    pub fn richness(&self, class: ChordClass) -> &CumulativeTable {
        match class {
            ChordClass::Triad => &self.richness_triad,
            ChordClass::Seventh => &self.richness_seventh,
        }
    }
}

/// Validated settings for one piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSettings {
    pub scale: Scale,
    pub bars: u32,
    /// Beats per bar, and the split factor of nested bars
    pub bar_size: u32,
    /// Bar length in time units
    pub bar_duration: u32,
    /// 14 buckets: triads on degrees 0-6, then sevenths on degrees 0-6
    pub chord_positions: CumulativeTable,
    pub chords: LineSettings,
    pub melody: LineSettings,
}

impl PieceSettings {
    /// Total piece length in time units
    pub fn duration(&self) -> u32 {
        self.bars.saturating_mul(self.bar_duration)
    }
}

/// One rhythmic leaf: zero or more simultaneous notes over a time span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSet {
    pub chord: ChordChoice,
    /// Ascending, distinct pitches
    pub notes: Vec<MidiNote>,
    pub start: u32,
    pub duration: u32,
}

impl NoteSet {
    pub fn end(&self) -> u32 {
        self.start + self.duration
    }
}

/// A single note ready for output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub pitch: MidiNote,
    /// Absolute start in time units
    pub start: u64,
    pub duration: u32,
}

/// One voice of a piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    settings: LineSettings,
    pitch_ref: MidiNote,
    duration: u32,
    sets: Vec<NoteSet>,
}

impl Line {
    /// Create an empty line with a pitch reference drawn uniformly in range
    pub fn new<R: Rng>(settings: LineSettings, rng: &mut R) -> Self {
        let pitch_ref = rng.gen_range(settings.range.min..=settings.range.max);
        Self::with_reference(settings, pitch_ref)
    }

    /// Create an empty line with a given pitch reference (clamped into range)
    pub fn with_reference(settings: LineSettings, pitch_ref: MidiNote) -> Self {
        let pitch_ref = settings.range.clamp(pitch_ref);
        Self {
            settings,
            pitch_ref,
            duration: 0,
            sets: Vec::new(),
        }
    }

    pub fn settings(&self) -> &LineSettings {
        &self.settings
    }

    /// Current pitch reference
    pub fn pitch_ref(&self) -> MidiNote {
        self.pitch_ref
    }

    /// Time covered so far
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn sets(&self) -> &[NoteSet] {
        &self.sets
    }

    /// Append a set starting where the line currently ends
    pub fn push_set(
        &mut self,
        chord: ChordChoice,
        notes: Vec<MidiNote>,
        duration: u32,
    ) -> Result<&NoteSet, GenerationError> {
        self.sets.try_reserve(1)?;
        self.sets.push(NoteSet {
            chord,
            notes,
            start: self.duration,
            duration,
        });
        self.duration += duration;
        Ok(&self.sets[self.sets.len() - 1])
    }

    /// Lengthen the last set by `span`; returns its chord, or `None` on an empty line
    pub fn extend_last(&mut self, span: u32) -> Option<ChordChoice> {
        let last = self.sets.last_mut()?;
        last.duration += span;
        self.duration += span;
        Some(last.chord)
    }

    /// Advance the pitch reference walk by one step
    pub fn drift_reference<R: Rng>(&mut self, rng: &mut R) {
        self.pitch_ref = drift_reference(
            self.pitch_ref,
            self.settings.range,
            self.settings.reference_drift,
            rng,
        );
    }

    /// Every note of the line in order, shifted by `offset`
    pub fn events(&self, offset: u64) -> impl Iterator<Item = NoteEvent> + '_ {
        self.sets.iter().flat_map(move |set| {
            set.notes.iter().map(move |&pitch| NoteEvent {
                pitch,
                start: offset + u64::from(set.start),
                duration: set.duration,
            })
        })
    }
}

/// A generated composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    settings: PieceSettings,
    chords: Line,
    melody: Line,
}

impl Piece {
    pub fn new(settings: PieceSettings, chords: Line, melody: Line) -> Self {
        Self {
            settings,
            chords,
            melody,
        }
    }

    pub fn settings(&self) -> &PieceSettings {
        &self.settings
    }

    pub fn chords(&self) -> &Line {
        &self.chords
    }

    pub fn melody(&self) -> &Line {
        &self.melody
    }

    /// Total length in time units
    pub fn duration(&self) -> u32 {
        self.settings.duration()
    }

    /// The chords line in full, then the melody line in full
    pub fn events(&self, offset: u64) -> impl Iterator<Item = NoteEvent> + '_ {
        self.chords.events(offset).chain(self.melody.events(offset))
    }
}
