// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recursive rhythm tree for the chords and melody lines.
//!
//! A bar is cut into `bar_size` equal beats. Each beat either splits into a
//! nested bar one level deeper, or becomes a leaf set. After a leaf, the
//! next beat may instead merge into it, lengthening the previous set.
//!
//! The chords line drives the melody: every chord leaf (and every merge
//! that lengthens one) immediately builds melody over the same span, using
//! that chord for note choice and the melody line's own split/merge odds.

use rand::Rng;
use tracing::trace;

use super::chord::{select_chord, ChordChoice};
use super::voicing::NoteChooser;
use super::GenerationError;
use crate::piece::{Line, PieceSettings};

/// Shortest beat a nested bar may be cut into, in time units
pub const MIN_BEAT_DURATION: u32 = 5;

/// What a single beat decision produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatOutcome {
    /// The beat became a nested bar
    Split,
    /// The beat became one set
    Leaf,
}

/// Which line a beat belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Voice {
    Chords,
    /// Melody under the chord currently sounding
    Melody(ChordChoice),
}

/// Check that a line's depth works with the bar.
///
/// Each of the first `depth_max` cuts must divide exactly and leave at least
/// `MIN_BEAT_DURATION`; the final cut down to leaf level must also be exact
/// so the sets of every bar add up to the bar. A one-beat bar never shrinks
/// when cut, so it only fits with no subdivision at all.
pub fn depth_fits_bar(depth_max: u32, bar_size: u32, bar_duration: u32) -> bool {
    match bar_size {
        0 => return false,
        1 => return depth_max == 0,
        _ => {}
    }

    let mut duration = bar_duration;
    for _ in 0..depth_max {
        if duration % bar_size != 0 || duration / bar_size < MIN_BEAT_DURATION {
            return false;
        }
        duration /= bar_size;
    }
    duration % bar_size == 0
}

/// Builds the sets of both lines of one piece
pub struct RhythmTreeBuilder<'a, R: Rng> {
    settings: &'a PieceSettings,
    chords: &'a mut Line,
    melody: &'a mut Line,
    rng: &'a mut R,
    /// Outcome of the last melody beat built under the current chord leaf
    melody_tail: Option<BeatOutcome>,
}

impl<'a, R: Rng> RhythmTreeBuilder<'a, R> {
    pub fn new(
        settings: &'a PieceSettings,
        chords: &'a mut Line,
        melody: &'a mut Line,
        rng: &'a mut R,
    ) -> Self {
        Self {
            settings,
            chords,
            melody,
            rng,
            melody_tail: None,
        }
    }

    /// Build every bar of the piece
    pub fn build(&mut self) -> Result<(), GenerationError> {
        for _ in 0..self.settings.bars {
            self.build_chords_bar(0, self.settings.bar_duration)?;
        }
        Ok(())
    }

    /// Build one bar of the chords line at `depth`
    pub fn build_chords_bar(&mut self, depth: u32, bar_duration: u32) -> Result<(), GenerationError> {
        self.build_bar(Voice::Chords, depth, bar_duration)
    }

    fn line_and_rng(&mut self, voice: Voice) -> (&mut Line, &mut R) {
        match voice {
            Voice::Chords => (&mut *self.chords, &mut *self.rng),
            Voice::Melody(_) => (&mut *self.melody, &mut *self.rng),
        }
    }

    fn build_bar(&mut self, voice: Voice, depth: u32, bar_duration: u32) -> Result<(), GenerationError> {
        let beat = bar_duration / self.settings.bar_size;
        let mut previous = self.build_beat(voice, depth, beat)?;

        for _ in 1..self.settings.bar_size {
            previous = if previous == BeatOutcome::Leaf && self.merge_passes(voice) {
                self.extend_leaf(voice, depth, beat)?
            } else {
                self.build_beat(voice, depth, beat)?
            };
        }

        Ok(())
    }

    fn merge_passes(&mut self, voice: Voice) -> bool {
        let (line, rng) = self.line_and_rng(voice);
        let merge = line.settings().merge;
        merge.test(rng)
    }

    /// Decide one beat: split into a nested bar, or finalize a leaf
    fn build_beat(&mut self, voice: Voice, depth: u32, duration: u32) -> Result<BeatOutcome, GenerationError> {
        let (line, rng) = self.line_and_rng(voice);
        let settings = line.settings();
        let split = depth < settings.depth_max && settings.split.test(rng);

        if split {
            self.build_bar(voice, depth + 1, duration)?;
            return Ok(BeatOutcome::Split);
        }

        let chord = self.finalize_leaf(voice, duration)?;
        if voice == Voice::Chords {
            let melody = self.build_beat(Voice::Melody(chord), depth, duration)?;
            self.melody_tail = Some(melody);
        }
        Ok(BeatOutcome::Leaf)
    }

    /// Append a new set to the line and move its pitch reference
    fn finalize_leaf(&mut self, voice: Voice, duration: u32) -> Result<ChordChoice, GenerationError> {
        let settings = self.settings;
        let chooser = NoteChooser::new(&settings.scale);
        let chord = match voice {
            Voice::Chords => select_chord(&settings.chord_positions, self.rng),
            Voice::Melody(chord) => chord,
        };

        let (line, rng) = self.line_and_rng(voice);
        let notes = chooser.choose_notes(
            line.settings().richness(chord.class),
            chord,
            line.pitch_ref(),
            line.settings().range,
            rng,
        );
        trace!(?voice, ?chord, ?notes, start = line.duration(), duration, "leaf");
        line.push_set(chord, notes, duration)?;
        line.drift_reference(rng);

        Ok(chord)
    }

    /// Lengthen the previous leaf by one beat
    fn extend_leaf(&mut self, voice: Voice, depth: u32, span: u32) -> Result<BeatOutcome, GenerationError> {
        let (line, rng) = self.line_and_rng(voice);
        let chord = match line.extend_last(span) {
            Some(chord) => chord,
            None => return self.build_beat(voice, depth, span),
        };
        line.drift_reference(rng);

        if voice == Voice::Chords {
            let melody_voice = Voice::Melody(chord);
            let melody = if self.melody_tail == Some(BeatOutcome::Leaf) && self.merge_passes(melody_voice) {
                self.extend_leaf(melody_voice, depth, span)?
            } else {
                self.build_beat(melody_voice, depth, span)?
            };
            self.melody_tail = Some(melody);
        }

        Ok(BeatOutcome::Leaf)
    }
}

/// Generate both lines of a piece into the given (empty) lines
pub fn build_piece<R: Rng>(
    settings: &PieceSettings,
    chords: &mut Line,
    melody: &mut Line,
    rng: &mut R,
) -> Result<(), GenerationError> {
    RhythmTreeBuilder::new(settings, chords, melody, rng).build()
}
