// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale and tonic definitions for chord construction.
//!
//! A piece is written in one of two seven-note scales rooted on a tonic.
//! Chord tones are looked up by scale degree and returned as base pitches
//! in the lowest octave, before any octave placement happens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Number of degrees in every supported scale
pub const SCALE_SIZE: usize = 7;

/// Semitones in one octave
pub const OCTAVE: i32 = 12;

/// Highest valid MIDI pitch
pub const PITCH_MAX: MidiNote = 127;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        Note::ALL
            .iter()
            .position(|&n| n == self)
            .map(|i| i as u8)
            .unwrap_or(0)
    }

    /// Get note from pitch class, `None` above 11
    pub fn from_pitch_class(pc: u8) -> Option<Self> {
        Note::ALL.get(pc as usize).copied()
    }

    /// Parse note from string (e.g., "C", "C#", "Db", "F#")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" | "BS" => Some(Note::C),
            "C#" | "CS" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "DS" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" | "ES" => Some(Note::F),
            "F#" | "FS" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "GS" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "AS" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Scale types a piece can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,
    /// Harmonic minor (natural minor with a raised seventh)
    Minor,
}

impl ScaleType {
    /// Get the intervals (semitones from root) for this scale type
    pub fn intervals(self) -> [u8; SCALE_SIZE] {
        match self {
            ScaleType::Major => [0, 2, 4, 5, 7, 9, 11],
            ScaleType::Minor => [0, 2, 3, 5, 7, 8, 11],
        }
    }

    /// Scale type selected by a minor flag
    pub fn from_minor_flag(minor: bool) -> Self {
        if minor {
            ScaleType::Minor
        } else {
            ScaleType::Major
        }
    }

    /// Get a human-readable name for this scale type
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::Minor => "Minor",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A seven-note scale rooted on a tonic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    tonic: Note,
    scale_type: ScaleType,
    intervals: [u8; SCALE_SIZE],
}

impl Scale {
    /// Create a new scale from tonic and type
    pub fn new(tonic: Note, scale_type: ScaleType) -> Self {
        Self {
            tonic,
            scale_type,
            intervals: scale_type.intervals(),
        }
    }

    /// Get the tonic note
    pub fn tonic(&self) -> Note {
        self.tonic
    }

    /// Get the scale type
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Base pitch of a 0-based scale degree, wrapping past the seventh.
    ///
    /// The result is `interval + tonic` without reduction modulo 12, so it
    /// lies in `0..=22` and keeps the scale's ascending order from the tonic.
    pub fn base_pitch(&self, degree: usize) -> MidiNote {
        self.intervals[degree % SCALE_SIZE] + self.tonic.pitch_class()
    }

    /// Check if a MIDI note belongs to this scale
    pub fn contains_midi(&self, midi_note: MidiNote) -> bool {
        let pc = (midi_note % 12 + 12 - self.tonic.pitch_class()) % 12;
        self.intervals.contains(&pc)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.scale_type)
    }
}
