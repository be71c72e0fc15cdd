// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for chordtree.
//!
//! A composition file lists the pieces to generate and, optionally, the
//! order in which to render them. Files are YAML, or TOML when the path
//! ends in `.toml`. Raw weights are validated and prefix-summed into
//! [`PieceSettings`] before any generation starts.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generators::rhythm::{depth_fits_bar, MIN_BEAT_DURATION};
use crate::generators::voicing::PitchRange;
use crate::generators::weighted::{CumulativeTable, Fraction, WeightError};
use crate::music::{Note, Scale, ScaleType, PITCH_MAX, SCALE_SIZE};
use crate::piece::{LineSettings, PieceSettings};

/// Configuration errors, all detected before generation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("composition has no pieces")]
    NoPieces,
    #[error("piece {piece}: invalid tonic {value}")]
    InvalidTonic { piece: usize, value: String },
    #[error("piece {piece}: {field} must be at least 1")]
    ZeroField { piece: usize, field: &'static str },
    #[error("piece {piece}: total duration overflows")]
    DurationOverflow { piece: usize },
    #[error("piece {piece}: invalid {table}: {source}")]
    Weights {
        piece: usize,
        table: String,
        source: WeightError,
    },
    #[error("piece {piece}: invalid {line} {field} fraction {numerator}/{denominator}")]
    InvalidFraction {
        piece: usize,
        line: &'static str,
        field: &'static str,
        numerator: u32,
        denominator: u32,
    },
    #[error(
        "piece {piece}: depth {depth_max} of {line} is not compatible with bar \
         (size {bar_size}, duration {bar_duration}, minimum beat {min_beat})",
        min_beat = MIN_BEAT_DURATION
    )]
    IncompatibleDepth {
        piece: usize,
        line: &'static str,
        depth_max: u32,
        bar_size: u32,
        bar_duration: u32,
    },
    #[error("piece {piece}: {line} pitch {pitch} above {max}", max = PITCH_MAX)]
    PitchOutOfRange {
        piece: usize,
        line: &'static str,
        pitch: u8,
    },
    #[error("piece {piece}: {line} minimum pitch {min} above maximum pitch {max}")]
    InvertedRange {
        piece: usize,
        line: &'static str,
        min: u8,
        max: u8,
    },
    #[error(
        "piece {piece}: melody minimum pitch {melody_min} must be above chords maximum pitch {chords_max}"
    )]
    RangeConflict {
        piece: usize,
        chords_max: u8,
        melody_min: u8,
    },
}

/// Root of a composition file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionFile {
    /// Pieces to generate, in index order
    pub pieces: Vec<PieceConfig>,
    /// Piece indices to render; every piece in order when absent
    #[serde(default)]
    pub render: Option<Vec<usize>>,
}

impl CompositionFile {
    /// Load a composition from a YAML or TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read composition file: {:?}", path))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Parse a composition from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML composition")
    }

    /// Parse a composition from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML composition")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize composition to YAML")
    }

    /// Validate every piece
    pub fn validate(&self) -> Result<Vec<PieceSettings>, ConfigError> {
        if self.pieces.is_empty() {
            return Err(ConfigError::NoPieces);
        }
        self.pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| piece.validate(index))
            .collect()
    }

    /// Indices to render when no order is given on the command line
    pub fn render_order(&self) -> Vec<usize> {
        self.render
            .clone()
            .unwrap_or_else(|| (0..self.pieces.len()).collect())
    }
}

/// Tonic given as a pitch class or a note name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TonicValue {
    PitchClass(i64),
    Name(String),
}

impl TonicValue {
    pub fn to_note(&self) -> Option<Note> {
        match self {
            TonicValue::PitchClass(pc) => u8::try_from(*pc).ok().and_then(Note::from_pitch_class),
            TonicValue::Name(name) => Note::parse(name),
        }
    }
}

impl Default for TonicValue {
    fn default() -> Self {
        TonicValue::PitchClass(0)
    }
}

/// Chord position weights: one per scale degree for each chord class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChordWeights {
    pub triad: [u32; SCALE_SIZE],
    pub seventh: [u32; SCALE_SIZE],
}

/// Settings of one piece, as written in the file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieceConfig {
    #[serde(default)]
    pub tonic: TonicValue,
    /// Harmonic minor instead of major
    #[serde(default)]
    pub minor: bool,
    pub bars: u32,
    pub bar_size: u32,
    pub bar_duration: u32,
    pub chord_weights: ChordWeights,
    pub chords: LineConfig,
    pub melody: LineConfig,
}

impl PieceConfig {
    /// Check every field and build generation settings
    pub fn validate(&self, piece: usize) -> Result<PieceSettings, ConfigError> {
        let tonic = self.tonic.to_note().ok_or_else(|| ConfigError::InvalidTonic {
            piece,
            value: match &self.tonic {
                TonicValue::PitchClass(pc) => pc.to_string(),
                TonicValue::Name(name) => name.clone(),
            },
        })?;

        for (field, value) in [
            ("bars", self.bars),
            ("bar_size", self.bar_size),
            ("bar_duration", self.bar_duration),
        ] {
            if value < 1 {
                return Err(ConfigError::ZeroField { piece, field });
            }
        }
        if self.bars.checked_mul(self.bar_duration).is_none() {
            return Err(ConfigError::DurationOverflow { piece });
        }

        let positions: Vec<u32> = self
            .chord_weights
            .triad
            .iter()
            .chain(self.chord_weights.seventh.iter())
            .copied()
            .collect();
        let chord_positions =
            CumulativeTable::from_weights(&positions).map_err(|source| ConfigError::Weights {
                piece,
                table: "chord weights".to_string(),
                source,
            })?;

        let chords = self.chords.validate(piece, "chords", self.bar_size, self.bar_duration)?;
        let melody = self.melody.validate(piece, "melody", self.bar_size, self.bar_duration)?;
        if melody.range.min <= chords.range.max {
            return Err(ConfigError::RangeConflict {
                piece,
                chords_max: chords.range.max,
                melody_min: melody.range.min,
            });
        }

        Ok(PieceSettings {
            scale: Scale::new(tonic, ScaleType::from_minor_flag(self.minor)),
            bars: self.bars,
            bar_size: self.bar_size,
            bar_duration: self.bar_duration,
            chord_positions,
            chords,
            melody,
        })
    }
}

/// Settings of one line, as written in the file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineConfig {
    #[serde(default)]
    pub depth_max: u32,
    pub split: Fraction,
    pub merge: Fraction,
    /// Weights for playing 0, 1, 2 or 3 notes of a triad
    pub richness_triad: [u32; 4],
    /// Weights for playing 0 to 4 notes of a seventh chord
    pub richness_seventh: [u32; 5],
    pub pitch_min: u8,
    pub pitch_max: u8,
    pub reference_drift: Fraction,
}

impl LineConfig {
    fn validate(
        &self,
        piece: usize,
        line: &'static str,
        bar_size: u32,
        bar_duration: u32,
    ) -> Result<LineSettings, ConfigError> {
        if !depth_fits_bar(self.depth_max, bar_size, bar_duration) {
            return Err(ConfigError::IncompatibleDepth {
                piece,
                line,
                depth_max: self.depth_max,
                bar_size,
                bar_duration,
            });
        }

        for (field, fraction) in [
            ("split", self.split),
            ("merge", self.merge),
            ("reference_drift", self.reference_drift),
        ] {
            if !fraction.is_valid() {
                return Err(ConfigError::InvalidFraction {
                    piece,
                    line,
                    field,
                    numerator: fraction.numerator,
                    denominator: fraction.denominator,
                });
            }
        }

        let table = |name: &str, weights: &[u32]| {
            CumulativeTable::from_weights(weights).map_err(|source| ConfigError::Weights {
                piece,
                table: format!("{} {}", line, name),
                source,
            })
        };
        let richness_triad = table("triad richness", &self.richness_triad)?;
        let richness_seventh = table("seventh richness", &self.richness_seventh)?;

        for pitch in [self.pitch_min, self.pitch_max] {
            if pitch > PITCH_MAX {
                return Err(ConfigError::PitchOutOfRange { piece, line, pitch });
            }
        }
        if self.pitch_min > self.pitch_max {
            return Err(ConfigError::InvertedRange {
                piece,
                line,
                min: self.pitch_min,
                max: self.pitch_max,
            });
        }

        Ok(LineSettings {
            depth_max: self.depth_max,
            split: self.split,
            merge: self.merge,
            richness_triad,
            richness_seventh,
            range: PitchRange::new(self.pitch_min, self.pitch_max),
            reference_drift: self.reference_drift,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
pieces:
  - tonic: "A"
    minor: true
    bars: 2
    bar_size: 4
    bar_duration: 400
    chord_weights:
      triad: [6, 1, 1, 3, 4, 2, 0]
      seventh: [0, 1, 0, 0, 3, 0, 1]
    chords:
      depth_max: 1
      split: { numerator: 1, denominator: 4 }
      merge: { numerator: 1, denominator: 2 }
      richness_triad: [0, 1, 2, 6]
      richness_seventh: [0, 1, 1, 3, 6]
      pitch_min: 40
      pitch_max: 64
      reference_drift: { numerator: 1, denominator: 3 }
    melody:
      depth_max: 1
      split: { numerator: 2, denominator: 3 }
      merge: { numerator: 1, denominator: 4 }
      richness_triad: [1, 8, 0, 0]
      richness_seventh: [1, 8, 0, 0, 0]
      pitch_min: 65
      pitch_max: 90
      reference_drift: { numerator: 1, denominator: 2 }
render: [0, 0]
"#;

    fn sample() -> CompositionFile {
        CompositionFile::from_yaml(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_composition() {
        let file = sample();
        assert_eq!(file.pieces.len(), 1);
        assert_eq!(file.pieces[0].tonic, TonicValue::Name("A".to_string()));
        assert_eq!(file.pieces[0].chords.split, Fraction::new(1, 4));
        assert_eq!(file.render_order(), vec![0, 0]);
    }

    #[test]
    fn test_validate_builds_settings() {
        let settings = sample().validate().unwrap();
        let piece = &settings[0];
        assert_eq!(piece.scale, Scale::new(Note::A, ScaleType::Minor));
        assert_eq!(piece.chord_positions.len(), 14);
        assert_eq!(piece.chord_positions.total(), 22);
        assert_eq!(piece.chords.richness_triad.cumulative(), &[0, 1, 3, 9]);
        assert_eq!(piece.melody.range, PitchRange::new(65, 90));
        assert_eq!(piece.duration(), 800);
    }

    #[test]
    fn test_default_render_order() {
        let mut file = sample();
        file.render = None;
        file.pieces.push(file.pieces[0].clone());
        assert_eq!(file.render_order(), vec![0, 1]);
    }

    #[test]
    fn test_numeric_tonic() {
        assert_eq!(TonicValue::PitchClass(11).to_note(), Some(Note::B));
        assert_eq!(TonicValue::PitchClass(12).to_note(), None);
        assert_eq!(TonicValue::PitchClass(-1).to_note(), None);

        let mut file = sample();
        file.pieces[0].tonic = TonicValue::PitchClass(14);
        assert!(matches!(
            file.validate(),
            Err(ConfigError::InvalidTonic { piece: 0, .. })
        ));
    }

    #[test]
    fn test_no_pieces() {
        let file = CompositionFile { pieces: Vec::new(), render: None };
        assert_eq!(file.validate(), Err(ConfigError::NoPieces));
    }

    #[test]
    fn test_zero_fields() {
        let mut file = sample();
        file.pieces[0].bar_size = 0;
        assert_eq!(
            file.validate(),
            Err(ConfigError::ZeroField { piece: 0, field: "bar_size" })
        );
    }

    #[test]
    fn test_incompatible_depth() {
        let mut file = sample();
        // 400 -> 100 -> 25, then 25 does not split into 4
        file.pieces[0].melody.depth_max = 2;
        assert!(matches!(
            file.validate(),
            Err(ConfigError::IncompatibleDepth { line: "melody", depth_max: 2, .. })
        ));
    }

    #[test]
    fn test_single_beat_bar_rejects_depth() {
        let mut file = sample();
        file.pieces[0].bar_size = 1;
        file.pieces[0].bar_duration = 5;
        file.pieces[0].chords.depth_max = 200_000;
        file.pieces[0].chords.split = Fraction::ALWAYS;
        file.pieces[0].melody.depth_max = 0;
        assert!(matches!(
            file.validate(),
            Err(ConfigError::IncompatibleDepth {
                line: "chords",
                depth_max: 200_000,
                bar_size: 1,
                ..
            })
        ));

        // Without subdivision a one-beat bar is fine
        file.pieces[0].chords.depth_max = 0;
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_zero_weight_table() {
        let mut file = sample();
        file.pieces[0].chords.richness_seventh = [0; 5];
        assert!(matches!(
            file.validate(),
            Err(ConfigError::Weights { source: WeightError::ZeroTotal, .. })
        ));
    }

    #[test]
    fn test_invalid_fraction() {
        let mut file = sample();
        file.pieces[0].chords.merge = Fraction::new(1, 0);
        assert!(matches!(
            file.validate(),
            Err(ConfigError::InvalidFraction { field: "merge", .. })
        ));

        file.pieces[0].chords.merge = Fraction::new(5, 4);
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_pitch_checks() {
        let mut file = sample();
        file.pieces[0].melody.pitch_max = 130;
        assert!(matches!(
            file.validate(),
            Err(ConfigError::PitchOutOfRange { pitch: 130, .. })
        ));

        let mut file = sample();
        file.pieces[0].chords.pitch_min = 70;
        assert!(matches!(
            file.validate(),
            Err(ConfigError::InvertedRange { min: 70, max: 64, .. })
        ));
    }

    #[test]
    fn test_range_conflict() {
        let mut file = sample();
        file.pieces[0].melody.pitch_min = 64;
        assert_eq!(
            file.validate(),
            Err(ConfigError::RangeConflict { piece: 0, chords_max: 64, melody_min: 64 })
        );
    }

    #[test]
    fn test_duration_overflow() {
        let mut file = sample();
        file.pieces[0].bars = u32::MAX;
        assert_eq!(file.validate(), Err(ConfigError::DurationOverflow { piece: 0 }));
    }

    #[test]
    fn test_round_trip_yaml() {
        let original = sample();
        let parsed = CompositionFile::from_yaml(&original.to_yaml().unwrap()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_load_toml_file() {
        let toml_text = r#"
render = [0]

[[pieces]]
tonic = 7
bars = 1
bar_size = 2
bar_duration = 100

[pieces.chord_weights]
triad = [1, 0, 0, 1, 1, 0, 0]
seventh = [0, 0, 0, 0, 1, 0, 0]

[pieces.chords]
split = { numerator = 0, denominator = 1 }
merge = { numerator = 1, denominator = 2 }
richness_triad = [0, 0, 1, 1]
richness_seventh = [0, 0, 1, 1, 1]
pitch_min = 36
pitch_max = 60
reference_drift = { numerator = 1, denominator = 2 }

[pieces.melody]
split = { numerator = 0, denominator = 1 }
merge = { numerator = 1, denominator = 2 }
richness_triad = [0, 1, 0, 0]
richness_seventh = [0, 1, 0, 0, 0]
pitch_min = 61
pitch_max = 84
reference_drift = { numerator = 1, denominator = 2 }
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("piece.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(toml_text.as_bytes()).unwrap();

        let composition = CompositionFile::load(&path).unwrap();
        let settings = composition.validate().unwrap();
        assert_eq!(settings[0].scale.tonic(), Note::G);
        assert_eq!(settings[0].scale.scale_type(), ScaleType::Major);
        assert_eq!(settings[0].chords.depth_max, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CompositionFile::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(CompositionFile::from_yaml("pieces: [").is_err());
    }
}
