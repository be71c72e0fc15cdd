// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Append-only storage for generated pieces.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use super::{Line, Piece, PieceSettings};
use crate::generators::{build_piece, GenerationError};

/// Lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("piece index {index} out of range ({len} pieces)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Owns every generated piece for the lifetime of a run
#[derive(Debug, Default)]
pub struct PieceStore {
    pieces: Vec<Piece>,
}

impl PieceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a piece and append it; returns its index.
    ///
    /// On failure nothing is stored and earlier pieces are untouched.
    pub fn generate<R: Rng>(
        &mut self,
        settings: &PieceSettings,
        rng: &mut R,
    ) -> Result<usize, GenerationError> {
        let index = self.store_with(|| {
            let mut chords = Line::new(settings.chords.clone(), rng);
            let mut melody = Line::new(settings.melody.clone(), rng);
            build_piece(settings, &mut chords, &mut melody, rng)?;
            Ok(Piece::new(settings.clone(), chords, melody))
        })?;

        let piece = &self.pieces[index];
        debug!(
            index,
            scale = %settings.scale,
            chord_sets = piece.chords().sets().len(),
            melody_sets = piece.melody().sets().len(),
            duration = settings.duration(),
            "generated piece"
        );
        Ok(index)
    }

    /// Reserve a slot, build a piece and append it; nothing is stored on failure
    fn store_with<F>(&mut self, build: F) -> Result<usize, GenerationError>
    where
        F: FnOnce() -> Result<Piece, GenerationError>,
    {
        self.pieces.try_reserve(1)?;
        let piece = build()?;
        self.pieces.push(piece);
        Ok(self.pieces.len() - 1)
    }

    /// Generate pieces in order, stopping at the first failure
    pub fn generate_all<R: Rng>(
        &mut self,
        settings: &[PieceSettings],
        rng: &mut R,
    ) -> Result<(), GenerationError> {
        for piece in settings {
            self.generate(piece, rng)?;
        }
        info!(pieces = self.pieces.len(), "generation complete");
        Ok(())
    }

    /// Look up a piece by index
    pub fn get(&self, index: usize) -> Result<&Piece, StoreError> {
        self.pieces.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.pieces.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// Drop every piece; returns how many were released
    pub fn release_all(&mut self) -> usize {
        let released = self.pieces.len();
        self.pieces.clear();
        self.pieces.shrink_to_fit();
        debug!(released, "released pieces");
        released
    }
}
