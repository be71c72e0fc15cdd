// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Text output of generated pieces.
//!
//! Each note is written as `pitch start duration` on its own line, with
//! times converted from time units to seconds (100 units per second).
//! Rendering a sequence of pieces places them back to back.

use std::io::{self, Write};

use tracing::warn;

use crate::piece::{NoteEvent, Piece, PieceStore};

/// Time units per second of output
pub const UNITS_PER_SECOND: f64 = 100.0;

/// Format one note event
pub fn format_event(event: &NoteEvent) -> String {
    format!(
        "{} {:.2} {:.2}",
        event.pitch,
        event.start as f64 / UNITS_PER_SECOND,
        f64::from(event.duration) / UNITS_PER_SECOND
    )
}

/// Write every note of a piece starting at `offset`; returns the note count
pub fn write_piece<W: Write>(out: &mut W, piece: &Piece, offset: u64) -> io::Result<usize> {
    let mut written = 0;
    for event in piece.events(offset) {
        writeln!(out, "{}", format_event(&event))?;
        written += 1;
    }
    Ok(written)
}

/// What a call to [`render_sequence`] produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Pieces written
    pub rendered: usize,
    /// Notes written
    pub events: usize,
    /// Requested indices that did not name a piece
    pub skipped: Vec<usize>,
    /// Offset after the last rendered piece
    pub end_offset: u64,
}

/// Render pieces in the requested order, each starting where the last ended.
///
/// Bad indices are logged and skipped; the rest of the order still renders.
pub fn render_sequence<W: Write>(
    out: &mut W,
    store: &PieceStore,
    order: &[usize],
) -> io::Result<RenderSummary> {
    let mut summary = RenderSummary::default();

    for &index in order {
        match store.get(index) {
            Ok(piece) => {
                summary.events += write_piece(out, piece, summary.end_offset)?;
                summary.end_offset += u64::from(piece.duration());
                summary.rendered += 1;
            }
            Err(err) => {
                warn!(%err, "skipping render request");
                summary.skipped.push(index);
            }
        }
    }

    Ok(summary)
}
