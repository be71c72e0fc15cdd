// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Bounded random walk of a line's pitch reference.

use rand::Rng;

use super::voicing::PitchRange;
use super::weighted::Fraction;
use crate::music::MidiNote;

/// Move the reference after a set is finalized.
///
/// A fair coin picks the direction, then the reference keeps stepping one
/// semitone that way while `step` succeeds and the range bound isn't reached.
pub fn drift_reference<R: Rng>(
    reference: MidiNote,
    range: PitchRange,
    step: Fraction,
    rng: &mut R,
) -> MidiNote {
    let mut reference = range.clamp(reference);
    if Fraction::HALF.test(rng) {
        while reference > range.min && step.test(rng) {
            reference -= 1;
        }
    } else {
        while reference < range.max && step.test(rng) {
            reference += 1;
        }
    }
    reference
}
