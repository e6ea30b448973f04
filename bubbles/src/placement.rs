//! Deterministic initial placement of comment bubbles.
//!
//! A bubble with no persisted position is placed by hashing its comment id:
//! one hash picks the vertical offset, a salted second hash the horizontal
//! one. Both are scaled into the [`SafeBand`] so bubbles never start clipped
//! at the canvas edge. The same id always lands on the same point, on every
//! host display, without any shared state.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use crate::comment::Position;
use crate::consts::{
    FLOAT_DELAY_SPAN_SECS, FLOAT_DURATION_MIN_SECS, FLOAT_DURATION_SPAN_SECS, HASH_MULTIPLIER, HASH_RANGE,
    LEFT_HASH_SALT, SAFE_MAX_PCT, SAFE_MIN_PCT,
};

/// Percentage range, applied to both axes, that keeps a bubble center away from the edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeBand {
    pub min: f64,
    pub max: f64,
}

impl Default for SafeBand {
    fn default() -> Self {
        Self { min: SAFE_MIN_PCT, max: SAFE_MAX_PCT }
    }
}

impl SafeBand {
    /// Clamp a single coordinate into the band. `NaN` maps to the band minimum.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Clamp both coordinates of a position into the band.
    #[must_use]
    pub fn clamp_position(&self, position: Position) -> Position {
        Position::new(self.clamp(position.top), self.clamp(position.left))
    }

    /// Map a unit-interval value onto the band.
    #[must_use]
    pub fn scale(&self, unit: f64) -> f64 {
        self.min + unit * (self.max - self.min)
    }

    /// Whether both coordinates already lie inside the band.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        (self.min..=self.max).contains(&position.top) && (self.min..=self.max).contains(&position.left)
    }
}

/// Order-dependent string hash normalized to `[0, 1)`.
///
/// Multiply-add over UTF-16 code units with 32-bit wraparound, then a
/// murmur3 finalizer. Without the finalizer short ids such as `"c1"` and
/// `"c2"` hash to nearly zero and pile up in the same corner.
#[must_use]
pub fn hash_to_unit(s: &str) -> f64 {
    let h = s
        .encode_utf16()
        .fold(0_u32, |h, unit| h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(u32::from(unit)));
    f64::from(fmix32(h)) / HASH_RANGE
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Initial position for a comment id within the default safe band.
#[must_use]
pub fn placement(comment_id: &str) -> Position {
    placement_in(comment_id, SafeBand::default())
}

/// Initial position for a comment id within `band`.
#[must_use]
pub fn placement_in(comment_id: &str, band: SafeBand) -> Position {
    let top_unit = hash_to_unit(comment_id);
    let left_unit = hash_to_unit(&format!("{comment_id}{LEFT_HASH_SALT}"));
    Position::new(round_hundredths(band.scale(top_unit)), round_hundredths(band.scale(left_unit)))
}

/// Ambient vertical float of an idle bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatAnimation {
    /// Start delay in seconds, `[0, 4)`.
    pub delay_secs: f64,
    /// One swing period in seconds, `[5, 8)`.
    pub duration_secs: f64,
}

/// Float animation timing for a comment id. Staggers bubbles so they do not bob in unison.
#[must_use]
pub fn float_animation(comment_id: &str) -> FloatAnimation {
    let h = hash_to_unit(comment_id);
    FloatAnimation {
        delay_secs: round_hundredths(h * FLOAT_DELAY_SPAN_SECS),
        duration_secs: round_hundredths(FLOAT_DURATION_MIN_SECS + h * FLOAT_DURATION_SPAN_SECS),
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
