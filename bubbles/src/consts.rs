//! Shared numeric constants for the bubbles crate.

// ── Safe band ───────────────────────────────────────────────────

/// Lowest percentage (top or left) a bubble center may occupy.
pub const SAFE_MIN_PCT: f64 = 4.0;

/// Highest percentage (top or left) a bubble center may occupy.
pub const SAFE_MAX_PCT: f64 = 96.0;

// ── Placement hash ──────────────────────────────────────────────

/// Multiplier of the order-dependent string hash.
pub const HASH_MULTIPLIER: u32 = 31;

/// Suffix appended to a comment id to derive the second (horizontal) hash.
pub const LEFT_HASH_SALT: &str = "x";

/// Divisor normalizing a `u32` hash into `[0, 1)`.
pub const HASH_RANGE: f64 = 4_294_967_296.0;

// ── Float animation ─────────────────────────────────────────────

/// Upper bound (exclusive) of the per-bubble animation start delay, in seconds.
pub const FLOAT_DELAY_SPAN_SECS: f64 = 4.0;

/// Shortest float animation period, in seconds.
pub const FLOAT_DURATION_MIN_SECS: f64 = 5.0;

/// Added on top of [`FLOAT_DURATION_MIN_SECS`] for the slowest bubble.
pub const FLOAT_DURATION_SPAN_SECS: f64 = 3.0;

// ── Stacking ────────────────────────────────────────────────────

/// Stack counter value before any bubble has been assigned one.
pub const STACK_ORDER_BASE: u64 = 1;
