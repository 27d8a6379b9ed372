//! Unit conversions and physical constants.
//!
//! Everything inside the engine is SI (metres, seconds, m/s).  Knots only
//! appear at the edges, for humans.

/// Standard gravitational acceleration, m/s².
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// One international knot in m/s.
pub const KNOT_MS: f64 = 1_852.0 / 3_600.0;

#[inline]
pub fn knots_to_ms(kt: f64) -> f64 {
    kt * KNOT_MS
}

#[inline]
pub fn ms_to_knots(ms: f64) -> f64 {
    ms / KNOT_MS
}
