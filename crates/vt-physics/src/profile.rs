//! ICAO weight categories and their ground-handling envelopes.
//!
//! # Turn-limited speed
//!
//! A heading change of `δ` is flown as a circular fillet of radius
//! `r = R · cot(δ/2)` tangent to both legs, where `R` is the profile's
//! minimum turn radius.  Holding lateral acceleration to `k · g` on that
//! fillet gives
//!
//! ```text
//! v(δ) = clamp( sqrt(k · g · R · cot(δ/2)),  v_creep,  v_max )
//! ```
//!
//! with `k = 0.15` and `v_creep = 1.0 m/s`.  `v(0) = v_max`, `v(180) =
//! v_creep`, and `v` is continuous and non-increasing in between.

use std::fmt;
use std::str::FromStr;

use vt_core::heading_delta;
use vt_core::units::{STANDARD_GRAVITY, knots_to_ms};

use crate::{PhysicsConstraintError, PhysicsResult};

/// Fraction of `g` tolerated as lateral acceleration in a taxi turn.
pub const LATERAL_ACCEL_FRACTION: f64 = 0.15;

/// Slowest speed the model ever commands while moving, m/s.
pub const CREEP_SPEED_MS: f64 = 1.0;

/// Maximum nose-wheel steering angle used to derive the turn radius.
pub const MAX_STEERING_DEG: f64 = 50.0;

// ── WeightCategory ────────────────────────────────────────────────────────────

/// ICAO wake-turbulence / weight category.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum WeightCategory {
    /// < 7 000 kg (C172-class).
    Light,
    /// 7 000 – 136 000 kg (A320-class).
    Medium,
    /// > 136 000 kg (B747-class).
    Heavy,
    /// A380 / An-225.
    Super,
}

impl WeightCategory {
    pub const ALL: [WeightCategory; 4] = [
        WeightCategory::Light,
        WeightCategory::Medium,
        WeightCategory::Heavy,
        WeightCategory::Super,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeightCategory::Light  => "LIGHT",
            WeightCategory::Medium => "MEDIUM",
            WeightCategory::Heavy  => "HEAVY",
            WeightCategory::Super  => "SUPER",
        }
    }

    /// Category of a handful of common ICAO type designators.
    pub fn for_aircraft_type(designator: &str) -> Option<WeightCategory> {
        match designator.trim().to_ascii_uppercase().as_str() {
            "C172" | "PA28" | "SR22"          => Some(WeightCategory::Light),
            "A319" | "A320" | "A321" | "B738" => Some(WeightCategory::Medium),
            "A332" | "A359" | "B744" | "B747" | "B77W" => Some(WeightCategory::Heavy),
            "A388" | "A380" | "A225"          => Some(WeightCategory::Super),
            _ => None,
        }
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightCategory {
    type Err = PhysicsConstraintError;

    /// Case-insensitive category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LIGHT"  => Ok(WeightCategory::Light),
            "MEDIUM" => Ok(WeightCategory::Medium),
            "HEAVY"  => Ok(WeightCategory::Heavy),
            "SUPER"  => Ok(WeightCategory::Super),
            _        => Err(PhysicsConstraintError::UnknownCategory(s.to_owned())),
        }
    }
}

// ── AircraftPhysicsProfile ────────────────────────────────────────────────────

/// Ground-handling envelope of one aircraft class.  All values SI.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AircraftPhysicsProfile {
    pub category:      WeightCategory,
    pub max_speed_ms:  f64,
    pub max_accel_ms2: f64,
    pub max_decel_ms2: f64,
    pub wheelbase_m:   f64,
    pub wingspan_m:    f64,
}

impl AircraftPhysicsProfile {
    /// Representative profile for `category`.
    pub fn for_category(category: WeightCategory) -> Self {
        let (max_kt, accel, decel, wheelbase, wingspan) = match category {
            WeightCategory::Light  => (15.0, 1.2, 2.0, 2.5, 11.0),
            WeightCategory::Medium => (20.0, 1.0, 2.0, 12.6, 35.8),
            WeightCategory::Heavy  => (20.0, 0.8, 1.5, 25.6, 64.4),
            WeightCategory::Super  => (15.0, 0.6, 1.2, 31.9, 79.8),
        };
        Self {
            category,
            max_speed_ms:  knots_to_ms(max_kt),
            max_accel_ms2: accel,
            max_decel_ms2: decel,
            wheelbase_m:   wheelbase,
            wingspan_m:    wingspan,
        }
    }

    /// Check a hand-built profile: every numeric field finite and positive,
    /// and `max_speed_ms` at least the creep speed.
    pub fn validate(&self) -> PhysicsResult<()> {
        let fields = [
            ("max_speed_ms", self.max_speed_ms),
            ("max_accel_ms2", self.max_accel_ms2),
            ("max_decel_ms2", self.max_decel_ms2),
            ("wheelbase_m", self.wheelbase_m),
            ("wingspan_m", self.wingspan_m),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhysicsConstraintError::InvalidProfile { field, value });
            }
        }
        if self.max_speed_ms < CREEP_SPEED_MS {
            return Err(PhysicsConstraintError::InvalidProfile {
                field: "max_speed_ms",
                value: self.max_speed_ms,
            });
        }
        Ok(())
    }

    /// Wheelbase over the tangent of the maximum steering angle.
    #[inline]
    pub fn min_turn_radius_m(&self) -> f64 {
        self.wheelbase_m / MAX_STEERING_DEG.to_radians().tan()
    }

    /// Highest speed at which the turn from `incoming_deg` onto
    /// `outgoing_deg` may be taken.
    ///
    /// # Errors
    ///
    /// [`PhysicsConstraintError::NonFiniteHeading`] if either heading is NaN
    /// or infinite.
    pub fn max_speed_for_turn(&self, incoming_deg: f64, outgoing_deg: f64) -> PhysicsResult<f64> {
        if !incoming_deg.is_finite() || !outgoing_deg.is_finite() {
            return Err(PhysicsConstraintError::NonFiniteHeading { incoming_deg, outgoing_deg });
        }
        Ok(self.speed_for_delta(heading_delta(incoming_deg, outgoing_deg)))
    }

    /// Turn-limited speed for an absolute heading change `delta_deg`
    /// (clamped into `[0, 180]`).
    pub fn speed_for_delta(&self, delta_deg: f64) -> f64 {
        let delta = delta_deg.clamp(0.0, 180.0);
        if delta == 0.0 {
            return self.max_speed_ms;
        }
        let cot = 1.0 / (delta.to_radians() * 0.5).tan();
        let v = (LATERAL_ACCEL_FRACTION * STANDARD_GRAVITY * self.min_turn_radius_m() * cot.max(0.0)).sqrt();
        v.clamp(CREEP_SPEED_MS, self.max_speed_ms)
    }

    /// Distance needed to slow from `from_ms` to `to_ms` at full braking.
    /// Zero if no slowing is needed.
    pub fn braking_distance_m(&self, from_ms: f64, to_ms: f64) -> f64 {
        if from_ms <= to_ms {
            return 0.0;
        }
        (from_ms * from_ms - to_ms * to_ms) / (2.0 * self.max_decel_ms2)
    }
}

/// Profile for a category name (`"MEDIUM"`, `"heavy"`, …).
///
/// # Errors
///
/// [`PhysicsConstraintError::UnknownCategory`] for any other name.
pub fn profile_for(category: &str) -> PhysicsResult<AircraftPhysicsProfile> {
    category.parse().map(AircraftPhysicsProfile::for_category)
}
