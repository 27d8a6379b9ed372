//! Motion phases, sample records, and run configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use vt_core::Tick;
use vt_core::units::ms_to_knots;

use crate::{MotionError, MotionResult};

/// What the aircraft is doing at a sample.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotionPhase {
    /// The first sample, before any time has passed.
    Idle,
    Accelerating,
    Cruising,
    Decelerating,
    /// Inside the speed-limited window around a turn.
    Turning,
    /// Terminal: at the end of the path with zero speed.
    Stopped,
}

impl MotionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            MotionPhase::Idle         => "IDLE",
            MotionPhase::Accelerating => "ACCELERATING",
            MotionPhase::Cruising     => "CRUISING",
            MotionPhase::Decelerating => "DECELERATING",
            MotionPhase::Turning      => "TURNING",
            MotionPhase::Stopped      => "STOPPED",
        }
    }
}

impl fmt::Display for MotionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sample of a simulated traversal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementPoint {
    pub tick:             Tick,
    pub elapsed_secs:     f64,
    /// Distance travelled along the path, metres.
    pub distance_m:       f64,
    pub speed_ms:         f64,
    /// Instantaneous acceleration; negative while braking.
    pub acceleration_ms2: f64,
    /// Heading of the current leg (the outgoing leg exactly at a node).
    pub heading_deg:      f64,
    pub leg_index:        usize,
    pub phase:            MotionPhase,
}

impl MovementPoint {
    #[inline]
    pub fn speed_knots(&self) -> f64 {
        ms_to_knots(self.speed_ms)
    }
}

/// Kinematic state at the start of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub speed_ms:    f64,
    /// Current heading.  A mismatch with the first leg is flown as a turn at
    /// distance 0; `None` means already aligned.
    pub heading_deg: Option<f64>,
}

impl InitialState {
    /// Stationary and aligned with the first leg.
    pub fn at_rest() -> Self {
        Self::default()
    }

    pub fn moving(speed_ms: f64, heading_deg: f64) -> Self {
        Self { speed_ms, heading_deg: Some(heading_deg) }
    }
}

/// Tunables of a simulator run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Sample spacing in simulated seconds.
    pub time_step_secs:        f64,
    /// Heading changes at or above this many degrees are turns.
    pub turn_threshold_deg:    f64,
    /// Half the length of the slowed window around a runway crossing.
    pub crossing_half_width_m: f64,
    /// Crossing speed as a fraction of the profile's maximum.
    pub crossing_speed_ratio:  f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            time_step_secs:        1.0,
            turn_threshold_deg:    15.0,
            crossing_half_width_m: 30.0,
            crossing_speed_ratio:  0.5,
        }
    }
}

impl MotionConfig {
    pub fn with_time_step(mut self, secs: f64) -> Self {
        self.time_step_secs = secs;
        self
    }

    pub fn with_turn_threshold(mut self, deg: f64) -> Self {
        self.turn_threshold_deg = deg;
        self
    }

    pub fn validate(&self) -> MotionResult<()> {
        let dt = self.time_step_secs;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(MotionError::InvalidTimeStep(dt));
        }
        let checks = [
            ("turn_threshold_deg", self.turn_threshold_deg, (0.0..=180.0).contains(&self.turn_threshold_deg)),
            ("crossing_half_width_m", self.crossing_half_width_m, self.crossing_half_width_m >= 0.0),
            (
                "crossing_speed_ratio",
                self.crossing_speed_ratio,
                self.crossing_speed_ratio > 0.0 && self.crossing_speed_ratio <= 1.0,
            ),
        ];
        for (field, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(MotionError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}
