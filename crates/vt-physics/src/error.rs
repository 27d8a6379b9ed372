//! Physics error type.

use thiserror::Error;

/// A request the aircraft model cannot satisfy.
#[derive(Debug, Error, PartialEq)]
pub enum PhysicsConstraintError {
    #[error("unknown weight category `{0}` (expected LIGHT, MEDIUM, HEAVY or SUPER)")]
    UnknownCategory(String),

    #[error("non-finite heading (incoming {incoming_deg}, outgoing {outgoing_deg})")]
    NonFiniteHeading { incoming_deg: f64, outgoing_deg: f64 },

    #[error("profile field {field} must be finite and positive, got {value}")]
    InvalidProfile { field: &'static str, value: f64 },

    #[error("initial speed {speed_ms:.2} m/s exceeds the {limit_ms:.2} m/s reachable at distance {at_m:.1} m")]
    InfeasibleSpeed { speed_ms: f64, limit_ms: f64, at_m: f64 },
}

pub type PhysicsResult<T> = Result<T, PhysicsConstraintError>;
