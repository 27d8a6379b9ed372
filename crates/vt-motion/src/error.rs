use thiserror::Error;

use vt_physics::PhysicsConstraintError;

#[derive(Debug, Error, PartialEq)]
pub enum MotionError {
    #[error(transparent)]
    Physics(#[from] PhysicsConstraintError),

    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),

    #[error("initial speed must be finite and non-negative, got {0}")]
    InvalidInitialSpeed(f64),

    #[error("motion config field {field} out of range: {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}

pub type MotionResult<T> = Result<T, MotionError>;
