//! `vt-physics`: aircraft ground-handling model.
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`profile`] | `WeightCategory`, `AircraftPhysicsProfile`, `profile_for`  |
//! | [`error`]   | `PhysicsConstraintError`, `PhysicsResult<T>`               |
//!
//! Profiles are plain `Copy` values; nothing here holds state between calls.

pub mod error;
pub mod profile;


pub use error::{PhysicsConstraintError, PhysicsResult};
pub use profile::{
    AircraftPhysicsProfile, CREEP_SPEED_MS, LATERAL_ACCEL_FRACTION, MAX_STEERING_DEG, WeightCategory,
    profile_for,
};
