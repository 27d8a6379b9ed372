//! `vt-motion`: taxi motion along a routed path.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`state`]     | `MotionPhase`, `MovementPoint`, `InitialState`, `MotionConfig`  |
//! | [`profile`]   | `SpeedProfile`: speed ceiling and braking envelope over distance |
//! | [`simulator`] | `TaxiMotionSimulator`, `MotionRun` cursor                       |
//! | [`error`]     | `MotionError`, `MotionResult<T>`                                |
//!
//! # Motion model
//!
//! 1. The simulator looks ahead once, at construction: every node whose
//!    heading change reaches the turn threshold (or whose turn speed is below
//!    the aircraft's maximum) gets a slowed window one turn radius either
//!    side; every runway crossing gets a fixed-width slowed window.
//! 2. Those windows, the aircraft's maximum speed, and a full stop at the end
//!    form a piecewise-constant ceiling.  Braking starts exactly where full
//!    deceleration still meets the next lower ceiling.
//! 3. [`MotionRun`] samples the resulting trapezoidal motion on a fixed time
//!    grid.  Runs are pull-based and independent; drop one to cancel it.

pub mod error;
pub mod profile;
pub mod simulator;
pub mod state;


pub use error::{MotionError, MotionResult};
pub use profile::{SpeedProfile, SpeedZone, ZoneKind};
pub use simulator::{MotionRun, TaxiMotionSimulator};
pub use state::{InitialState, MotionConfig, MotionPhase, MovementPoint};
