//! Shared error type.
//!
//! Sub-crates define their own error enums for their own failure modes
//! (`DataIntegrityError`, `InvalidRouteError`, `PhysicsConstraintError`, …).
//! `VtError` covers what is common to all of them: parsing the shared enums
//! and identifiers defined in this crate.

use thiserror::Error;

/// The base error type for `vt-core`.
#[derive(Debug, Error)]
pub enum VtError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `vt-core`.
pub type VtResult<T> = Result<T, VtError>;
