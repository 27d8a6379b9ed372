//! `vt-core`: foundational types for the `vtaxi` ground-movement engine.
//!
//! This crate is a dependency of every other `vt-*` crate.  It intentionally
//! has no `vt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `SegmentId`, `OperationMode`, `RunwayId`, dense indices |
//! | [`geo`]         | `GeoPoint`, haversine distance, heading arithmetic        |
//! | [`time`]        | `Tick`, `SimClock`                                        |
//! | [`rng`]         | `SimRng`                                                  |
//! | [`movement`]    | `RouteType`                                               |
//! | [`units`]       | knots ↔ m/s, standard gravity                             |
//! | [`error`]       | `VtError`, `VtResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod movement;
pub mod rng;
pub mod time;
pub mod units;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{VtError, VtResult};
pub use geo::{GeoPoint, heading_delta, normalize_heading, reciprocal_heading};
pub use ids::{EdgeIdx, NodeId, NodeIdx, OperationMode, RunwayId, SegmentId, SegmentIdx};
pub use movement::RouteType;
pub use rng::SimRng;
pub use time::{SimClock, Tick};
