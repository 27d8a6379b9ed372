//! `vt-network`: airport ground graph, runway configuration, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`network`] | `NetworkModel` (CSR + R-tree), `NetworkBuilder`, `Node`, `Segment` |
//! | [`config`]  | `AirportConfig`, `ModeConfig`, `AirportContext`                  |
//! | [`router`]  | `Router` trait, `DijkstraRouter`, `Pathfinder`, `Path`            |
//! | [`loader`]  | CSV network loader, JSON config loader                            |
//! | [`assign`]  | `PositionAssigner`: mode, gate, and runway-point selection       |
//! | [`error`]   | `DataIntegrityError`, `InvalidRouteError`, `LoadError`, `AssignmentError` |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | `Pathfinder::find_paths` runs requests on Rayon's pool.     |

pub mod assign;
pub mod config;
pub mod error;
pub mod loader;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use assign::{Assignment, AssignmentRequest, PositionAssigner, terminal_of};
pub use config::{AirportConfig, AirportContext, ModeConfig};
pub use error::{
    AssignResult, AssignmentError, DataIntegrityError, InvalidRouteError, LoadError, LoadResult,
    NetworkResult, RouteResult,
};
pub use loader::{load_config, load_config_reader, load_context, load_network, load_network_reader};
pub use network::{NetworkBuilder, NetworkModel, Node, NodeKind, Segment, SegmentKind};
pub use router::{DijkstraRouter, Path, PathLeg, Pathfinder, RouteRequest, Router, SearchTree};
