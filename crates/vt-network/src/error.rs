//! Network-subsystem error types.

use thiserror::Error;

use vt_core::{NodeId, OperationMode, RouteType, RunwayId, SegmentId};

/// Malformed network or configuration input.  Fatal to construction: no
/// query is ever served from a model that failed these checks.
#[derive(Debug, Error, PartialEq)]
pub enum DataIntegrityError {
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate segment id {0}")]
    DuplicateSegment(SegmentId),

    #[error("segment {segment} references missing node {node}")]
    MissingNode { segment: SegmentId, node: NodeId },

    #[error("node {node} lists missing segment {segment}")]
    MissingSegment { node: NodeId, segment: SegmentId },

    #[error("segment {segment} has invalid length {length_m} m")]
    InvalidLength { segment: SegmentId, length_m: f64 },

    #[error("segment {segment} has non-finite heading {heading_deg}")]
    InvalidHeading { segment: SegmentId, heading_deg: f64 },

    #[error("node {0} has a non-finite position or heading")]
    InvalidNodeGeometry(NodeId),

    #[error("mode {mode}: configured {role} node {node} is not in the network")]
    UnknownConfigNode { mode: OperationMode, role: &'static str, node: NodeId },

    #[error("mode {mode}: runway designator {runway} has no nominal heading")]
    InvalidRunway { mode: OperationMode, runway: RunwayId },
}

/// A route request that cannot be satisfied.  Always surfaced to the caller;
/// never downgraded to a partial route.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidRouteError {
    #[error("{route_type} route in mode {mode}: need at least 2 waypoints, got {got}")]
    TooFewWaypoints { route_type: RouteType, mode: OperationMode, got: usize },

    #[error("unknown operation mode {0}")]
    UnknownMode(OperationMode),

    #[error("{route_type} route in mode {mode}: unknown waypoint `{waypoint}`")]
    UnknownWaypoint { route_type: RouteType, mode: OperationMode, waypoint: String },

    #[error("{route_type} route in mode {mode}: taxiway name `{waypoint}` cannot anchor the start of a route")]
    AmbiguousStart { route_type: RouteType, mode: OperationMode, waypoint: String },

    #[error("{route_type} route in mode {mode}: waypoint `{to}` unreachable from `{from}`")]
    Unreachable { route_type: RouteType, mode: OperationMode, from: String, to: String },

    #[error("arrival route in mode {mode}: first node {node} is not a configured runway exit")]
    NotAnExit { mode: OperationMode, node: NodeId },

    #[error("departure route in mode {mode}: last node {node} is not a configured runway entrance")]
    NotAnEntrance { mode: OperationMode, node: NodeId },
}

/// Errors produced by the CSV / JSON record loaders.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid record: {0}")]
    Record(String),

    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
}

/// Errors produced by the gate / runway-point assigner.
#[derive(Debug, Error, PartialEq)]
pub enum AssignmentError {
    #[error("unknown operation mode {0}")]
    UnknownMode(OperationMode),

    #[error("no operation modes are configured")]
    NoModes,

    #[error("gate {0} not found")]
    UnknownGate(String),

    #[error("gate {0} is excluded")]
    GateExcluded(String),

    #[error("no gate satisfies the request")]
    NoGateAvailable,

    #[error("mode {mode}: node {node} is not a valid runway {role}")]
    InvalidRunwayPoint { mode: OperationMode, role: &'static str, node: NodeId },

    #[error("mode {mode}: no runway {role} points configured")]
    NoRunwayPoint { mode: OperationMode, role: &'static str },
}

pub type NetworkResult<T> = Result<T, DataIntegrityError>;
pub type RouteResult<T> = Result<T, InvalidRouteError>;
pub type LoadResult<T> = Result<T, LoadError>;
pub type AssignResult<T> = Result<T, AssignmentError>;
