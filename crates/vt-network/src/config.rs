//! Runway operation modes and the immutable airport context.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use vt_core::{NodeId, OperationMode, RouteType, RunwayId};

use crate::{DataIntegrityError, InvalidRouteError, NetworkModel};

/// Operational parameters of one runway-usage configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub departure_runway: RunwayId,
    pub arrival_runway:   RunwayId,
    /// Nodes where a departing aircraft may enter the runway.
    pub entrances:        BTreeSet<NodeId>,
    /// Nodes where an arriving aircraft may vacate the runway.
    pub exits:            BTreeSet<NodeId>,
}

impl ModeConfig {
    /// Nominal headings of the active runways (departure first).  Runway
    /// segments are only usable in directions aligned with one of these.
    pub fn active_runway_headings(&self) -> Vec<f64> {
        [&self.departure_runway, &self.arrival_runway]
            .into_iter()
            .filter_map(RunwayId::nominal_heading_deg)
            .collect()
    }

    /// The node set a route of `route_type` must end (departure) or start
    /// (arrival) in.
    pub fn runway_points(&self, route_type: RouteType) -> &BTreeSet<NodeId> {
        match route_type {
            RouteType::Arrival   => &self.exits,
            RouteType::Departure => &self.entrances,
        }
    }
}

/// Per-mode airport configuration.  Loaded once; never mutated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirportConfig {
    modes: BTreeMap<OperationMode, ModeConfig>,
}

impl AirportConfig {
    pub fn new(modes: BTreeMap<OperationMode, ModeConfig>) -> Self {
        Self { modes }
    }

    /// Builder-style insertion used when assembling a config in code.
    pub fn with_mode(mut self, mode: impl Into<OperationMode>, config: ModeConfig) -> Self {
        self.modes.insert(mode.into(), config);
        self
    }

    /// Configured modes in name order.
    pub fn modes(&self) -> impl Iterator<Item = &OperationMode> + '_ {
        self.modes.keys()
    }

    pub fn mode(&self, mode: &OperationMode) -> Result<&ModeConfig, InvalidRouteError> {
        self.modes
            .get(mode)
            .ok_or_else(|| InvalidRouteError::UnknownMode(mode.clone()))
    }

    pub fn entrances(&self, mode: &OperationMode) -> Result<&BTreeSet<NodeId>, InvalidRouteError> {
        self.mode(mode).map(|m| &m.entrances)
    }

    pub fn exits(&self, mode: &OperationMode) -> Result<&BTreeSet<NodeId>, InvalidRouteError> {
        self.mode(mode).map(|m| &m.exits)
    }

    pub fn active_departure_runway(&self, mode: &OperationMode) -> Result<&RunwayId, InvalidRouteError> {
        self.mode(mode).map(|m| &m.departure_runway)
    }

    pub fn active_arrival_runway(&self, mode: &OperationMode) -> Result<&RunwayId, InvalidRouteError> {
        self.mode(mode).map(|m| &m.arrival_runway)
    }

    /// Check the route-type membership rule on a complete path's endpoints:
    /// an arrival must start at an exit, a departure must end at an entrance.
    pub fn check_endpoints(
        &self,
        route_type: RouteType,
        mode:       &OperationMode,
        first:      &NodeId,
        last:       &NodeId,
    ) -> Result<(), InvalidRouteError> {
        let cfg = self.mode(mode)?;
        match route_type {
            RouteType::Arrival if !cfg.exits.contains(first) => Err(InvalidRouteError::NotAnExit {
                mode: mode.clone(),
                node: first.clone(),
            }),
            RouteType::Departure if !cfg.entrances.contains(last) => {
                Err(InvalidRouteError::NotAnEntrance { mode: mode.clone(), node: last.clone() })
            }
            _ => Ok(()),
        }
    }
}

// ── AirportContext ────────────────────────────────────────────────────────────

/// The network and its runway configuration, validated against each other.
///
/// Construct once and share by reference (or `Arc`) with every
/// [`Pathfinder`][crate::Pathfinder] and
/// [`PositionAssigner`][crate::PositionAssigner].  Nothing in it can change
/// after construction, so no locking is ever needed.
#[derive(Debug)]
pub struct AirportContext {
    pub(crate) network: NetworkModel,
    pub(crate) config:  AirportConfig,
}

impl AirportContext {
    /// # Errors
    ///
    /// [`DataIntegrityError`] if a configured entrance or exit is not a
    /// network node, or an active runway designator has no heading.
    pub fn new(network: NetworkModel, config: AirportConfig) -> Result<Self, DataIntegrityError> {
        for (mode, cfg) in &config.modes {
            for runway in [&cfg.departure_runway, &cfg.arrival_runway] {
                if runway.nominal_heading_deg().is_none() {
                    return Err(DataIntegrityError::InvalidRunway {
                        mode:   mode.clone(),
                        runway: runway.clone(),
                    });
                }
            }
            let roles = [("entrance", &cfg.entrances), ("exit", &cfg.exits)];
            for (role, set) in roles {
                if let Some(node) = set.iter().find(|n| network.node_idx(n.as_str()).is_none()) {
                    return Err(DataIntegrityError::UnknownConfigNode {
                        mode: mode.clone(),
                        role,
                        node: node.clone(),
                    });
                }
            }
        }
        tracing::info!(
            nodes    = network.node_count(),
            segments = network.segment_count(),
            modes    = config.modes.len(),
            "airport context ready"
        );
        Ok(Self { network, config })
    }

    pub fn network(&self) -> &NetworkModel {
        &self.network
    }

    pub fn config(&self) -> &AirportConfig {
        &self.config
    }
}
