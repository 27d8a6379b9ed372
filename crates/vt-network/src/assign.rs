//! Gate and runway-point assignment for scenario set-up.
//!
//! A caller describes a movement loosely ("a departure from terminal K, any
//! mode") and the assigner fills in the rest: operation mode, gate node, and
//! runway entrance or exit.  Anything left unspecified is drawn from a
//! caller-supplied [`SimRng`], so a fixed seed reproduces the same scenario.
//!
//! Terminals are not modelled separately; a gate's terminal is the non-digit
//! part of its stand identifier (`"K24"` → `"K"`, `"2E12"` → `"E"`).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use vt_core::{NodeId, OperationMode, RouteType, SimRng};

use crate::config::AirportContext;
use crate::network::Node;
use crate::router::RouteRequest;
use crate::{AssignResult, AssignmentError};

/// What the caller wants; every `None` / empty field is chosen for them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub route_type:          RouteType,
    #[serde(default)]
    pub mode:                Option<OperationMode>,
    /// Stand identifier, e.g. `"K24"`.
    #[serde(default)]
    pub gate:                Option<String>,
    /// A specific entrance (departure) or exit (arrival) node.
    #[serde(default)]
    pub runway_point:        Option<NodeId>,
    #[serde(default)]
    pub terminal_preference: Option<String>,
    #[serde(default)]
    pub exclude_gates:       BTreeSet<String>,
    #[serde(default)]
    pub exclude_terminals:   BTreeSet<String>,
}

impl AssignmentRequest {
    pub fn new(route_type: RouteType) -> Self {
        Self {
            route_type,
            mode: None,
            gate: None,
            runway_point: None,
            terminal_preference: None,
            exclude_gates: BTreeSet::new(),
            exclude_terminals: BTreeSet::new(),
        }
    }

    pub fn mode(mut self, mode: impl Into<OperationMode>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn gate(mut self, gate: impl Into<String>) -> Self {
        self.gate = Some(gate.into());
        self
    }

    pub fn runway_point(mut self, node: impl Into<NodeId>) -> Self {
        self.runway_point = Some(node.into());
        self
    }

    pub fn prefer_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal_preference = Some(terminal.into());
        self
    }

    pub fn exclude_gate(mut self, gate: impl Into<String>) -> Self {
        self.exclude_gates.insert(gate.into());
        self
    }

    pub fn exclude_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.exclude_terminals.insert(terminal.into());
        self
    }
}

/// A fully resolved movement, ready to be routed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub route_type:   RouteType,
    pub mode:         OperationMode,
    pub gate_id:      String,
    pub gate_node:    NodeId,
    pub runway_point: NodeId,
}

impl Assignment {
    /// Route endpoints in travel order: runway exit → gate for arrivals,
    /// gate → runway entrance for departures.
    pub fn waypoints(&self) -> Vec<String> {
        let (from, to) = self.endpoints();
        vec![from.to_string(), to.to_string()]
    }

    /// A [`RouteRequest`] through [`waypoints`](Self::waypoints), optionally
    /// forced along intermediate `via` waypoints.
    pub fn route_request(&self, via: &[&str]) -> RouteRequest {
        let (from, to) = self.endpoints();
        let mut waypoints = Vec::with_capacity(via.len() + 2);
        waypoints.push(from.to_string());
        waypoints.extend(via.iter().map(|w| (*w).to_owned()));
        waypoints.push(to.to_string());
        RouteRequest {
            route_type: self.route_type,
            waypoints,
            mode: self.mode.clone(),
        }
    }

    fn endpoints(&self) -> (&NodeId, &NodeId) {
        match self.route_type {
            RouteType::Arrival   => (&self.runway_point, &self.gate_node),
            RouteType::Departure => (&self.gate_node, &self.runway_point),
        }
    }
}

/// The terminal a stand belongs to: its identifier with digits removed.
pub fn terminal_of(gate_id: &str) -> String {
    gate_id.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Chooses modes, gates, and runway points from an [`AirportContext`].
pub struct PositionAssigner<'a> {
    ctx:       &'a AirportContext,
    /// Gate nodes grouped by terminal; both levels in id order.
    terminals: BTreeMap<String, Vec<&'a Node>>,
}

impl<'a> PositionAssigner<'a> {
    pub fn new(ctx: &'a AirportContext) -> Self {
        let mut terminals: BTreeMap<String, Vec<&'a Node>> = BTreeMap::new();
        for node in ctx.network.gates() {
            if let Some(gate_id) = &node.gate_id {
                terminals.entry(terminal_of(gate_id)).or_default().push(node);
            }
        }
        tracing::debug!(
            terminals = terminals.len(),
            gates     = terminals.values().map(Vec::len).sum::<usize>(),
            "position assigner ready"
        );
        Self { ctx, terminals }
    }

    /// Known terminal identifiers in order.
    pub fn terminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.terminals.keys().map(String::as_str)
    }

    /// The requested mode if configured, otherwise a random configured one.
    pub fn choose_mode(&self, requested: Option<&OperationMode>, rng: &mut SimRng) -> AssignResult<OperationMode> {
        if let Some(mode) = requested {
            return self
                .ctx
                .config
                .mode(mode)
                .map(|_| mode.clone())
                .map_err(|_| AssignmentError::UnknownMode(mode.clone()));
        }
        let modes: Vec<&OperationMode> = self.ctx.config.modes().collect();
        rng.choose(&modes).map(|m| (*m).clone()).ok_or(AssignmentError::NoModes)
    }

    /// The gate node carrying stand identifier `gate_id`.
    pub fn gate_by_id(&self, gate_id: &str) -> Option<&'a Node> {
        self.terminals
            .get(&terminal_of(gate_id))?
            .iter()
            .copied()
            .find(|n| n.gate_id.as_deref() == Some(gate_id))
    }

    /// Pick a gate honouring the request's gate, terminal preference, and
    /// exclusions.  A preferred terminal with no usable gate falls back to
    /// every allowed terminal.
    pub fn find_gate(&self, req: &AssignmentRequest, rng: &mut SimRng) -> AssignResult<&'a Node> {
        if let Some(gate_id) = &req.gate {
            let node = self
                .gate_by_id(gate_id)
                .ok_or_else(|| AssignmentError::UnknownGate(gate_id.clone()))?;
            let excluded = req.exclude_gates.contains(gate_id)
                || req.exclude_terminals.contains(&terminal_of(gate_id));
            if excluded {
                return Err(AssignmentError::GateExcluded(gate_id.clone()));
            }
            return Ok(node);
        }

        let usable = |terminal: &str| -> Vec<&'a Node> {
            if req.exclude_terminals.contains(terminal) {
                return Vec::new();
            }
            self.terminals
                .get(terminal)
                .into_iter()
                .flatten()
                .copied()
                .filter(|n| n.gate_id.as_ref().is_some_and(|g| !req.exclude_gates.contains(g)))
                .collect()
        };

        let mut candidates = req.terminal_preference.as_deref().map(|t| usable(t)).unwrap_or_default();
        if candidates.is_empty() {
            candidates = self.terminals.keys().flat_map(|t| usable(t)).collect();
        }
        rng.choose(&candidates).copied().ok_or(AssignmentError::NoGateAvailable)
    }

    /// Pick a runway exit (arrival) or entrance (departure) for `mode`.
    pub fn find_runway_point(
        &self,
        mode:       &OperationMode,
        route_type: RouteType,
        specific:   Option<&NodeId>,
        rng:        &mut SimRng,
    ) -> AssignResult<NodeId> {
        let cfg = self
            .ctx
            .config
            .mode(mode)
            .map_err(|_| AssignmentError::UnknownMode(mode.clone()))?;
        let points = cfg.runway_points(route_type);
        let role = match route_type {
            RouteType::Arrival   => "exit",
            RouteType::Departure => "entrance",
        };

        if let Some(node) = specific {
            return if points.contains(node) {
                Ok(node.clone())
            } else {
                Err(AssignmentError::InvalidRunwayPoint { mode: mode.clone(), role, node: node.clone() })
            };
        }

        let points: Vec<&NodeId> = points.iter().collect();
        rng.choose(&points)
            .map(|n| (*n).clone())
            .ok_or(AssignmentError::NoRunwayPoint { mode: mode.clone(), role })
    }

    /// Resolve every open choice in `req`.
    ///
    /// Draws happen in a fixed order (mode, gate, runway point), so the same
    /// request and seed always give the same assignment.
    pub fn assign(&self, req: &AssignmentRequest, rng: &mut SimRng) -> AssignResult<Assignment> {
        let mode = self.choose_mode(req.mode.as_ref(), rng)?;
        let gate = self.find_gate(req, rng)?;
        let runway_point = self.find_runway_point(&mode, req.route_type, req.runway_point.as_ref(), rng)?;

        let assignment = Assignment {
            route_type: req.route_type,
            mode,
            gate_id: gate.gate_id.clone().unwrap_or_default(),
            gate_node: gate.id.clone(),
            runway_point,
        };
        tracing::debug!(
            route_type = %assignment.route_type,
            mode       = %assignment.mode,
            gate       = %assignment.gate_id,
            runway     = %assignment.runway_point,
            "positions assigned"
        );
        Ok(assignment)
    }
}
