//! Waypoint-constrained routing.
//!
//! # Pluggability
//!
//! [`Pathfinder`] assembles a route from consecutive sub-path searches and
//! delegates each search to the [`Router`] trait, so a different search
//! (A*, a contraction hierarchy) can be swapped in without touching waypoint
//! handling or validation.  The default [`DijkstraRouter`] is sufficient for
//! any single aerodrome.
//!
//! # Cost units
//!
//! Search costs are segment lengths in whole **millimetres** (`u64`).  Integer
//! costs make equal-length alternatives compare exactly equal, so the
//! tie-break below is what decides between them rather than float rounding.
//!
//! # Tie-breaking
//!
//! The heap pops `(cost, node)` in ascending order, node indices following
//! lexicographic node-id order.  When a node is reached at equal cost from
//! two predecessors it keeps the predecessor whose id sorts first.  Equal
//! inputs therefore always yield bit-identical paths.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};

use vt_core::{EdgeIdx, NodeId, NodeIdx, OperationMode, RouteType, SegmentId, SegmentIdx, heading_delta};

use crate::config::{AirportContext, ModeConfig};
use crate::network::{NetworkModel, SegmentKind};
use crate::{InvalidRouteError, RouteResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// One directed traversal of a segment within a [`Path`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathLeg {
    pub segment:     SegmentId,
    pub from:        NodeId,
    pub to:          NodeId,
    pub length_m:    f64,
    /// Heading of travel along this leg, degrees true.
    pub heading_deg: f64,
    pub kind:        SegmentKind,
}

/// A validated route.  Immutable: a new route needs a new `Path`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    route_type:       RouteType,
    mode:             OperationMode,
    nodes:            Vec<NodeId>,
    legs:             Vec<PathLeg>,
    total_length_m:   f64,
    runway_crossings: Vec<usize>,
}

impl Path {
    pub fn route_type(&self) -> RouteType {
        self.route_type
    }

    pub fn mode(&self) -> &OperationMode {
        &self.mode
    }

    /// Visited nodes in order; always one more than [`legs`](Self::legs).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn legs(&self) -> &[PathLeg] {
        &self.legs
    }

    pub fn total_length_m(&self) -> f64 {
        self.total_length_m
    }

    /// Indices into [`nodes`](Self::nodes) where the route crosses a runway
    /// it does not travel along.
    pub fn runway_crossings(&self) -> &[usize] {
        &self.runway_crossings
    }

    pub fn first_node(&self) -> &NodeId {
        &self.nodes[0]
    }

    pub fn last_node(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Distance from the start at which each node is reached.
    pub fn node_distances(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut acc = 0.0;
        out.push(acc);
        for leg in &self.legs {
            acc += leg.length_m;
            out.push(acc);
        }
        out
    }

    /// `true` if the route never leaves its first node.
    pub fn is_trivial(&self) -> bool {
        self.legs.is_empty()
    }

    /// Assemble a path directly from legs, without routing or validation.
    ///
    /// Intended for replaying recorded routes and for exercising the motion
    /// simulator on synthetic geometry.  Legs must chain (`legs[i].to ==
    /// legs[i + 1].from`); `start` is used only when `legs` is empty.
    pub fn from_legs(
        route_type: RouteType,
        mode:       OperationMode,
        start:      NodeId,
        legs:       Vec<PathLeg>,
    ) -> Self {
        let mut nodes = Vec::with_capacity(legs.len() + 1);
        nodes.push(legs.first().map(|l| l.from.clone()).unwrap_or(start));
        nodes.extend(legs.iter().map(|l| l.to.clone()));
        let total_length_m = legs.iter().map(|l| l.length_m).sum();
        Self {
            route_type,
            mode,
            nodes,
            legs,
            total_length_m,
            runway_crossings: Vec::new(),
        }
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

/// Everything needed for one [`Pathfinder::find_path`] call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub route_type: RouteType,
    /// Node ids, segment ids, or taxiway names, in visiting order.
    pub waypoints:  Vec<String>,
    pub mode:       OperationMode,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Result of a single-source search: per-node best cost and the edge that
/// reached it.
pub struct SearchTree {
    dist:      Vec<u64>,
    prev_edge: Vec<EdgeIdx>,
}

impl SearchTree {
    /// Empty tree for a graph of `n` nodes rooted at `source`.
    pub fn new(n: usize, source: NodeIdx) -> Self {
        let mut dist = vec![u64::MAX; n];
        dist[source.index()] = 0;
        Self { dist, prev_edge: vec![EdgeIdx::INVALID; n] }
    }

    /// Best cost (mm) to `node`, or `None` if it was not reached.
    #[inline]
    pub fn cost_to(&self, node: NodeIdx) -> Option<u64> {
        match self.dist[node.index()] {
            u64::MAX => None,
            c        => Some(c),
        }
    }

    /// Edges from the source to `node`, in travel order.
    pub fn edges_to(&self, network: &NetworkModel, node: NodeIdx) -> Vec<EdgeIdx> {
        let mut edges = Vec::new();
        let mut cur = node;
        loop {
            let e = self.prev_edge[cur.index()];
            if e == EdgeIdx::INVALID {
                break;
            }
            edges.push(e);
            cur = network.edge_from[e.index()];
        }
        edges.reverse();
        edges
    }
}

/// Pluggable least-cost search.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one `Pathfinder` can serve
/// concurrent requests.
pub trait Router: Send + Sync {
    /// Search from `source` until every node in `targets` is settled or the
    /// reachable graph is exhausted.  Edges with `allowed[e] == false` do not
    /// exist for this search.
    fn search(
        &self,
        network: &NetworkModel,
        allowed: &[bool],
        source:  NodeIdx,
        targets: &[NodeIdx],
    ) -> SearchTree;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra over the CSR graph, edge weight = segment length.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn search(
        &self,
        network: &NetworkModel,
        allowed: &[bool],
        source:  NodeIdx,
        targets: &[NodeIdx],
    ) -> SearchTree {
        let n = network.node_count();
        let mut tree    = SearchTree::new(n, source);
        let mut settled = vec![false; n];

        let mut is_target = vec![false; n];
        let mut remaining = 0usize;
        for t in targets {
            if !is_target[t.index()] {
                is_target[t.index()] = true;
                remaining += 1;
            }
        }

        // Min-heap via Reverse; NodeIdx as secondary key gives id-order pops.
        let mut heap: BinaryHeap<Reverse<(u64, NodeIdx)>> = BinaryHeap::new();
        heap.push(Reverse((0, source)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if settled[node.index()] || cost > tree.dist[node.index()] {
                continue;
            }
            settled[node.index()] = true;

            if is_target[node.index()] {
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }

            for edge in network.out_edges(node) {
                if !allowed[edge.index()] {
                    continue;
                }
                let next = network.edge_to[edge.index()];
                if settled[next.index()] {
                    continue;
                }
                let new_cost = cost.saturating_add(network.edge_cost_mm[edge.index()]);
                let best = tree.dist[next.index()];
                let better = new_cost < best
                    || (new_cost == best
                        && best != u64::MAX
                        && node < network.edge_from[tree.prev_edge[next.index()].index()]);
                if better {
                    tree.dist[next.index()] = new_cost;
                    tree.prev_edge[next.index()] = edge;
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }

        tree
    }
}

// ── Waypoints ─────────────────────────────────────────────────────────────────

/// A waypoint string resolved against the network.
#[derive(Clone, Copy, Debug)]
enum Waypoint<'n> {
    /// Visit this node.
    Node(NodeIdx),
    /// Traverse this segment in a permitted direction.
    Segment(SegmentIdx),
    /// Reach any endpoint of any segment carrying this name.
    Taxiway(&'n [SegmentIdx]),
}

// ── Pathfinder ────────────────────────────────────────────────────────────────

/// Builds validated [`Path`]s through ordered waypoints.
///
/// Holds only shared references and per-mode edge masks computed once at
/// construction, so `find_path` is a pure function of its arguments.
pub struct Pathfinder<'a, R: Router = DijkstraRouter> {
    ctx:    &'a AirportContext,
    router: R,
    /// Per-mode traversal mask, indexed by `EdgeIdx`.
    masks:  BTreeMap<OperationMode, Vec<bool>>,
}

impl<'a> Pathfinder<'a, DijkstraRouter> {
    pub fn new(ctx: &'a AirportContext) -> Self {
        Self::with_router(ctx, DijkstraRouter)
    }
}

impl<'a, R: Router> Pathfinder<'a, R> {
    pub fn with_router(ctx: &'a AirportContext, router: R) -> Self {
        let masks = ctx
            .config
            .modes()
            .filter_map(|mode| {
                let cfg = ctx.config.mode(mode).ok()?;
                Some((mode.clone(), edge_mask(&ctx.network, cfg)))
            })
            .collect();
        Self { ctx, router, masks }
    }

    pub fn context(&self) -> &'a AirportContext {
        self.ctx
    }

    /// Whether `edge` may be used in `mode` (`false` for unknown modes).
    pub fn edge_allowed(&self, mode: &OperationMode, edge: EdgeIdx) -> bool {
        self.masks.get(mode).is_some_and(|m| m[edge.index()])
    }

    /// Route through `waypoints` in order and validate the result for
    /// `route_type` in `mode`.
    ///
    /// # Errors
    ///
    /// [`InvalidRouteError`] for an unknown mode or waypoint, an unreachable
    /// waypoint, or endpoints that violate the mode's exit/entrance sets.
    pub fn find_path<S: AsRef<str>>(
        &self,
        route_type: RouteType,
        waypoints:  &[S],
        mode:       &OperationMode,
    ) -> RouteResult<Path> {
        let network = &self.ctx.network;
        let allowed = self
            .masks
            .get(mode)
            .ok_or_else(|| InvalidRouteError::UnknownMode(mode.clone()))?;

        if waypoints.len() < 2 {
            return Err(InvalidRouteError::TooFewWaypoints {
                route_type,
                mode: mode.clone(),
                got:  waypoints.len(),
            });
        }

        let names: Vec<&str> = waypoints.iter().map(AsRef::as_ref).collect();
        tracing::debug!(%route_type, %mode, waypoints = ?names, "find_path");

        let unknown = |w: &str| InvalidRouteError::UnknownWaypoint {
            route_type,
            mode:     mode.clone(),
            waypoint: w.to_owned(),
        };
        let unreachable = |from: &str, to: &str| InvalidRouteError::Unreachable {
            route_type,
            mode: mode.clone(),
            from: from.to_owned(),
            to:   to.to_owned(),
        };

        let resolved = names
            .iter()
            .map(|w| self.resolve(w).ok_or_else(|| unknown(w)))
            .collect::<RouteResult<Vec<_>>>()?;

        // ── Start anchor ──────────────────────────────────────────────────
        let start = match resolved[0] {
            Waypoint::Node(n) => n,
            Waypoint::Segment(s) => segment_edges(network, allowed, s)
                .first()
                .map(|&e| network.edge_to[e.index()])
                .ok_or_else(|| unreachable(names[0], names[0]))?,
            Waypoint::Taxiway(_) => {
                return Err(InvalidRouteError::AmbiguousStart {
                    route_type,
                    mode:     mode.clone(),
                    waypoint: names[0].to_owned(),
                });
            }
        };

        // ── Forced via-points ─────────────────────────────────────────────
        let mut edges: Vec<EdgeIdx> = Vec::new();
        let mut cur = start;
        for (i, wp) in resolved.iter().enumerate().skip(1) {
            let (sub, next) = self
                .sub_path(allowed, cur, *wp)
                .ok_or_else(|| unreachable(names[i - 1], names[i]))?;
            edges.extend(sub);
            cur = next;
        }

        let path = self.assemble(route_type, mode, start, &edges);
        self.ctx
            .config
            .check_endpoints(route_type, mode, path.first_node(), path.last_node())?;

        tracing::debug!(
            %route_type,
            %mode,
            legs     = path.legs.len(),
            length_m = path.total_length_m,
            crossings = path.runway_crossings.len(),
            "path found"
        );
        Ok(path)
    }

    /// [`find_path`](Self::find_path) for a packaged request.
    pub fn find_route(&self, request: &RouteRequest) -> RouteResult<Path> {
        self.find_path(request.route_type, &request.waypoints, &request.mode)
    }

    /// Route many independent requests.  Results are in request order.
    ///
    /// With the `parallel` feature the requests run on Rayon's pool.
    pub fn find_paths(&self, requests: &[RouteRequest]) -> Vec<RouteResult<Path>> {
        #[cfg(not(feature = "parallel"))]
        {
            requests.iter().map(|r| self.find_route(r)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            requests.par_iter().map(|r| self.find_route(r)).collect()
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Node id, then segment id, then taxiway name.
    fn resolve(&self, w: &str) -> Option<Waypoint<'a>> {
        let network = &self.ctx.network;
        if let Some(n) = network.node_idx(w) {
            return Some(Waypoint::Node(n));
        }
        if let Some(s) = network.segment_idx(w) {
            return Some(Waypoint::Segment(s));
        }
        let named = network.segments_named(w);
        (!named.is_empty()).then_some(Waypoint::Taxiway(named))
    }

    /// Shortest edge sequence from `from` satisfying `wp`, and the node it
    /// ends on.  `None` if `wp` cannot be reached.
    fn sub_path(
        &self,
        allowed: &[bool],
        from:    NodeIdx,
        wp:      Waypoint<'_>,
    ) -> Option<(Vec<EdgeIdx>, NodeIdx)> {
        let network = &self.ctx.network;
        match wp {
            Waypoint::Node(target) => {
                let tree = self.router.search(network, allowed, from, &[target]);
                tree.cost_to(target)?;
                Some((tree.edges_to(network, target), target))
            }

            Waypoint::Segment(s) => {
                let options = segment_edges(network, allowed, s);
                let entries: Vec<NodeIdx> =
                    options.iter().map(|e| network.edge_from[e.index()]).collect();
                let tree = self.router.search(network, allowed, from, &entries);
                let (_, _, edge) = options
                    .iter()
                    .filter_map(|&e| {
                        let entry = network.edge_from[e.index()];
                        let total = tree.cost_to(entry)? + network.edge_cost_mm[e.index()];
                        Some((total, network.edge_to[e.index()], e))
                    })
                    .min()?;
                let mut edges = tree.edges_to(network, network.edge_from[edge.index()]);
                edges.push(edge);
                Some((edges, network.edge_to[edge.index()]))
            }

            Waypoint::Taxiway(segments) => {
                let mut targets: Vec<NodeIdx> = segments
                    .iter()
                    .flat_map(|s| [network.segment_start[s.index()], network.segment_end[s.index()]])
                    .collect();
                targets.sort_unstable();
                targets.dedup();
                let tree = self.router.search(network, allowed, from, &targets);
                let (_, best) = targets
                    .iter()
                    .filter_map(|&t| tree.cost_to(t).map(|c| (c, t)))
                    .min()?;
                Some((tree.edges_to(network, best), best))
            }
        }
    }

    fn assemble(
        &self,
        route_type: RouteType,
        mode:       &OperationMode,
        start:      NodeIdx,
        edges:      &[EdgeIdx],
    ) -> Path {
        let network = &self.ctx.network;

        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(network.node_at(start).id.clone());
        let mut legs = Vec::with_capacity(edges.len());
        for &e in edges {
            let seg = network.segment_at(network.edge_segment[e.index()]);
            let from = network.node_at(network.edge_from[e.index()]).id.clone();
            let to   = network.node_at(network.edge_to[e.index()]).id.clone();
            nodes.push(to.clone());
            legs.push(PathLeg {
                segment:     seg.id.clone(),
                from,
                to,
                length_m:    seg.length_m,
                heading_deg: network.edge_heading_deg(e),
                kind:        seg.kind,
            });
        }

        let total_length_m = legs.iter().map(|l| l.length_m).sum();
        let runway_crossings = runway_crossings(network, &nodes, &legs);

        Path {
            route_type,
            mode: mode.clone(),
            nodes,
            legs,
            total_length_m,
            runway_crossings,
        }
    }
}

/// Mask of edges usable in a mode.  Runway edges must point within 90° of an
/// active runway heading; everything else the network already allows.
fn edge_mask(network: &NetworkModel, cfg: &ModeConfig) -> Vec<bool> {
    let headings = cfg.active_runway_headings();
    (0..network.edge_count())
        .map(|i| {
            let e = EdgeIdx(i as u32);
            let seg = network.segment_at(network.edge_segment[i]);
            match seg.kind {
                SegmentKind::Runway => {
                    let h = network.edge_heading_deg(e);
                    headings.iter().any(|&rh| heading_delta(h, rh) < 90.0)
                }
                SegmentKind::Taxiway | SegmentKind::Parking => true,
            }
        })
        .collect()
}

/// The permitted directed edges of segment `s`, forward edge first.
fn segment_edges(network: &NetworkModel, allowed: &[bool], s: SegmentIdx) -> Vec<EdgeIdx> {
    let (start, end) = network.segment_endpoints(s);
    let mut out = Vec::with_capacity(2);
    for (from, forward) in [(start, true), (end, false)] {
        out.extend(
            network
                .out_edges(from)
                .filter(|&e| network.edge_segment(e) == (s, forward) && allowed[e.index()]),
        );
    }
    out
}

/// Interior path nodes that touch a runway segment while the path arrives
/// and leaves on non-runway legs.
fn runway_crossings(network: &NetworkModel, nodes: &[NodeId], legs: &[PathLeg]) -> Vec<usize> {
    (1..nodes.len().saturating_sub(1))
        .filter(|&i| {
            let on_runway = legs[i - 1].kind == SegmentKind::Runway || legs[i].kind == SegmentKind::Runway;
            !on_runway
                && network
                    .node_idx(nodes[i].as_str())
                    .is_some_and(|n| network.touches_runway(n))
        })
        .collect()
}
