//! Airport ground network representation and builder.
//!
//! # Data layout
//!
//! Nodes and segments are stored in `Vec`s sorted by their string id, so a
//! dense [`NodeIdx`] compares exactly like the [`NodeId`] it stands for.  The
//! router relies on this for lexicographic tie-breaking without touching
//! strings in its inner loop.
//!
//! Traversal edges use **Compressed Sparse Row (CSR)** format.  Given a
//! `NodeIdx n`, its outgoing edges occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! A bidirectional segment contributes two edges, a one-way segment one.
//! Runway segments always contribute both; which direction is usable depends
//! on the operation mode and is decided by the router, not here.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest node.  Used to
//! snap gate or stand positions onto the network.

use std::collections::BTreeMap;
use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use vt_core::{EdgeIdx, GeoPoint, NodeId, NodeIdx, SegmentId, SegmentIdx, reciprocal_heading};

use crate::DataIntegrityError;

// ── Node / segment types ──────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Intersection,
    Gate,
    RunwayExit,
    ParkingExit,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Runway,
    Taxiway,
    #[serde(alias = "parking_position")]
    Parking,
}

/// A network vertex: an intersection, a gate, or a runway/parking exit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id:          NodeId,
    pub kind:        NodeKind,
    pub position:    GeoPoint,
    /// Ids of the segments that start or end here.
    #[serde(default)]
    pub segments:    Vec<SegmentId>,
    /// Stand identifier; only gate nodes carry one.
    #[serde(default)]
    pub gate_id:     Option<String>,
    /// Parked heading; only gate nodes carry one.
    #[serde(default)]
    pub heading_deg: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, position: GeoPoint) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            segments: Vec::new(),
            gate_id: None,
            heading_deg: None,
        }
    }

    pub fn intersection(id: impl Into<NodeId>, position: GeoPoint) -> Self {
        Self::new(id, NodeKind::Intersection, position)
    }

    pub fn gate(
        id:          impl Into<NodeId>,
        gate_id:     impl Into<String>,
        position:    GeoPoint,
        heading_deg: f64,
    ) -> Self {
        Self {
            gate_id: Some(gate_id.into()),
            heading_deg: Some(heading_deg),
            ..Self::new(id, NodeKind::Gate, position)
        }
    }
}

/// A network edge: a stretch of runway, taxiway, or parking lane between
/// two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id:          SegmentId,
    /// Display name shared by every segment of the same taxiway or runway.
    pub name:        String,
    pub kind:        SegmentKind,
    pub start:       NodeId,
    pub end:         NodeId,
    pub length_m:    f64,
    /// Heading of travel from `start` to `end`, degrees true.
    pub heading_deg: f64,
    /// Traversable `start → end` only.
    #[serde(default)]
    pub one_way:     bool,
}

impl Segment {
    pub fn new(
        id:          impl Into<SegmentId>,
        name:        impl Into<String>,
        kind:        SegmentKind,
        start:       impl Into<NodeId>,
        end:         impl Into<NodeId>,
        length_m:    f64,
        heading_deg: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            start: start.into(),
            end: end.into(),
            length_m,
            heading_deg,
            one_way: false,
        }
    }

    /// Mark the segment as traversable `start → end` only.
    pub fn one_way(mut self) -> Self {
        self.one_way = true;
        self
    }

    /// Heading when travelling the segment forwards (`true`) or backwards.
    #[inline]
    pub fn heading_for(&self, forward: bool) -> f64 {
        if forward { self.heading_deg } else { reciprocal_heading(self.heading_deg) }
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    idx:   NodeIdx,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough for
    /// nearest-node queries across a single aerodrome.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── NetworkModel ──────────────────────────────────────────────────────────────

/// Immutable airport ground graph.
///
/// Built once (via [`NetworkModel::build`] or [`NetworkBuilder`]) and then
/// shared read-only; there is no mutation API, so `&NetworkModel` can be
/// handed to any number of threads.
pub struct NetworkModel {
    nodes:          Vec<Node>,
    segments:       Vec<Segment>,
    node_lookup:    FxHashMap<NodeId, NodeIdx>,
    segment_lookup: FxHashMap<SegmentId, SegmentIdx>,
    by_name:        BTreeMap<String, Vec<SegmentIdx>>,

    /// Resolved endpoints of each segment, indexed by `SegmentIdx`.
    pub(crate) segment_start: Vec<NodeIdx>,
    pub(crate) segment_end:   Vec<NodeIdx>,
    /// Per node: an endpoint of some runway segment.  Derived from the
    /// resolved endpoints, never from the nodes' own incidence lists.
    touches_runway: Vec<bool>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub(crate) node_out_start: Vec<u32>,
    /// Source node of each edge (route reconstruction).
    pub(crate) edge_from:      Vec<NodeIdx>,
    pub(crate) edge_to:        Vec<NodeIdx>,
    pub(crate) edge_segment:   Vec<SegmentIdx>,
    /// `true` when the edge follows its segment `start → end`.
    pub(crate) edge_forward:   Vec<bool>,
    /// Segment length in whole millimetres: the exact integer search cost.
    pub(crate) edge_cost_mm:   Vec<u64>,

    spatial_idx: RTree<NodeEntry>,
}

impl fmt::Debug for NetworkModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkModel")
            .field("nodes", &self.nodes.len())
            .field("segments", &self.segments.len())
            .field("edges", &self.edge_to.len())
            .finish_non_exhaustive()
    }
}

impl NetworkModel {
    /// Validate `nodes` and `segments` and assemble the graph.
    ///
    /// # Errors
    ///
    /// [`DataIntegrityError`] on duplicate ids, dangling node or segment
    /// references, or non-finite / negative geometry.
    pub fn build(nodes: Vec<Node>, segments: Vec<Segment>) -> Result<Self, DataIntegrityError> {
        let mut nodes = nodes;
        let mut segments = segments;
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        segments.sort_by(|a, b| a.id.cmp(&b.id));

        // ── Node checks ───────────────────────────────────────────────────
        let mut node_lookup = FxHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            let finite_heading = node.heading_deg.is_none_or(f64::is_finite);
            if !node.position.is_finite() || !finite_heading {
                return Err(DataIntegrityError::InvalidNodeGeometry(node.id.clone()));
            }
            if node_lookup.insert(node.id.clone(), NodeIdx(i as u32)).is_some() {
                return Err(DataIntegrityError::DuplicateNode(node.id.clone()));
            }
        }

        // ── Segment checks ────────────────────────────────────────────────
        let mut segment_lookup = FxHashMap::default();
        let mut segment_start = Vec::with_capacity(segments.len());
        let mut segment_end   = Vec::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            if !seg.length_m.is_finite() || seg.length_m < 0.0 {
                return Err(DataIntegrityError::InvalidLength {
                    segment:  seg.id.clone(),
                    length_m: seg.length_m,
                });
            }
            if !seg.heading_deg.is_finite() {
                return Err(DataIntegrityError::InvalidHeading {
                    segment:     seg.id.clone(),
                    heading_deg: seg.heading_deg,
                });
            }
            if segment_lookup.insert(seg.id.clone(), SegmentIdx(i as u32)).is_some() {
                return Err(DataIntegrityError::DuplicateSegment(seg.id.clone()));
            }
            let resolve = |id: &NodeId| {
                node_lookup.get(id).copied().ok_or_else(|| DataIntegrityError::MissingNode {
                    segment: seg.id.clone(),
                    node:    id.clone(),
                })
            };
            segment_start.push(resolve(&seg.start)?);
            segment_end.push(resolve(&seg.end)?);
        }

        // ── Incidence lists ───────────────────────────────────────────────
        for node in &nodes {
            for sid in &node.segments {
                let Some(&s) = segment_lookup.get(sid) else {
                    return Err(DataIntegrityError::MissingSegment {
                        node:    node.id.clone(),
                        segment: sid.clone(),
                    });
                };
                let seg = &segments[s.index()];
                if seg.start != node.id && seg.end != node.id {
                    tracing::warn!(node = %node.id, segment = %sid, "node lists a segment that does not touch it");
                }
            }
        }
        for seg in &segments {
            for endpoint in [&seg.start, &seg.end] {
                let node = &nodes[node_lookup[endpoint].index()];
                if !node.segments.contains(&seg.id) {
                    tracing::warn!(node = %endpoint, segment = %seg.id, "segment endpoint does not list the segment");
                }
            }
        }

        let mut touches_runway = vec![false; nodes.len()];
        for (i, seg) in segments.iter().enumerate() {
            if seg.kind == SegmentKind::Runway {
                touches_runway[segment_start[i].index()] = true;
                touches_runway[segment_end[i].index()] = true;
            }
        }

        // ── Directed edges, sorted by (from, to, segment) ─────────────────
        struct RawEdge {
            from:    NodeIdx,
            to:      NodeIdx,
            segment: SegmentIdx,
            forward: bool,
        }
        let mut raw = Vec::with_capacity(segments.len() * 2);
        for (i, seg) in segments.iter().enumerate() {
            let s = SegmentIdx(i as u32);
            let (a, b) = (segment_start[i], segment_end[i]);
            raw.push(RawEdge { from: a, to: b, segment: s, forward: true });
            if !seg.one_way {
                raw.push(RawEdge { from: b, to: a, segment: s, forward: false });
            }
        }
        raw.sort_unstable_by_key(|e| (e.from, e.to, e.segment, !e.forward));

        let node_count = nodes.len();
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let edge_from    = raw.iter().map(|e| e.from).collect();
        let edge_to      = raw.iter().map(|e| e.to).collect();
        let edge_segment = raw.iter().map(|e| e.segment).collect();
        let edge_forward = raw.iter().map(|e| e.forward).collect();
        let edge_cost_mm = raw
            .iter()
            .map(|e| length_to_mm(segments[e.segment.index()].length_m))
            .collect();

        let mut by_name: BTreeMap<String, Vec<SegmentIdx>> = BTreeMap::new();
        for (i, seg) in segments.iter().enumerate() {
            by_name.entry(seg.name.clone()).or_default().push(SegmentIdx(i as u32));
        }

        let entries: Vec<NodeEntry> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry {
                point: [n.position.lat, n.position.lon],
                idx:   NodeIdx(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        tracing::debug!(
            nodes    = node_count,
            segments = segments.len(),
            edges    = raw.len(),
            "network built"
        );

        Ok(NetworkModel {
            nodes,
            segments,
            node_lookup,
            segment_lookup,
            by_name,
            segment_start,
            segment_end,
            touches_runway,
            node_out_start,
            edge_from,
            edge_to,
            edge_segment,
            edge_forward,
            edge_cost_mm,
            spatial_idx,
        })
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Read-only graph views ─────────────────────────────────────────────

    /// `(start, end)` of segment `s`.
    #[inline]
    pub fn segment_endpoints(&self, s: SegmentIdx) -> (NodeIdx, NodeIdx) {
        (self.segment_start[s.index()], self.segment_end[s.index()])
    }

    /// `true` if `node` is an endpoint of any runway segment.
    #[inline]
    pub fn touches_runway(&self, node: NodeIdx) -> bool {
        self.touches_runway[node.index()]
    }

    /// `(from, to)` of directed edge `e`.
    #[inline]
    pub fn edge_endpoints(&self, e: EdgeIdx) -> (NodeIdx, NodeIdx) {
        (self.edge_from[e.index()], self.edge_to[e.index()])
    }

    /// The segment edge `e` traverses and whether it runs `start → end`.
    #[inline]
    pub fn edge_segment(&self, e: EdgeIdx) -> (SegmentIdx, bool) {
        (self.edge_segment[e.index()], self.edge_forward[e.index()])
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_idx(id).map(|i| &self.nodes[i.index()])
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segment_idx(id).map(|i| &self.segments[i.index()])
    }

    #[inline]
    pub fn node_idx(&self, id: &str) -> Option<NodeIdx> {
        self.node_lookup.get(id).copied()
    }

    #[inline]
    pub fn segment_idx(&self, id: &str) -> Option<SegmentIdx> {
        self.segment_lookup.get(id).copied()
    }

    #[inline]
    pub fn node_at(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    #[inline]
    pub fn segment_at(&self, idx: SegmentIdx) -> &Segment {
        &self.segments[idx.index()]
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All segments in id order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments sharing the display name `name` (e.g. every piece of
    /// taxiway `"W2"`), in id order.  Empty if the name is unknown.
    pub fn segments_named(&self, name: &str) -> &[SegmentIdx] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Gate nodes in id order.
    pub fn gates(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Gate)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the outgoing edges of `node`, a contiguous index range.
    #[inline]
    pub fn out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeIdx(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeIdx) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Heading of travel along `edge`, degrees true.
    #[inline]
    pub fn edge_heading_deg(&self, edge: EdgeIdx) -> f64 {
        let seg = &self.segments[self.edge_segment[edge.index()].index()];
        seg.heading_for(self.edge_forward[edge.index()])
    }

    /// Neighbours of `id` as `(adjacent node, via segment)` pairs, honouring
    /// one-way segments.  `None` if `id` is unknown.
    pub fn neighbors(&self, id: &str) -> Option<Vec<(&NodeId, &SegmentId)>> {
        let idx = self.node_idx(id)?;
        Some(
            self.out_edges(idx)
                .map(|e| {
                    let to  = &self.nodes[self.edge_to[e.index()].index()].id;
                    let via = &self.segments[self.edge_segment[e.index()].index()].id;
                    (to, via)
                })
                .collect(),
        )
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node closest to `pos`.  `None` only for an empty network.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<&NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| &self.nodes[e.idx.index()].id)
    }

    /// Up to `k` nodes nearest to `pos`, by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<&NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| &self.nodes[e.idx.index()].id)
            .collect()
    }
}

/// Metres → whole millimetres, the integer cost unit of the router.
#[inline]
pub(crate) fn length_to_mm(length_m: f64) -> u64 {
    (length_m * 1_000.0).round() as u64
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Collect nodes and segments in any order, then call [`build`](Self::build).
///
/// Unlike [`NetworkModel::build`], the builder fills in each node's incident
/// segment list from the segments it was given, so hand-written networks do
/// not have to repeat that bookkeeping.
///
/// # Example
///
/// ```
/// use vt_core::GeoPoint;
/// use vt_network::{Node, NetworkBuilder, Segment, SegmentKind};
///
/// let mut b = NetworkBuilder::new();
/// b.node(Node::intersection("A", GeoPoint::new(48.72, 2.36)));
/// b.node(Node::intersection("B", GeoPoint::new(48.72, 2.37)));
/// b.segment(Segment::new("A-B", "T1", SegmentKind::Taxiway, "A", "B", 730.0, 90.0));
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct NetworkBuilder {
    nodes:    Vec<Node>,
    segments: Vec<Segment>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, segments: usize) -> Self {
        Self {
            nodes:    Vec::with_capacity(nodes),
            segments: Vec::with_capacity(segments),
        }
    }

    pub fn node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn segment(&mut self, segment: Segment) -> &mut Self {
        self.segments.push(segment);
        self
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn segment_count(&self) -> usize { self.segments.len() }

    /// Fill incidence lists and hand over to [`NetworkModel::build`].
    pub fn build(self) -> Result<NetworkModel, DataIntegrityError> {
        let mut nodes = self.nodes;
        let mut position: FxHashMap<NodeId, usize> = FxHashMap::default();
        for (i, n) in nodes.iter().enumerate() {
            position.entry(n.id.clone()).or_insert(i);
        }
        for seg in &self.segments {
            for endpoint in [&seg.start, &seg.end] {
                if let Some(&i) = position.get(endpoint) {
                    let list = &mut nodes[i].segments;
                    if !list.contains(&seg.id) {
                        list.push(seg.id.clone());
                    }
                }
            }
        }
        NetworkModel::build(nodes, self.segments)
    }
}
