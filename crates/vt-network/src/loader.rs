//! CSV network loader and JSON configuration loader.
//!
//! # Node CSV
//!
//! ```csv
//! node_id,node_type,lat,lon,segments,gate_id,heading
//! W37,runway_exit,48.7262,2.3652,RWY1;W37-A,,
//! G12,gate,48.7301,2.3701,G12-A,A12,245.0
//! ```
//!
//! `segments` is a `;`-separated list of incident segment ids; `gate_id` and
//! `heading` are left empty for non-gate nodes.
//!
//! # Segment CSV
//!
//! ```csv
//! segment_id,name,segment_type,start_node,end_node,length,heading,one_way
//! W37-A,W37,taxiway,W37,A,118.4,212.0,false
//! ```
//!
//! `one_way` may be omitted (defaults to `false`).
//!
//! # Configuration JSON
//!
//! One object per operation mode:
//!
//! ```json
//! { "WEST": { "departure_runway": "24", "arrival_runway": "26",
//!             "entrances": ["W2"], "exits": ["W34", "W35"] } }
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use vt_core::{GeoPoint, SegmentId};

use crate::config::{AirportConfig, AirportContext};
use crate::network::{NetworkModel, Node, NodeKind, Segment, SegmentKind};
use crate::{LoadError, LoadResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id:   String,
    node_type: NodeKind,
    lat:       f64,
    lon:       f64,
    #[serde(default)]
    segments:  String,
    #[serde(default)]
    gate_id:   Option<String>,
    #[serde(default)]
    heading:   Option<f64>,
}

#[derive(Deserialize)]
struct SegmentRecord {
    segment_id:   String,
    name:         String,
    segment_type: SegmentKind,
    start_node:   String,
    end_node:     String,
    length:       f64,
    heading:      f64,
    #[serde(default)]
    one_way:      bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NetworkModel`] from node and segment CSV files.
pub fn load_network(nodes_csv: &Path, segments_csv: &Path) -> LoadResult<NetworkModel> {
    let nodes = std::fs::File::open(nodes_csv)?;
    let segments = std::fs::File::open(segments_csv)?;
    load_network_reader(nodes, segments)
}

/// Like [`load_network`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded data.
pub fn load_network_reader<N: Read, S: Read>(nodes: N, segments: S) -> LoadResult<NetworkModel> {
    let nodes = read_nodes(nodes)?;
    let segments = read_segments(segments)?;
    tracing::debug!(nodes = nodes.len(), segments = segments.len(), "network records read");
    Ok(NetworkModel::build(nodes, segments)?)
}

/// Load an [`AirportConfig`] from a JSON file.
pub fn load_config(path: &Path) -> LoadResult<AirportConfig> {
    let file = std::fs::File::open(path)?;
    load_config_reader(file)
}

/// Like [`load_config`] but accepts any `Read` source.
pub fn load_config_reader<R: Read>(reader: R) -> LoadResult<AirportConfig> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load network and configuration together and cross-validate them.
pub fn load_context(nodes_csv: &Path, segments_csv: &Path, config_json: &Path) -> LoadResult<AirportContext> {
    let network = load_network(nodes_csv, segments_csv)?;
    let config = load_config(config_json)?;
    Ok(AirportContext::new(network, config)?)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_nodes<R: Read>(reader: R) -> LoadResult<Vec<Node>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut nodes = Vec::new();
    for result in csv_reader.deserialize::<NodeRecord>() {
        let r = result?;
        if r.node_type == NodeKind::Gate && r.gate_id.is_none() {
            return Err(LoadError::Record(format!("gate node {} has no gate_id", r.node_id)));
        }
        nodes.push(Node {
            id:          r.node_id.into(),
            kind:        r.node_type,
            position:    GeoPoint::new(r.lat, r.lon),
            segments:    split_list(&r.segments),
            gate_id:     r.gate_id.filter(|g| !g.is_empty()),
            heading_deg: r.heading,
        });
    }
    Ok(nodes)
}

fn read_segments<R: Read>(reader: R) -> LoadResult<Vec<Segment>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut segments = Vec::new();
    for result in csv_reader.deserialize::<SegmentRecord>() {
        let r = result?;
        segments.push(Segment {
            id:          r.segment_id.into(),
            name:        r.name,
            kind:        r.segment_type,
            start:       r.start_node.into(),
            end:         r.end_node.into(),
            length_m:    r.length,
            heading_deg: r.heading,
            one_way:     r.one_way,
        });
    }
    Ok(segments)
}

fn split_list(s: &str) -> Vec<SegmentId> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(SegmentId::from)
        .collect()
}
