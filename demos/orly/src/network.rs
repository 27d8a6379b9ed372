//! Synthetic movement area loosely modelled on Paris-Orly's western apron.
//!
//! One east-west taxiway (A) north of runway 08/26, two terminals of stands
//! on its north side, and a cargo stand south of the runway reached by
//! crossing it on taxiway B.
//!
//! ```text
//!   G10  G12        G20  G22                 (terminals K, L)
//!    |    |          |    |
//!   W37--W36--W35--W34--W4--W2               taxiway A
//!    |         |         |   |
//!   R37-------X---------R4--R2               runway 08/26
//!              |
//!              S1--G40                       (cargo stand M40)
//! ```

use vt_core::GeoPoint;
use vt_network::{DataIntegrityError, NetworkBuilder, NetworkModel, Node, NodeKind, Segment, SegmentKind};

const LAT_STANDS: f64 = 48.7320;
const LAT_A:      f64 = 48.7310;
const LAT_RWY:    f64 = 48.7290;
const LAT_SOUTH:  f64 = 48.7270;

/// Metres between adjacent taxiway-A nodes (0.004° of longitude).
const A_STEP_M:   f64 = 294.0;
/// Taxiway A to runway centreline.
const LINK_M:     f64 = 222.0;
const PARKING_M:  f64 = 111.0;

pub fn build_network() -> Result<NetworkModel, DataIntegrityError> {
    let mut b = NetworkBuilder::with_capacity(16, 18);

    let a_nodes = [("W37", 2.380), ("W36", 2.376), ("W35", 2.372), ("W34", 2.368), ("W4", 2.364), ("W2", 2.360)];
    for (id, lon) in a_nodes {
        b.node(Node::new(id, NodeKind::RunwayExit, GeoPoint::new(LAT_A, lon)));
    }
    b.node(Node::intersection("R37", GeoPoint::new(LAT_RWY, 2.380)));
    b.node(Node::intersection("X",   GeoPoint::new(LAT_RWY, 2.372)));
    b.node(Node::intersection("R4",  GeoPoint::new(LAT_RWY, 2.364)));
    b.node(Node::intersection("R2",  GeoPoint::new(LAT_RWY, 2.360)));
    b.node(Node::intersection("S1",  GeoPoint::new(LAT_SOUTH, 2.372)));

    b.node(Node::gate("G10", "K10", GeoPoint::new(LAT_STANDS, 2.376), 180.0));
    b.node(Node::gate("G12", "K12", GeoPoint::new(LAT_STANDS, 2.372), 180.0));
    b.node(Node::gate("G20", "L20", GeoPoint::new(LAT_STANDS, 2.368), 180.0));
    b.node(Node::gate("G22", "L22", GeoPoint::new(LAT_STANDS, 2.364), 180.0));
    b.node(Node::gate("G40", "M40", GeoPoint::new(LAT_SOUTH, 2.376), 270.0));

    // Taxiway A, numbered east to west.
    for (i, pair) in a_nodes.windows(2).enumerate() {
        b.segment(Segment::new(format!("A{}", i + 1), "A", SegmentKind::Taxiway, pair[0].0, pair[1].0, A_STEP_M, 270.0));
    }

    // Runway links and the crossing.
    b.segment(Segment::new("C37", "C", SegmentKind::Taxiway, "R37", "W37", LINK_M, 0.0));
    b.segment(Segment::new("C4",  "C", SegmentKind::Taxiway, "R4",  "W4",  LINK_M, 0.0));
    b.segment(Segment::new("C2",  "C", SegmentKind::Taxiway, "R2",  "W2",  LINK_M, 0.0));
    b.segment(Segment::new("B1",  "B", SegmentKind::Taxiway, "W35", "X",   LINK_M, 180.0));
    b.segment(Segment::new("B2",  "B", SegmentKind::Taxiway, "X",   "S1",  LINK_M, 180.0));

    b.segment(Segment::new("RWY1", "08/26", SegmentKind::Runway, "R37", "X",  2.0 * A_STEP_M, 270.0));
    b.segment(Segment::new("RWY2", "08/26", SegmentKind::Runway, "X",   "R4", 2.0 * A_STEP_M, 270.0));
    b.segment(Segment::new("RWY3", "08/26", SegmentKind::Runway, "R4",  "R2", A_STEP_M,       270.0));

    // Stands.
    for (gate, taxi) in [("G10", "W36"), ("G12", "W35"), ("G20", "W34"), ("G22", "W4")] {
        b.segment(Segment::new(format!("P{}", &gate[1..]), "P", SegmentKind::Parking, gate, taxi, PARKING_M, 180.0));
    }
    b.segment(Segment::new("P40", "P", SegmentKind::Parking, "G40", "S1", 0.5 * A_STEP_M, 90.0));

    b.build()
}

/// Mode table in the on-disk JSON layout.
pub const CONFIG_JSON: &str = r#"{
    "WEST": {
        "departure_runway": "26",
        "arrival_runway":   "26",
        "entrances":        ["W37"],
        "exits":            ["W4", "W2"]
    },
    "EAST": {
        "departure_runway": "08",
        "arrival_runway":   "08",
        "entrances":        ["W2"],
        "exits":            ["W35", "W37"]
    }
}"#;
