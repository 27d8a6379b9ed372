//! Unit tests for vt-network.
//!
//! Everything runs against hand-written networks; no data files needed.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeSet;

    use vt_core::{GeoPoint, NodeId};

    use crate::{
        AirportConfig, AirportContext, ModeConfig, NetworkBuilder, NetworkModel, Node, Segment,
        SegmentKind,
    };

    pub fn set(ids: &[&str]) -> BTreeSet<NodeId> {
        ids.iter().map(|s| NodeId::from(*s)).collect()
    }

    pub fn mode(dep: &str, arr: &str, entrances: &[&str], exits: &[&str]) -> ModeConfig {
        ModeConfig {
            departure_runway: dep.into(),
            arrival_runway:   arr.into(),
            entrances:        set(entrances),
            exits:            set(exits),
        }
    }

    /// A small Orly-like apron.
    ///
    /// ```text
    ///   G10(K10)        G20(K20)        G30(M30)
    ///    |               |               |
    ///  W37 --A1-- W36 --A2-- W35 --A3-- W34 --A4-- W4 --A5-- W2      taxiway A, 100 m legs
    ///   |C37(90)   |P10      |B1(80)               |C4(80)
    ///  R37 ======RWY1====== X ======RWY2======= R4                  runway 06/24, 200 m legs, R37→R4 = 240°
    ///                       |B2(80)
    ///                       S1 --P40-- G40(M40)
    ///
    ///  ISO: isolated node.
    /// ```
    ///
    /// WEST: runways 24/26, exits {W34,W35,W4,W36,W37}, entrances {W2}.
    /// EAST: runways 06/08, exits {W2,W4}, entrances {W37,W36}.
    pub fn orly_network() -> NetworkModel {
        let mut b = NetworkBuilder::new();
        let lat_a = 48.730;
        for (i, id) in ["W37", "W36", "W35", "W34", "W4", "W2"].iter().enumerate() {
            b.node(Node::intersection(*id, GeoPoint::new(lat_a, 2.40 - 0.01 * i as f64)));
        }
        b.node(Node::intersection("R37", GeoPoint::new(48.725, 2.40)));
        b.node(Node::intersection("X", GeoPoint::new(48.725, 2.38)));
        b.node(Node::intersection("R4", GeoPoint::new(48.725, 2.36)));
        b.node(Node::intersection("S1", GeoPoint::new(48.720, 2.38)));
        b.node(Node::intersection("ISO", GeoPoint::new(48.700, 2.30)));
        b.node(Node::gate("G10", "K10", GeoPoint::new(48.735, 2.39), 180.0));
        b.node(Node::gate("G20", "K20", GeoPoint::new(48.735, 2.37), 180.0));
        b.node(Node::gate("G30", "M30", GeoPoint::new(48.735, 2.35), 180.0));
        b.node(Node::gate("G40", "M40", GeoPoint::new(48.715, 2.38), 0.0));

        let taxi = SegmentKind::Taxiway;
        b.segment(Segment::new("A1", "A", taxi, "W37", "W36", 100.0, 270.0));
        b.segment(Segment::new("A2", "A", taxi, "W36", "W35", 100.0, 270.0));
        b.segment(Segment::new("A3", "A", taxi, "W35", "W34", 100.0, 270.0));
        b.segment(Segment::new("A4", "A", taxi, "W34", "W4", 100.0, 270.0));
        b.segment(Segment::new("A5", "A", taxi, "W4", "W2", 100.0, 270.0));
        b.segment(Segment::new("C37", "C", taxi, "R37", "W37", 90.0, 0.0));
        b.segment(Segment::new("C4", "C", taxi, "R4", "W4", 80.0, 0.0));
        b.segment(Segment::new("B1", "B", taxi, "W35", "X", 80.0, 180.0));
        b.segment(Segment::new("B2", "B", taxi, "X", "S1", 80.0, 180.0));
        b.segment(Segment::new("RWY1", "06/24", SegmentKind::Runway, "R37", "X", 200.0, 240.0));
        b.segment(Segment::new("RWY2", "06/24", SegmentKind::Runway, "X", "R4", 200.0, 240.0));
        b.segment(Segment::new("P10", "P10", SegmentKind::Parking, "G10", "W36", 60.0, 180.0));
        b.segment(Segment::new("P20", "P20", SegmentKind::Parking, "G20", "W34", 60.0, 180.0));
        b.segment(Segment::new("P30", "P30", SegmentKind::Parking, "G30", "W2", 60.0, 180.0));
        b.segment(Segment::new("P40", "P40", SegmentKind::Parking, "G40", "S1", 60.0, 0.0));
        b.build().unwrap()
    }

    pub fn orly_config() -> AirportConfig {
        AirportConfig::default()
            .with_mode("WEST", mode("24", "26", &["W2"], &["W34", "W35", "W4", "W36", "W37"]))
            .with_mode("EAST", mode("06", "08", &["W37", "W36"], &["W2", "W4"]))
    }

    pub fn orly() -> AirportContext {
        AirportContext::new(orly_network(), orly_config()).unwrap()
    }

    /// Square A-B-D / A-C-D with equal-length sides, built with segments in
    /// the given order.
    pub fn square(order: &[usize]) -> AirportContext {
        let segs = [
            Segment::new("AB", "T", SegmentKind::Taxiway, "A", "B", 100.0, 90.0),
            Segment::new("BD", "T", SegmentKind::Taxiway, "B", "D", 100.0, 180.0),
            Segment::new("AC", "T", SegmentKind::Taxiway, "A", "C", 100.0, 180.0),
            Segment::new("CD", "T", SegmentKind::Taxiway, "C", "D", 100.0, 90.0),
        ];
        let mut b = NetworkBuilder::new();
        for id in ["D", "C", "B", "A"] {
            b.node(Node::intersection(id, GeoPoint::new(0.0, 0.0)));
        }
        for &i in order {
            b.segment(segs[i].clone());
        }
        let config = AirportConfig::default().with_mode("M", mode("09", "09", &["A", "D"], &["A", "D"]));
        AirportContext::new(b.build().unwrap(), config).unwrap()
    }
}

// ── Builder & integrity ───────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use vt_core::{GeoPoint, NodeId, SegmentId};

    use crate::{DataIntegrityError, NetworkBuilder, NetworkModel, Node, Segment, SegmentKind};

    fn pt() -> GeoPoint {
        GeoPoint::new(48.72, 2.36)
    }

    fn seg(id: &str, a: &str, b: &str) -> Segment {
        Segment::new(id, "T", SegmentKind::Taxiway, a, b, 50.0, 90.0)
    }

    #[test]
    fn empty_build() {
        let net = NetworkBuilder::new().build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert!(net.nearest_node(pt()).is_none());
    }

    #[test]
    fn orly_dimensions() {
        let net = super::helpers::orly_network();
        assert_eq!(net.node_count(), 15);
        assert_eq!(net.segment_count(), 15);
        assert_eq!(net.edge_count(), 30); // all bidirectional
        assert_eq!(net.gates().count(), 4);
        assert_eq!(net.segments_named("A").len(), 5);
        assert_eq!(net.segments_named("06/24").len(), 2);
        assert!(net.segments_named("Z").is_empty());
    }

    #[test]
    fn builder_fills_incidence_lists() {
        let net = super::helpers::orly_network();
        let x = net.node("X").unwrap();
        let mut listed: Vec<&str> = x.segments.iter().map(SegmentId::as_str).collect();
        listed.sort_unstable();
        assert_eq!(listed, ["B1", "B2", "RWY1", "RWY2"]);
    }

    #[test]
    fn node_indices_follow_id_order() {
        let net = super::helpers::orly_network();
        let ids: Vec<&NodeId> = net.nodes().iter().map(|n| &n.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        for (i, n) in net.nodes().iter().enumerate() {
            assert_eq!(net.node_idx(n.id.as_str()).unwrap().index(), i);
        }
    }

    #[test]
    fn csr_edges_are_grouped_by_source() {
        let net = super::helpers::orly_network();
        for n in 0..net.node_count() {
            let idx = vt_core::NodeIdx(n as u32);
            for e in net.out_edges(idx) {
                assert_eq!(net.edge_endpoints(e).0, idx);
            }
        }
        let x = net.node_idx("X").unwrap();
        assert_eq!(net.out_degree(x), 4);
    }

    #[test]
    fn runway_incidence_from_endpoints() {
        let net = super::helpers::orly_network();
        for (id, expected) in [("R37", true), ("X", true), ("R4", true), ("W35", false), ("G40", false)] {
            assert_eq!(net.touches_runway(net.node_idx(id).unwrap()), expected, "{id}");
        }
        let rwy1 = net.segment_idx("RWY1").unwrap();
        assert_eq!(
            net.segment_endpoints(rwy1),
            (net.node_idx("R37").unwrap(), net.node_idx("X").unwrap())
        );
    }

    #[test]
    fn debug_lists_dimensions() {
        let net = super::helpers::orly_network();
        let s = format!("{net:?}");
        assert!(s.starts_with("NetworkModel"));
        assert!(s.contains("nodes: 15"));
        assert!(s.contains("segments: 15"));
    }

    #[test]
    fn neighbors_honour_one_way() {
        let mut b = NetworkBuilder::new();
        for id in ["A", "B", "C"] {
            b.node(Node::intersection(id, pt()));
        }
        b.segment(seg("AB", "A", "B").one_way());
        b.segment(seg("BC", "B", "C"));
        let net = b.build().unwrap();

        let from_a = net.neighbors("A").unwrap();
        assert_eq!(from_a.len(), 1);
        assert_eq!(from_a[0].0.as_str(), "B");
        assert_eq!(from_a[0].1.as_str(), "AB");

        let from_b: Vec<&str> = net.neighbors("B").unwrap().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(from_b, ["C"]);
        assert!(net.neighbors("Z").is_none());
    }

    #[test]
    fn reverse_edge_heading_is_reciprocal() {
        let net = super::helpers::orly_network();
        let r4 = net.node_idx("R4").unwrap();
        let rwy2 = net.segment_idx("RWY2").unwrap();
        let back = net
            .out_edges(r4)
            .find(|&e| net.edge_segment(e).0 == rwy2)
            .unwrap();
        assert_eq!(net.edge_segment(back), (rwy2, false));
        assert_eq!(net.edge_endpoints(back), (r4, net.node_idx("X").unwrap()));
        assert!((net.edge_heading_deg(back) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut b = NetworkBuilder::new();
        b.node(Node::intersection("A", pt()));
        b.node(Node::intersection("A", pt()));
        assert_eq!(b.build().err(), Some(DataIntegrityError::DuplicateNode("A".into())));
    }

    #[test]
    fn duplicate_segment_rejected() {
        let mut b = NetworkBuilder::new();
        b.node(Node::intersection("A", pt()));
        b.node(Node::intersection("B", pt()));
        b.segment(seg("S", "A", "B"));
        b.segment(seg("S", "B", "A"));
        assert_eq!(b.build().err(), Some(DataIntegrityError::DuplicateSegment("S".into())));
    }

    #[test]
    fn dangling_endpoint_rejected() {
        let mut b = NetworkBuilder::new();
        b.node(Node::intersection("A", pt()));
        b.segment(seg("S", "A", "GHOST"));
        assert_eq!(
            b.build().err(),
            Some(DataIntegrityError::MissingNode { segment: "S".into(), node: "GHOST".into() })
        );
    }

    #[test]
    fn listed_missing_segment_rejected() {
        let mut a = Node::intersection("A", pt());
        a.segments.push("GHOST".into());
        let err = NetworkModel::build(vec![a], vec![]).err();
        assert_eq!(
            err,
            Some(DataIntegrityError::MissingSegment { node: "A".into(), segment: "GHOST".into() })
        );
    }

    #[test]
    fn bad_geometry_rejected() {
        let nodes = || vec![Node::intersection("A", pt()), Node::intersection("B", pt())];

        let mut negative = seg("S", "A", "B");
        negative.length_m = -1.0;
        assert!(matches!(
            NetworkModel::build(nodes(), vec![negative]),
            Err(DataIntegrityError::InvalidLength { .. })
        ));

        let mut nan = seg("S", "A", "B");
        nan.heading_deg = f64::NAN;
        assert!(matches!(
            NetworkModel::build(nodes(), vec![nan]),
            Err(DataIntegrityError::InvalidHeading { .. })
        ));

        let bad_node = Node::intersection("N", GeoPoint::new(f64::INFINITY, 0.0));
        assert_eq!(
            NetworkModel::build(vec![bad_node], vec![]).err(),
            Some(DataIntegrityError::InvalidNodeGeometry("N".into()))
        );
    }

    #[test]
    fn zero_length_segment_allowed() {
        let mut b = NetworkBuilder::new();
        b.node(Node::intersection("A", pt()));
        b.node(Node::intersection("B", pt()));
        b.segment(Segment::new("S", "T", SegmentKind::Taxiway, "A", "B", 0.0, 90.0));
        let net = b.build().unwrap();
        assert_eq!(net.edge_cost_mm, vec![0, 0]);
    }

    #[test]
    fn nearest_node_snaps() {
        let net = super::helpers::orly_network();
        let near_x = GeoPoint::new(48.7251, 2.3801);
        assert_eq!(net.nearest_node(near_x).unwrap().as_str(), "X");
        let two = net.k_nearest_nodes(near_x, 2);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].as_str(), "X");
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use vt_core::{NodeId, OperationMode, RouteType};

    use super::helpers::{mode, orly_config, orly_network};
    use crate::{AirportConfig, AirportContext, DataIntegrityError, InvalidRouteError};

    #[test]
    fn mode_queries() {
        let cfg = orly_config();
        let west = OperationMode::from("WEST");
        let modes: Vec<&str> = cfg.modes().map(OperationMode::as_str).collect();
        assert_eq!(modes, ["EAST", "WEST"]);
        assert_eq!(cfg.active_departure_runway(&west).unwrap().as_str(), "24");
        assert_eq!(cfg.active_arrival_runway(&west).unwrap().as_str(), "26");
        assert_eq!(cfg.exits(&west).unwrap().len(), 5);
        assert!(cfg.entrances(&west).unwrap().contains(&NodeId::from("W2")));
        assert_eq!(
            cfg.exits(&OperationMode::from("NORTH")).err(),
            Some(InvalidRouteError::UnknownMode("NORTH".into()))
        );
    }

    #[test]
    fn active_runway_headings() {
        let west = mode("24", "26", &[], &[]);
        assert_eq!(west.active_runway_headings(), vec![240.0, 260.0]);
        let north = mode("36", "01L", &[], &[]);
        assert_eq!(north.active_runway_headings(), vec![0.0, 10.0]);
    }

    #[test]
    fn endpoint_membership() {
        let cfg = orly_config();
        let east = OperationMode::from("EAST");
        let w37 = NodeId::from("W37");
        let w2 = NodeId::from("W2");
        let g = NodeId::from("G30");
        assert!(cfg.check_endpoints(RouteType::Departure, &east, &g, &w37).is_ok());
        assert_eq!(
            cfg.check_endpoints(RouteType::Departure, &east, &g, &w2),
            Err(InvalidRouteError::NotAnEntrance { mode: east.clone(), node: w2.clone() })
        );
        assert!(cfg.check_endpoints(RouteType::Arrival, &east, &w2, &g).is_ok());
        assert!(cfg.check_endpoints(RouteType::Arrival, &east, &w37, &g).is_err());
    }

    #[test]
    fn context_rejects_unknown_config_node() {
        let cfg = AirportConfig::default().with_mode("WEST", mode("24", "24", &["NOPE"], &[]));
        assert_eq!(
            AirportContext::new(orly_network(), cfg).err(),
            Some(DataIntegrityError::UnknownConfigNode {
                mode: "WEST".into(),
                role: "entrance",
                node: "NOPE".into(),
            })
        );
    }

    #[test]
    fn context_rejects_bad_runway_designator() {
        let cfg = AirportConfig::default().with_mode("WEST", mode("XX", "24", &[], &[]));
        assert!(matches!(
            AirportContext::new(orly_network(), cfg),
            Err(DataIntegrityError::InvalidRunway { .. })
        ));
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use vt_core::{OperationMode, RouteType};

    use super::helpers::{orly, square};
    use crate::{InvalidRouteError, Pathfinder, RouteRequest, SegmentKind};

    fn west() -> OperationMode {
        "WEST".into()
    }

    fn east() -> OperationMode {
        "EAST".into()
    }

    fn ids(path: &crate::Path) -> Vec<&str> {
        path.nodes().iter().map(|n| n.as_str()).collect()
    }

    #[test]
    fn west_arrival_from_exit() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let path = pf.find_path(RouteType::Arrival, &["W37", "G10"], &west()).unwrap();
        assert_eq!(ids(&path), ["W37", "W36", "G10"]);
        assert_eq!(path.total_length_m(), 160.0);
        assert_eq!(path.legs().len(), 2);
        assert_eq!(path.legs()[1].kind, SegmentKind::Parking);
        assert_eq!(path.node_distances(), vec![0.0, 100.0, 160.0]);
        assert_eq!(path.route_type(), RouteType::Arrival);
        assert_eq!(path.mode().as_str(), "WEST");
    }

    #[test]
    fn west_arrival_from_non_exit_fails() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let err = pf.find_path(RouteType::Arrival, &["W2", "G10"], &west()).unwrap_err();
        assert_eq!(err, InvalidRouteError::NotAnExit { mode: west(), node: "W2".into() });
    }

    #[test]
    fn east_departure_to_entrance() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let path = pf.find_path(RouteType::Departure, &["G30", "W37"], &east()).unwrap();
        assert_eq!(ids(&path), ["G30", "W2", "W4", "W34", "W35", "W36", "W37"]);
        assert_eq!(path.total_length_m(), 560.0);
    }

    #[test]
    fn east_departure_to_non_entrance_fails() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let err = pf.find_path(RouteType::Departure, &["G10", "W2"], &east()).unwrap_err();
        assert_eq!(err, InvalidRouteError::NotAnEntrance { mode: east(), node: "W2".into() });
    }

    #[test]
    fn request_errors() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let arr = RouteType::Arrival;

        assert!(matches!(
            pf.find_path(arr, &["W37"], &west()),
            Err(InvalidRouteError::TooFewWaypoints { got: 1, .. })
        ));
        assert_eq!(
            pf.find_path(arr, &["W37", "G10"], &"NORTH".into()).unwrap_err(),
            InvalidRouteError::UnknownMode("NORTH".into())
        );
        assert!(matches!(
            pf.find_path(arr, &["W37", "NOPE"], &west()),
            Err(InvalidRouteError::UnknownWaypoint { waypoint, .. }) if waypoint == "NOPE"
        ));
        assert!(matches!(
            pf.find_path(arr, &["B", "G10"], &west()),
            Err(InvalidRouteError::AmbiguousStart { waypoint, .. }) if waypoint == "B"
        ));
        assert!(matches!(
            pf.find_path(arr, &["W37", "ISO"], &west()),
            Err(InvalidRouteError::Unreachable { from, to, .. }) if from == "W37" && to == "ISO"
        ));
    }

    #[test]
    fn segment_waypoint_follows_mode_direction() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);

        let path = pf.find_path(RouteType::Departure, &["G10", "RWY2", "W2"], &west()).unwrap();
        assert_eq!(ids(&path), ["G10", "W36", "W35", "X", "R4", "W4", "W2"]);
        let rwy = &path.legs()[3];
        assert_eq!(rwy.segment.as_str(), "RWY2");
        assert_eq!(rwy.kind, SegmentKind::Runway);
        assert_eq!(rwy.from.as_str(), "X");
        assert!((rwy.heading_deg - 240.0).abs() < 1e-9);
        assert!(path.runway_crossings().is_empty());

        let path = pf.find_path(RouteType::Departure, &["G30", "RWY2", "W37"], &east()).unwrap();
        assert_eq!(ids(&path), ["G30", "W2", "W4", "R4", "X", "W35", "W36", "W37"]);
        let rwy = &path.legs()[3];
        assert_eq!(rwy.from.as_str(), "R4");
        assert!((rwy.heading_deg - 60.0).abs() < 1e-9);
    }

    #[test]
    fn runway_edges_masked_per_mode() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let net = ctx.network();
        let rwy1 = net.segment_idx("RWY1").unwrap();
        let edge_from = |node: &str| {
            net.out_edges(net.node_idx(node).unwrap())
                .find(|&e| net.edge_segment(e).0 == rwy1)
                .unwrap()
        };
        let forward = edge_from("R37");
        let backward = edge_from("X");

        assert!(pf.edge_allowed(&west(), forward));
        assert!(!pf.edge_allowed(&west(), backward));
        assert!(!pf.edge_allowed(&east(), forward));
        assert!(pf.edge_allowed(&east(), backward));
        assert!(!pf.edge_allowed(&"NORTH".into(), forward));

        // Taxiways are open in both modes.
        let a1 = net.out_edges(net.node_idx("W37").unwrap()).next().unwrap();
        assert!(pf.edge_allowed(&west(), a1) && pf.edge_allowed(&east(), a1));
    }

    #[test]
    fn segment_as_start_anchors_at_its_end() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let path = pf.find_path(RouteType::Arrival, &["C37", "G10"], &west()).unwrap();
        assert_eq!(ids(&path), ["W37", "W36", "G10"]);
    }

    #[test]
    fn taxiway_name_waypoint_reaches_nearest_endpoint() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let path = pf.find_path(RouteType::Arrival, &["W37", "B", "G10"], &west()).unwrap();
        assert_eq!(ids(&path), ["W37", "W36", "W35", "W36", "G10"]);
        assert_eq!(path.total_length_m(), 360.0);
    }

    #[test]
    fn via_points_visited_in_order() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let path = pf.find_path(RouteType::Arrival, &["W36", "W4", "G10"], &west()).unwrap();
        let nodes = ids(&path);
        let pos_w4 = nodes.iter().position(|n| *n == "W4").unwrap();
        assert!(pos_w4 > 0 && pos_w4 < nodes.len() - 1);
        assert_eq!(path.total_length_m(), 300.0 + 300.0 + 60.0);
        for pair in path.legs().windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn runway_crossing_recorded() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let path = pf.find_path(RouteType::Arrival, &["W35", "G40"], &west()).unwrap();
        assert_eq!(ids(&path), ["W35", "X", "S1", "G40"]);
        assert_eq!(path.runway_crossings(), &[1]);
    }

    #[test]
    fn crossing_found_despite_incomplete_incidence_list() {
        use std::collections::BTreeSet;

        use vt_core::{GeoPoint, NodeId};

        use crate::{AirportConfig, AirportContext, ModeConfig, NetworkModel, Node, Segment};

        let mut x = Node::intersection("X", GeoPoint::new(48.72, 2.31));
        x.segments = vec!["AX".into(), "XB".into()];
        let nodes = vec![
            Node::intersection("A", GeoPoint::new(48.72, 2.30)),
            x,
            Node::intersection("B", GeoPoint::new(48.72, 2.32)),
            Node::intersection("R1", GeoPoint::new(48.71, 2.31)),
            Node::intersection("R2", GeoPoint::new(48.73, 2.31)),
        ];
        let segments = vec![
            Segment::new("AX", "T", SegmentKind::Taxiway, "A", "X", 300.0, 90.0),
            Segment::new("XB", "T", SegmentKind::Taxiway, "X", "B", 300.0, 90.0),
            Segment::new("R1X", "02/20", SegmentKind::Runway, "R1", "X", 1_000.0, 20.0),
            Segment::new("XR2", "02/20", SegmentKind::Runway, "X", "R2", 1_000.0, 20.0),
        ];
        let mode = ModeConfig {
            departure_runway: "02".into(),
            arrival_runway:   "02".into(),
            entrances:        BTreeSet::from([NodeId::from("B")]),
            exits:            BTreeSet::from([NodeId::from("A")]),
        };
        let ctx = AirportContext::new(
            NetworkModel::build(nodes, segments).unwrap(),
            AirportConfig::default().with_mode("NORTH", mode),
        )
        .unwrap();

        let path = Pathfinder::new(&ctx)
            .find_path(RouteType::Arrival, &["A", "B"], &"NORTH".into())
            .unwrap();
        assert_eq!(ids(&path), ["A", "X", "B"]);
        assert_eq!(path.runway_crossings(), &[1]);
    }

    #[test]
    fn trivial_route_to_same_node() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let path = pf.find_path(RouteType::Arrival, &["W37", "W37"], &west()).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.total_length_m(), 0.0);
        assert_eq!(path.first_node(), path.last_node());
    }

    #[test]
    fn equal_cost_tie_prefers_smaller_id() {
        for order in [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1]] {
            let ctx = square(&order);
            let pf = Pathfinder::new(&ctx);
            let m = "M".into();
            let ad = pf.find_path(RouteType::Arrival, &["A", "D"], &m).unwrap();
            assert_eq!(ids(&ad), ["A", "B", "D"], "segment order {order:?}");
            let da = pf.find_path(RouteType::Arrival, &["D", "A"], &m).unwrap();
            assert_eq!(ids(&da), ["D", "B", "A"], "segment order {order:?}");
        }
    }

    #[test]
    fn repeated_queries_identical() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let a = pf.find_path(RouteType::Departure, &["G40", "W2"], &west()).unwrap();
        let b = pf.find_path(RouteType::Departure, &["G40", "W2"], &west()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn batch_matches_single_calls() {
        let ctx = orly();
        let pf = Pathfinder::new(&ctx);
        let requests = vec![
            RouteRequest {
                route_type: RouteType::Arrival,
                waypoints:  vec!["W37".into(), "G10".into()],
                mode:       west(),
            },
            RouteRequest {
                route_type: RouteType::Departure,
                waypoints:  vec!["G10".into(), "W2".into()],
                mode:       east(),
            },
        ];
        let batch = pf.find_paths(&requests);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], pf.find_route(&requests[0]));
        assert!(batch[1].is_err());
    }
}

// ── Property tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use vt_core::{GeoPoint, RouteType};

    use super::helpers::mode;
    use crate::{
        AirportConfig, AirportContext, InvalidRouteError, NetworkBuilder, Node, Pathfinder, Segment,
        SegmentKind,
    };

    const INF: u64 = u64::MAX / 4;

    fn node_id(i: usize) -> String {
        format!("N{i:02}")
    }

    fn build(n: usize, edges: &[(usize, usize, u32)]) -> AirportContext {
        let mut b = NetworkBuilder::new();
        let all: Vec<String> = (0..n).map(node_id).collect();
        for id in &all {
            b.node(Node::intersection(id.as_str(), GeoPoint::new(0.0, 0.0)));
        }
        for (k, &(u, v, len)) in edges.iter().enumerate() {
            b.segment(Segment::new(
                format!("S{k:03}"),
                "T",
                SegmentKind::Taxiway,
                node_id(u),
                node_id(v),
                f64::from(len),
                0.0,
            ));
        }
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        let cfg = AirportConfig::default().with_mode("M", mode("09", "09", &refs, &refs));
        AirportContext::new(b.build().unwrap(), cfg).unwrap()
    }

    /// All-pairs shortest distances in whole metres.
    fn floyd(n: usize, edges: &[(usize, usize, u32)]) -> Vec<Vec<u64>> {
        let mut d = vec![vec![INF; n]; n];
        for (i, row) in d.iter_mut().enumerate() {
            row[i] = 0;
        }
        for &(u, v, len) in edges {
            let len = u64::from(len);
            d[u][v] = d[u][v].min(len);
            d[v][u] = d[v][u].min(len);
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let via = d[i][k] + d[k][j];
                    if via < d[i][j] {
                        d[i][j] = via;
                    }
                }
            }
        }
        d
    }

    fn graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>, usize, usize, usize)> {
        (3usize..9).prop_flat_map(|n| {
            let edge = (0..n, 0..n, 1u32..500).prop_filter("no self loops", |(u, v, _)| u != v);
            (Just(n), prop::collection::vec(edge, 0..20), 0..n, 0..n, 0..n)
        })
    }

    proptest! {
        #[test]
        fn shortest_path_matches_reference((n, edges, a, b, _) in graph()) {
            let ctx = build(n, &edges);
            let pf = Pathfinder::new(&ctx);
            let d = floyd(n, &edges);
            let result = pf.find_path(RouteType::Arrival, &[node_id(a), node_id(b)], &"M".into());
            if d[a][b] >= INF {
                let is_unreachable = matches!(result, Err(InvalidRouteError::Unreachable { .. }));
                prop_assert!(is_unreachable);
            } else {
                let path = result.unwrap();
                prop_assert_eq!(path.total_length_m(), d[a][b] as f64);
                prop_assert_eq!(path.first_node().as_str(), node_id(a));
                prop_assert_eq!(path.last_node().as_str(), node_id(b));
            }
        }

        #[test]
        fn via_point_cost_is_sum_of_legs((n, edges, a, b, c) in graph()) {
            let ctx = build(n, &edges);
            let pf = Pathfinder::new(&ctx);
            let d = floyd(n, &edges);
            let wps = [node_id(a), node_id(b), node_id(c)];
            let result = pf.find_path(RouteType::Arrival, &wps, &"M".into());
            if d[a][b] >= INF || d[b][c] >= INF {
                prop_assert!(result.is_err());
            } else {
                let path = result.unwrap();
                prop_assert_eq!(path.total_length_m(), (d[a][b] + d[b][c]) as f64);
                for pair in path.legs().windows(2) {
                    prop_assert_eq!(&pair[0].to, &pair[1].from);
                }
            }
        }
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use vt_core::{NodeId, OperationMode};

    use crate::{
        AirportContext, DataIntegrityError, LoadError, NodeKind, SegmentKind, load_config_reader,
        load_network_reader,
    };

    const NODES: &str = "\
node_id,node_type,lat,lon,segments,gate_id,heading
W37,runway_exit,48.7300,2.4000,A1,,
W36,intersection,48.7300,2.3900,A1;P10,,
G10,gate,48.7350,2.3900,P10,K10,180.0
";

    const SEGMENTS: &str = "\
segment_id,name,segment_type,start_node,end_node,length,heading,one_way
A1,A,taxiway,W37,W36,100.0,270.0,false
P10,P10,parking_position,G10,W36,60.0,180.0,true
";

    const CONFIG: &str = r#"{
        "WEST": {
            "departure_runway": "24",
            "arrival_runway": "26",
            "entrances": ["W36"],
            "exits": ["W37"]
        }
    }"#;

    #[test]
    fn network_from_csv() {
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(SEGMENTS)).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.segment_count(), 2);
        assert_eq!(net.edge_count(), 3); // P10 is one-way

        let g10 = net.node("G10").unwrap();
        assert_eq!(g10.kind, NodeKind::Gate);
        assert_eq!(g10.gate_id.as_deref(), Some("K10"));
        assert_eq!(g10.heading_deg, Some(180.0));
        assert_eq!(net.node("W37").unwrap().kind, NodeKind::RunwayExit);
        assert_eq!(net.node("W37").unwrap().gate_id, None);

        let p10 = net.segment("P10").unwrap();
        assert_eq!(p10.kind, SegmentKind::Parking);
        assert!(p10.one_way);
        assert_eq!(net.node("W36").unwrap().segments.len(), 2);
    }

    #[test]
    fn config_from_json() {
        let cfg = load_config_reader(Cursor::new(CONFIG)).unwrap();
        let west = OperationMode::from("WEST");
        assert_eq!(cfg.active_arrival_runway(&west).unwrap().as_str(), "26");
        assert!(cfg.exits(&west).unwrap().contains(&NodeId::from("W37")));

        let net = load_network_reader(Cursor::new(NODES), Cursor::new(SEGMENTS)).unwrap();
        assert!(AirportContext::new(net, cfg).is_ok());
    }

    #[test]
    fn gate_without_stand_id_rejected() {
        let nodes = "node_id,node_type,lat,lon,segments,gate_id,heading\nG1,gate,48.7,2.3,,,\n";
        let err = load_network_reader(Cursor::new(nodes), Cursor::new(SEGMENTS)).unwrap_err();
        assert!(matches!(err, LoadError::Record(_)));
    }

    #[test]
    fn integrity_errors_surface() {
        let segments = "\
segment_id,name,segment_type,start_node,end_node,length,heading,one_way
A1,A,taxiway,W37,NOWHERE,100.0,270.0,false
";
        let nodes = "node_id,node_type,lat,lon,segments,gate_id,heading\nW37,intersection,48.7,2.3,A1,,\n";
        let err = load_network_reader(Cursor::new(nodes), Cursor::new(segments)).unwrap_err();
        assert!(matches!(err, LoadError::Integrity(DataIntegrityError::MissingNode { .. })));
    }

    #[test]
    fn malformed_inputs_rejected() {
        let nodes = "node_id,node_type,lat,lon,segments,gate_id,heading\nA,hangar,48.7,2.3,,,\n";
        let err = load_network_reader(Cursor::new(nodes), Cursor::new("")).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));

        let err = load_config_reader(Cursor::new("{ not json")).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}

// ── Position assignment ───────────────────────────────────────────────────────

#[cfg(test)]
mod assign {
    use vt_core::{OperationMode, RouteType, SimRng};

    use super::helpers::orly;
    use crate::{AssignmentError, AssignmentRequest, Pathfinder, PositionAssigner, terminal_of};

    #[test]
    fn terminal_is_non_digit_part() {
        assert_eq!(terminal_of("K24"), "K");
        assert_eq!(terminal_of("2E12"), "E");
        assert_eq!(terminal_of("12"), "");
    }

    #[test]
    fn terminals_listed_in_order() {
        let ctx = orly();
        let pa = PositionAssigner::new(&ctx);
        assert_eq!(pa.terminals().collect::<Vec<_>>(), ["K", "M"]);
        assert_eq!(pa.gate_by_id("M40").unwrap().id.as_str(), "G40");
        assert!(pa.gate_by_id("M99").is_none());
    }

    #[test]
    fn same_seed_same_assignment() {
        let ctx = orly();
        let pa = PositionAssigner::new(&ctx);
        let req = AssignmentRequest::new(RouteType::Departure);
        for seed in 0..20 {
            let a = pa.assign(&req, &mut SimRng::new(seed)).unwrap();
            let b = pa.assign(&req, &mut SimRng::new(seed)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn specific_choices_respected() {
        let ctx = orly();
        let pa = PositionAssigner::new(&ctx);
        let mut rng = SimRng::new(7);
        let req = AssignmentRequest::new(RouteType::Arrival)
            .mode("WEST")
            .gate("K10")
            .runway_point("W35");
        let a = pa.assign(&req, &mut rng).unwrap();
        assert_eq!(a.mode.as_str(), "WEST");
        assert_eq!(a.gate_node.as_str(), "G10");
        assert_eq!(a.gate_id, "K10");
        assert_eq!(a.runway_point.as_str(), "W35");
        assert_eq!(a.waypoints(), ["W35", "G10"]);
    }

    #[test]
    fn gate_errors() {
        let ctx = orly();
        let pa = PositionAssigner::new(&ctx);
        let mut rng = SimRng::new(1);
        let base = || AssignmentRequest::new(RouteType::Departure).mode("WEST");

        assert_eq!(
            pa.assign(&base().gate("Z1"), &mut rng).unwrap_err(),
            AssignmentError::UnknownGate("Z1".into())
        );
        assert_eq!(
            pa.assign(&base().gate("K10").exclude_gate("K10"), &mut rng).unwrap_err(),
            AssignmentError::GateExcluded("K10".into())
        );
        assert_eq!(
            pa.assign(&base().gate("K10").exclude_terminal("K"), &mut rng).unwrap_err(),
            AssignmentError::GateExcluded("K10".into())
        );
        assert_eq!(
            pa.assign(&base().exclude_terminal("K").exclude_terminal("M"), &mut rng).unwrap_err(),
            AssignmentError::NoGateAvailable
        );
    }

    #[test]
    fn terminal_preference_and_exclusions() {
        let ctx = orly();
        let pa = PositionAssigner::new(&ctx);
        for seed in 0..20 {
            let mut rng = SimRng::new(seed);
            let req = AssignmentRequest::new(RouteType::Departure).prefer_terminal("M").exclude_gate("M30");
            let gate = pa.find_gate(&req, &mut rng).unwrap();
            assert_eq!(gate.gate_id.as_deref(), Some("M40"));

            // Preferred terminal fully excluded: fall back to the others.
            let req = AssignmentRequest::new(RouteType::Departure)
                .prefer_terminal("M")
                .exclude_terminal("M");
            let gate = pa.find_gate(&req, &mut rng).unwrap();
            assert!(gate.gate_id.as_deref().unwrap().starts_with('K'));
        }
    }

    #[test]
    fn runway_point_errors() {
        let ctx = orly();
        let pa = PositionAssigner::new(&ctx);
        let mut rng = SimRng::new(3);
        let west = OperationMode::from("WEST");
        assert!(matches!(
            pa.find_runway_point(&west, RouteType::Arrival, Some(&"W2".into()), &mut rng),
            Err(AssignmentError::InvalidRunwayPoint { role: "exit", .. })
        ));
        assert!(matches!(
            pa.choose_mode(Some(&"NORTH".into()), &mut rng),
            Err(AssignmentError::UnknownMode(_))
        ));
        let exits = ctx.config().exits(&west).unwrap();
        for _ in 0..20 {
            let p = pa.find_runway_point(&west, RouteType::Arrival, None, &mut rng).unwrap();
            assert!(exits.contains(&p));
        }
    }

    #[test]
    fn random_assignments_are_routable() {
        let ctx = orly();
        let pa = PositionAssigner::new(&ctx);
        let pf = Pathfinder::new(&ctx);
        for seed in 0..30 {
            let mut rng = SimRng::new(seed);
            for route_type in [RouteType::Arrival, RouteType::Departure] {
                let a = pa.assign(&AssignmentRequest::new(route_type), &mut rng).unwrap();
                let path = pf.find_route(&a.route_request(&[])).unwrap();
                assert_eq!(path.route_type(), route_type);
            }
        }
    }
}
