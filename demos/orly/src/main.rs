//! orly: end-to-end ground movement run on a small Orly-like apron.
//!
//! Assigns stands and runway points to a handful of flights, routes them
//! through the movement area, and samples each taxi with the kinematic
//! simulator.  Pass `--json` to also write every flight's samples to
//! `output/orly/<callsign>.json`.
//!
//! Logging follows `RUST_LOG` (default `info`).

mod network;

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use vt_core::{RouteType, SimRng};
use vt_motion::{InitialState, MotionConfig, MovementPoint, TaxiMotionSimulator};
use vt_network::{
    AirportContext, AssignmentRequest, Pathfinder, PositionAssigner, RouteRequest, load_config_reader,
};
use vt_physics::{AircraftPhysicsProfile, WeightCategory};

use network::{CONFIG_JSON, build_network};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64  = 42;
const MODE:           &str = "WEST";
const TIME_STEP_SECS: f64  = 1.0;
const OUTPUT_DIR:     &str = "output/orly";

// ── Flights ───────────────────────────────────────────────────────────────────

struct Flight {
    callsign:   &'static str,
    aircraft:   &'static str,
    route_type: RouteType,
    gate:       Option<&'static str>,
    terminal:   Option<&'static str>,
}

const FLIGHTS: [Flight; 5] = [
    Flight { callsign: "AFR6104", aircraft: "A320", route_type: RouteType::Departure, gate: None,        terminal: Some("K") },
    Flight { callsign: "EZY4011", aircraft: "A319", route_type: RouteType::Arrival,   gate: None,        terminal: Some("L") },
    Flight { callsign: "FDX5062", aircraft: "B77W", route_type: RouteType::Departure, gate: Some("M40"), terminal: None },
    Flight { callsign: "TVF3120", aircraft: "B738", route_type: RouteType::Arrival,   gate: None,        terminal: None },
    Flight { callsign: "FHBXA",   aircraft: "SR22", route_type: RouteType::Departure, gate: None,        terminal: None },
];

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let write_json = std::env::args().any(|a| a == "--json");

    println!("=== orly: vtaxi ground movement ===");
    println!("Flights: {}  |  Mode: {MODE}  |  Seed: {SEED}", FLIGHTS.len());
    println!();

    // 1. Movement area and mode table.
    let network = build_network()?;
    let config = load_config_reader(Cursor::new(CONFIG_JSON))?;
    let ctx = AirportContext::new(network, config)?;
    println!(
        "Movement area: {} nodes, {} segments, {} directed edges",
        ctx.network().node_count(),
        ctx.network().segment_count(),
        ctx.network().edge_count()
    );

    // 2. Stands and runway points.
    let assigner = PositionAssigner::new(&ctx);
    let mut rng = SimRng::new(SEED);
    let mut assignments = Vec::with_capacity(FLIGHTS.len());
    for (i, flight) in FLIGHTS.iter().enumerate() {
        let mut req = AssignmentRequest::new(flight.route_type).mode(MODE);
        if let Some(gate) = flight.gate {
            req = req.gate(gate);
        }
        if let Some(terminal) = flight.terminal {
            req = req.prefer_terminal(terminal);
        }
        let assignment = assigner
            .assign(&req, &mut rng.child(i as u64))
            .with_context(|| format!("assigning {}", flight.callsign))?;
        assignments.push(assignment);
    }

    // 3. Routes, as one batch.
    let pathfinder = Pathfinder::new(&ctx);
    let requests: Vec<RouteRequest> = assignments.iter().map(|a| a.route_request(&[])).collect();
    let t0 = Instant::now();
    let paths = pathfinder.find_paths(&requests);
    tracing::info!(routes = paths.len(), elapsed_us = t0.elapsed().as_micros() as u64, "routing done");

    if write_json {
        std::fs::create_dir_all(OUTPUT_DIR)?;
    }

    // 4. Taxi motion.
    println!();
    println!(
        "{:<8} {:<5} {:<9} {:<5} {:<6} {:>8} {:>5} {:>8} {:>7}",
        "Flight", "Type", "Route", "Gate", "Runway", "Length", "Xing", "Time", "Max kt"
    );
    println!("{}", "-".repeat(70));

    for ((flight, assignment), path) in FLIGHTS.iter().zip(&assignments).zip(paths) {
        let path = path.with_context(|| format!("routing {}", flight.callsign))?;
        let category = WeightCategory::for_aircraft_type(flight.aircraft).unwrap_or(WeightCategory::Medium);
        let aircraft = AircraftPhysicsProfile::for_category(category);
        let config = MotionConfig::default().with_time_step(TIME_STEP_SECS);
        let sim = TaxiMotionSimulator::new(&path, aircraft, InitialState::at_rest(), config)
            .with_context(|| format!("simulating {}", flight.callsign))?;

        let points = sim.simulate();
        let taxi_secs = points.last().map_or(0.0, |p| p.elapsed_secs);
        let max_kt = points.iter().map(MovementPoint::speed_knots).fold(0.0, f64::max);

        println!(
            "{:<8} {:<5} {:<9} {:<5} {:<6} {:>7.0}m {:>5} {:>7.0}s {:>7.1}",
            flight.callsign,
            flight.aircraft,
            flight.route_type,
            assignment.gate_id,
            assignment.runway_point,
            path.total_length_m(),
            path.runway_crossings().len(),
            taxi_secs,
            max_kt,
        );
        let nodes: Vec<String> = path.nodes().iter().map(ToString::to_string).collect();
        tracing::debug!(callsign = flight.callsign, route = %nodes.join("-"), samples = points.len(), "taxi");

        if write_json {
            let file = Path::new(OUTPUT_DIR).join(format!("{}.json", flight.callsign));
            let writer = BufWriter::new(File::create(&file)?);
            serde_json::to_writer_pretty(writer, &points)?;
            tracing::info!(path = %file.display(), "samples written");
        }
    }

    Ok(())
}
