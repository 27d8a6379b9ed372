//! Time-stepped taxi motion along a [`Path`].
//!
//! # Integration
//!
//! Between samples the aircraft follows piecewise-constant acceleration:
//! full acceleration while below the braking envelope, zero on a cap, full
//! deceleration along the envelope.  Each piece ends exactly at its event
//! (cap reached, envelope met, interval boundary, or the end of the step),
//! so the trajectory does not depend on the sample spacing.  Braking starts
//! at the latest distance from which the next lower ceiling is still met.

use vt_core::{SimClock, Tick, heading_delta};
use vt_network::Path;
use vt_physics::{AircraftPhysicsProfile, PhysicsConstraintError};

use crate::profile::{SpeedProfile, SpeedZone, ZoneKind};
use crate::state::{InitialState, MotionConfig, MotionPhase, MovementPoint};
use crate::{MotionError, MotionResult};

/// Upper bound on constant-acceleration pieces inside one step.
const MAX_PIECES_PER_STEP: usize = 1_000;

/// Distance from the end below which the aircraft counts as arrived.
const ARRIVAL_EPS_M: f64 = 1e-9;

/// Slack when comparing an initial speed against the envelope.
const SPEED_EPS_MS: f64 = 1e-9;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Piece {
    Accelerate,
    Cruise,
    Brake,
    Stop,
}

#[inline]
fn slack(x: f64) -> f64 {
    1e-9 * x.abs().max(1.0)
}

// ── TaxiMotionSimulator ───────────────────────────────────────────────────────

/// Kinematic model of one aircraft over one path.
///
/// Construction does all the look-ahead (turn and crossing zones, braking
/// envelope); [`run`](Self::run) hands out independent cursors over the
/// resulting samples.  The simulator never mutates its inputs, so every run
/// yields the same sequence.
pub struct TaxiMotionSimulator<'p> {
    path:           &'p Path,
    aircraft:       AircraftPhysicsProfile,
    config:         MotionConfig,
    initial:        InitialState,
    speeds:         SpeedProfile,
    node_distances: Vec<f64>,
}

impl<'p> TaxiMotionSimulator<'p> {
    /// # Errors
    ///
    /// - [`MotionError::InvalidTimeStep`] / [`MotionError::InvalidConfig`]
    ///   for an out-of-range `config`.
    /// - [`MotionError::InvalidInitialSpeed`] for a negative or non-finite
    ///   initial speed.
    /// - [`MotionError::Physics`] for an invalid profile, a non-finite
    ///   initial heading, or an initial speed that cannot be braked in time.
    pub fn new(
        path:     &'p Path,
        aircraft: AircraftPhysicsProfile,
        initial:  InitialState,
        config:   MotionConfig,
    ) -> MotionResult<Self> {
        config.validate()?;
        aircraft.validate()?;
        let v0 = initial.speed_ms;
        if !v0.is_finite() || v0 < 0.0 {
            return Err(MotionError::InvalidInitialSpeed(v0));
        }

        let node_distances = path.node_distances();
        let zones = build_zones(path, &node_distances, &aircraft, &initial, &config)?;
        let speeds = SpeedProfile::new(
            path.total_length_m(),
            aircraft.max_speed_ms,
            aircraft.max_decel_ms2,
            zones,
        );

        let limit = speeds.envelope_at(0.0);
        if v0 > limit + SPEED_EPS_MS {
            return Err(PhysicsConstraintError::InfeasibleSpeed {
                speed_ms: v0,
                limit_ms: limit,
                at_m:     0.0,
            }
            .into());
        }

        tracing::debug!(
            category  = %aircraft.category,
            length_m  = path.total_length_m(),
            legs      = path.legs().len(),
            zones     = speeds.zones().len(),
            intervals = speeds.interval_count(),
            "motion simulator ready"
        );

        Ok(Self { path, aircraft, config, initial, speeds, node_distances })
    }

    /// Defaults for everything but the path and aircraft.
    pub fn at_rest(path: &'p Path, aircraft: AircraftPhysicsProfile) -> MotionResult<Self> {
        Self::new(path, aircraft, InitialState::at_rest(), MotionConfig::default())
    }

    pub fn path(&self) -> &'p Path {
        self.path
    }

    pub fn aircraft(&self) -> &AircraftPhysicsProfile {
        &self.aircraft
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn speed_profile(&self) -> &SpeedProfile {
        &self.speeds
    }

    /// A fresh cursor positioned before the first sample.
    pub fn run(&self) -> MotionRun<'_> {
        MotionRun {
            sim:        self,
            clock:      SimClock::new(self.config.time_step_secs),
            distance_m: 0.0,
            speed_ms:   self.initial.speed_ms,
            started:    false,
            finished:   false,
        }
    }

    /// Every sample of a complete run.
    pub fn simulate(&self) -> Vec<MovementPoint> {
        self.run().collect()
    }

    // ── Kinematics ────────────────────────────────────────────────────────

    fn classify(&self, s: f64, v: f64) -> Piece {
        let length = self.speeds.length_m();
        if s >= length {
            return Piece::Stop;
        }
        let i = self.speeds.interval_at(s);
        let cap2 = self.speeds.cap(i).powi(2);
        let line = self.speeds.brake_key(i) - 2.0 * self.aircraft.max_decel_ms2 * s;
        let env2 = cap2.min(line);
        if v * v < env2 - slack(env2) {
            Piece::Accelerate
        } else if cap2 < line - slack(line) {
            Piece::Cruise
        } else {
            Piece::Brake
        }
    }

    /// Advance `(s, v)` by `dt` seconds.
    fn step(&self, mut s: f64, mut v: f64, dt: f64) -> (f64, f64) {
        let a = self.aircraft.max_accel_ms2;
        let d = self.aircraft.max_decel_ms2;
        let length = self.speeds.length_m();
        let mut tau = dt;

        for _ in 0..MAX_PIECES_PER_STEP {
            if length - s <= ARRIVAL_EPS_M {
                return (length, 0.0);
            }
            if tau <= 0.0 {
                break;
            }
            let i = self.speeds.interval_at(s);
            let end = self.speeds.interval_end(i);
            let cap = self.speeds.cap(i);
            let key = self.speeds.brake_key(i);

            match self.classify(s, v) {
                Piece::Accelerate => {
                    let v2 = v * v;
                    let line = key - 2.0 * d * s;
                    let to_cap = (cap * cap - v2) / (2.0 * a);
                    let to_line = (line - v2) / (2.0 * (a + d));
                    let to_end = end - s;
                    let reach = to_cap.min(to_line).min(to_end).max(0.0);
                    let v_evt = (v2 + 2.0 * a * reach).sqrt();
                    let t = (v_evt - v) / a;
                    if t >= tau {
                        s += v * tau + 0.5 * a * tau * tau;
                        v += a * tau;
                        tau = 0.0;
                    } else {
                        s = if reach == to_end { end } else { s + reach };
                        v = v_evt;
                        tau -= t;
                    }
                }
                Piece::Cruise => {
                    v = cap;
                    let stop = ((key - cap * cap) / (2.0 * d)).min(end);
                    let t = (stop - s) / cap;
                    if t >= tau {
                        s += cap * tau;
                        tau = 0.0;
                    } else {
                        s = stop;
                        tau -= t;
                    }
                }
                Piece::Brake => {
                    v = (key - 2.0 * d * s).max(0.0).sqrt().min(cap);
                    let v_end = (key - 2.0 * d * end).max(0.0).sqrt();
                    let t = (v - v_end) / d;
                    if t >= tau {
                        s += v * tau - 0.5 * d * tau * tau;
                        v -= d * tau;
                        tau = 0.0;
                    } else {
                        s = end;
                        v = v_end;
                        tau -= t;
                    }
                }
                Piece::Stop => return (length, 0.0),
            }
            v = v.min(self.speeds.envelope_at(s)).max(0.0);
        }

        if tau > 0.0 && length - s > ARRIVAL_EPS_M {
            tracing::warn!(distance_m = s, speed_ms = v, "step piece limit reached");
        }
        if length - s <= ARRIVAL_EPS_M {
            return (length, 0.0);
        }
        (s, v)
    }

    fn sample(&self, tick: Tick, elapsed_secs: f64, s: f64, v: f64, first: bool) -> MovementPoint {
        let piece = self.classify(s, v);
        let stopped = piece == Piece::Stop && v == 0.0;

        let phase = if stopped {
            MotionPhase::Stopped
        } else if first {
            MotionPhase::Idle
        } else if self.speeds.zone_at(s, ZoneKind::Turn).is_some() {
            MotionPhase::Turning
        } else {
            match piece {
                Piece::Accelerate => MotionPhase::Accelerating,
                Piece::Cruise     => MotionPhase::Cruising,
                Piece::Brake      => MotionPhase::Decelerating,
                Piece::Stop       => MotionPhase::Stopped,
            }
        };
        let acceleration_ms2 = match piece {
            Piece::Accelerate => self.aircraft.max_accel_ms2,
            Piece::Brake      => -self.aircraft.max_decel_ms2,
            Piece::Cruise | Piece::Stop => 0.0,
        };

        let legs = self.path.legs();
        let leg_index = self
            .node_distances
            .partition_point(|&x| x <= s)
            .saturating_sub(1)
            .min(legs.len().saturating_sub(1));
        let heading_deg = legs
            .get(leg_index)
            .map(|l| l.heading_deg)
            .or(self.initial.heading_deg)
            .unwrap_or(0.0);

        MovementPoint {
            tick,
            elapsed_secs,
            distance_m: s,
            speed_ms: v,
            acceleration_ms2,
            heading_deg,
            leg_index,
            phase,
        }
    }
}

/// Turn zones at every node (and at the start, for a misaligned initial
/// heading) plus runway-crossing zones.
fn build_zones(
    path:           &Path,
    node_distances: &[f64],
    aircraft:       &AircraftPhysicsProfile,
    initial:        &InitialState,
    config:         &MotionConfig,
) -> MotionResult<Vec<SpeedZone>> {
    let radius = aircraft.min_turn_radius_m();
    let legs = path.legs();
    let mut zones = Vec::new();

    let mut turn = |at: f64, from: f64, to: f64| -> MotionResult<()> {
        let limit = aircraft.max_speed_for_turn(from, to)?;
        if heading_delta(from, to) >= config.turn_threshold_deg || limit < aircraft.max_speed_ms {
            zones.push(SpeedZone {
                kind:     ZoneKind::Turn,
                start_m:  at - radius,
                end_m:    at + radius,
                limit_ms: limit,
            });
        }
        Ok(())
    };

    if let (Some(h), Some(first)) = (initial.heading_deg, legs.first()) {
        turn(0.0, h, first.heading_deg)?;
    }
    for (k, pair) in legs.windows(2).enumerate() {
        turn(node_distances[k + 1], pair[0].heading_deg, pair[1].heading_deg)?;
    }

    let crossing_limit = config.crossing_speed_ratio * aircraft.max_speed_ms;
    for &i in path.runway_crossings() {
        let at = node_distances[i];
        zones.push(SpeedZone {
            kind:     ZoneKind::RunwayCrossing,
            start_m:  at - config.crossing_half_width_m,
            end_m:    at + config.crossing_half_width_m,
            limit_ms: crossing_limit,
        });
    }
    Ok(zones)
}

// ── MotionRun ─────────────────────────────────────────────────────────────────

/// Pull-based cursor over one simulated traversal.
///
/// The first sample is at `t = 0` (phase `IDLE`, or `STOPPED` for an empty
/// path); the last is `STOPPED` at the end of the path with zero speed.
/// Dropping the cursor cancels the run.
pub struct MotionRun<'a> {
    sim:        &'a TaxiMotionSimulator<'a>,
    clock:      SimClock,
    distance_m: f64,
    speed_ms:   f64,
    started:    bool,
    finished:   bool,
}

impl MotionRun<'_> {
    /// `false` once the `STOPPED` sample has been produced.
    pub fn has_more(&self) -> bool {
        !self.finished
    }

    /// Produce the next sample, or `None` after `STOPPED`.
    pub fn advance(&mut self) -> Option<MovementPoint> {
        if self.finished {
            return None;
        }
        let first = !self.started;
        if first {
            self.started = true;
        } else {
            let (s, v) = self.sim.step(self.distance_m, self.speed_ms, self.clock.step_secs);
            self.distance_m = s;
            self.speed_ms = v;
            self.clock.advance();
        }
        let point = self.sim.sample(
            self.clock.current_tick,
            self.clock.elapsed_secs(),
            self.distance_m,
            self.speed_ms,
            first,
        );
        if point.phase == MotionPhase::Stopped {
            self.finished = true;
        }
        Some(point)
    }

    /// Rewind to before the first sample.
    pub fn restart(&mut self) {
        let sim = self.sim;
        *self = sim.run();
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}

impl Iterator for MotionRun<'_> {
    type Item = MovementPoint;

    fn next(&mut self) -> Option<MovementPoint> {
        self.advance()
    }
}

impl std::iter::FusedIterator for MotionRun<'_> {}
