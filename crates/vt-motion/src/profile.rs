//! Distance-indexed speed ceiling and its braking envelope.
//!
//! # Model
//!
//! The ceiling `u(s)` is piecewise constant over `[0, L]`: the profile's
//! maximum speed, lowered inside [`SpeedZone`]s.  Interval `i` spans
//! `[x_i, x_{i+1})` with cap `u_i`.  The path ends with `v = 0` at `L`.
//!
//! The braking envelope is the fastest speed at `s` from which every later
//! cap, and the final stop, can still be met at full deceleration `d`:
//!
//! ```text
//! E(s)² = min( u(s)²,  min_{x_j > s} (u_j² + 2d·x_j) − 2d·s,  2d·(L − s) )
//! ```
//!
//! Every future constraint is a line of the same slope in `v²`-space, so the
//! binding one inside an interval is a single constant [`SpeedProfile::brake_key`]
//! and chained turns need no special handling.

use serde::{Deserialize, Serialize};

/// Why a stretch of path is slowed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Turn,
    RunwayCrossing,
}

/// A speed limit over `[start_m, end_m]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedZone {
    pub kind:     ZoneKind,
    pub start_m:  f64,
    pub end_m:    f64,
    pub limit_ms: f64,
}

impl SpeedZone {
    #[inline]
    pub fn contains(&self, s: f64) -> bool {
        s >= self.start_m && s <= self.end_m
    }
}

/// Piecewise-constant speed ceiling along one path.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedProfile {
    length_m: f64,
    decel:    f64,
    /// Interval start points; `bounds[0] == 0`, strictly increasing, all `< L`.
    bounds:   Vec<f64>,
    caps:     Vec<f64>,
    /// `min_{j > i} (caps[j]² + 2d·bounds[j])`, including the stop at `L`.
    keys:     Vec<f64>,
    zones:    Vec<SpeedZone>,
}

impl SpeedProfile {
    /// Build the ceiling for a path of `length_m`.  Zones are clipped to the
    /// path; a zone's limit never raises the ceiling above `max_speed_ms`.
    pub fn new(length_m: f64, max_speed_ms: f64, decel_ms2: f64, zones: Vec<SpeedZone>) -> Self {
        let zones: Vec<SpeedZone> = zones
            .into_iter()
            .map(|z| SpeedZone {
                start_m: z.start_m.clamp(0.0, length_m),
                end_m:   z.end_m.clamp(0.0, length_m),
                ..z
            })
            .collect();

        let mut cuts: Vec<f64> = vec![0.0];
        for z in &zones {
            cuts.push(z.start_m);
            cuts.push(z.end_m);
        }
        cuts.retain(|&x| x < length_m);
        cuts.sort_by(f64::total_cmp);
        cuts.dedup();

        let mut bounds = Vec::with_capacity(cuts.len());
        let mut caps: Vec<f64> = Vec::with_capacity(cuts.len());
        for (i, &x) in cuts.iter().enumerate() {
            let next = cuts.get(i + 1).copied().unwrap_or(length_m);
            let mid = 0.5 * (x + next);
            let cap = zones
                .iter()
                .filter(|z| z.start_m <= mid && mid < z.end_m)
                .map(|z| z.limit_ms)
                .fold(max_speed_ms, f64::min);
            // Merge neighbours with the same cap.
            if caps.last() == Some(&cap) {
                continue;
            }
            bounds.push(x);
            caps.push(cap);
        }

        let two_d = 2.0 * decel_ms2;
        let mut keys = vec![0.0; caps.len()];
        let mut acc = two_d * length_m;
        for i in (0..caps.len()).rev() {
            keys[i] = acc;
            acc = acc.min(caps[i] * caps[i] + two_d * bounds[i]);
        }

        Self { length_m, decel: decel_ms2, bounds, caps, keys, zones }
    }

    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn zones(&self) -> &[SpeedZone] {
        &self.zones
    }

    /// Number of constant-cap intervals.
    pub fn interval_count(&self) -> usize {
        self.caps.len()
    }

    /// Interval containing `s` (the last one for `s ≥ L`).
    pub fn interval_at(&self, s: f64) -> usize {
        self.bounds.partition_point(|&x| x <= s).saturating_sub(1)
    }

    /// End of interval `i`.
    pub fn interval_end(&self, i: usize) -> f64 {
        self.bounds.get(i + 1).copied().unwrap_or(self.length_m)
    }

    pub fn cap(&self, i: usize) -> f64 {
        self.caps[i]
    }

    /// `K` such that, inside interval `i`, the braking bound is
    /// `v² ≤ K − 2d·s`.
    pub fn brake_key(&self, i: usize) -> f64 {
        self.keys[i]
    }

    /// The ceiling `u(s)`.  Zero past the end of the path.
    pub fn ceiling_at(&self, s: f64) -> f64 {
        if s >= self.length_m || self.caps.is_empty() {
            return 0.0;
        }
        self.caps[self.interval_at(s)]
    }

    /// The braking envelope `E(s)`.
    pub fn envelope_at(&self, s: f64) -> f64 {
        if s >= self.length_m || self.caps.is_empty() {
            return 0.0;
        }
        let i = self.interval_at(s);
        let line = (self.keys[i] - 2.0 * self.decel * s).max(0.0);
        self.caps[i].min(line.sqrt())
    }

    /// The zone of `kind` covering `s`, if any.
    pub fn zone_at(&self, s: f64, kind: ZoneKind) -> Option<&SpeedZone> {
        self.zones.iter().find(|z| z.kind == kind && z.contains(s))
    }
}
