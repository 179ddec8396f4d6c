//! History tracker — bounded, timestamped position histories per entity,
//! and the smoothed velocity/acceleration estimates derived from them.
//!
//! Ranged and melee prediction want different trade-offs: ranged uses a
//! short finite difference that reacts quickly, melee uses a longer
//! buffer with exponential smoothing so the pursuit vector stays stable.

use std::collections::{HashMap, VecDeque};

use glam::DVec2;

use skirmish_core::constants::*;
use skirmish_core::types::EntityId;

/// Smoothed melee kinematics for a tracked entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeleeEstimate {
    pub velocity: DVec2,
    pub acceleration: DVec2,
}

/// A (timestamp, position) pair.
type Sample = (f64, DVec2);

#[derive(Debug, Default)]
struct RangedTrack {
    samples: VecDeque<Sample>,
}

#[derive(Debug, Default)]
struct MeleeTrack {
    samples: VecDeque<Sample>,
    smoothed_velocity: DVec2,
    prev_raw_velocity: Option<DVec2>,
    acceleration: DVec2,
}

/// Per-entity position histories, owned exclusively by the engine.
#[derive(Debug, Default)]
pub struct HistoryTracker {
    ranged: HashMap<EntityId, RangedTrack>,
    melee: HashMap<EntityId, MeleeTrack>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position sample on the ranged path. Entries are created
    /// lazily on first observation; overflow evicts from the front.
    pub fn observe_ranged(&mut self, id: EntityId, position: DVec2, timestamp: f64) {
        let track = self.ranged.entry(id).or_default();
        track.samples.push_back((timestamp, position));
        while track.samples.len() > RANGED_HISTORY_CAPACITY {
            track.samples.pop_front();
        }
    }

    /// Linear velocity from a finite difference over the last three
    /// samples, or `None` when too few samples or too small an interval.
    pub fn estimate_ranged(&self, id: EntityId) -> Option<DVec2> {
        let track = self.ranged.get(&id)?;
        if track.samples.len() < RANGED_MIN_SAMPLES {
            return None;
        }
        let newest = track.samples[track.samples.len() - 1];
        let oldest = track.samples[track.samples.len() - RANGED_MIN_SAMPLES];
        let dt = newest.0 - oldest.0;
        if dt < MIN_SAMPLE_INTERVAL {
            return None;
        }
        Some(clamp_speed((newest.1 - oldest.1) / dt))
    }

    /// Record a position sample on the melee path and fold it into the
    /// smoothed velocity and acceleration estimates.
    pub fn observe_melee(&mut self, id: EntityId, position: DVec2, timestamp: f64) {
        let track = self.melee.entry(id).or_default();
        track.samples.push_back((timestamp, position));
        while track.samples.len() > MELEE_HISTORY_CAPACITY {
            track.samples.pop_front();
        }
        if track.samples.len() < MELEE_MIN_SAMPLES {
            return;
        }

        let newest = track.samples[track.samples.len() - 1];
        let oldest = track.samples[0];
        let dt = newest.0 - oldest.0;
        if dt < MIN_SAMPLE_INTERVAL {
            return;
        }
        let raw = (newest.1 - oldest.1) / dt;

        let s = MELEE_VELOCITY_SMOOTHING;
        track.smoothed_velocity = clamp_speed(track.smoothed_velocity * s + raw * (1.0 - s));
        if let Some(prev) = track.prev_raw_velocity {
            // Acceleration as the smoothed first difference of raw velocity.
            track.acceleration = (raw - prev) * (1.0 - s);
        }
        track.prev_raw_velocity = Some(raw);
    }

    /// Smoothed melee kinematics, or `None` when the entity has too few
    /// samples for a reliable estimate.
    pub fn estimate_melee(&self, id: EntityId) -> Option<MeleeEstimate> {
        let track = self.melee.get(&id)?;
        if track.samples.len() < MELEE_MIN_SAMPLES {
            return None;
        }
        Some(MeleeEstimate {
            velocity: track.smoothed_velocity,
            acceleration: track.acceleration,
        })
    }

    /// Number of ranged samples held for an entity.
    pub fn ranged_sample_count(&self, id: EntityId) -> usize {
        self.ranged.get(&id).map_or(0, |t| t.samples.len())
    }

    /// Number of melee samples held for an entity.
    pub fn melee_sample_count(&self, id: EntityId) -> usize {
        self.melee.get(&id).map_or(0, |t| t.samples.len())
    }

    /// Drop all samples for one entity (target switch starts fresh).
    pub fn reset(&mut self, id: EntityId) {
        self.ranged.remove(&id);
        self.melee.remove(&id);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.ranged.clear();
        self.melee.clear();
    }

    /// Evict tracks not observed recently, bounding the map to entities
    /// actually being watched.
    pub fn prune(&mut self, now: f64) {
        let stale = |samples: &VecDeque<Sample>| {
            samples.back().map_or(true, |s| now - s.0 > HISTORY_MAX_AGE)
        };
        self.ranged.retain(|_, t| !stale(&t.samples));
        self.melee.retain(|_, t| !stale(&t.samples));
    }
}

/// Uniformly rescale a velocity whose magnitude exceeds the plausible
/// ceiling (rejects teleports and sensor glitches).
fn clamp_speed(v: DVec2) -> DVec2 {
    let speed = v.length();
    if speed > MAX_TARGET_SPEED {
        v * (MAX_TARGET_SPEED / speed)
    } else {
        v
    }
}
