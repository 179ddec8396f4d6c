//! Hazard avoidance — vector-field evasion from area-effect threats.
//!
//! Independent of targeting: the engagement machine consults the nearest
//! danger to decide whether the evasion heading merely exists or must
//! override the movement output.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::constants::*;
use skirmish_core::snapshot::{HazardState, Observer};
use skirmish_core::types::heading_vector;

/// Type substrings of area-effect threats.
const HAZARD_PATTERNS: &[&str] = &[
    "frag",
    "explosion",
    "smoke",
    "gas",
    "concussion",
    "mine",
];

/// A scanned hazard with its nested threat radii resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardThreat {
    pub position: DVec2,
    /// Distance from the observer at scan time.
    pub distance: f64,
    /// Explosion radius (snapshot value or the engine default).
    pub radius: f64,
}

impl HazardThreat {
    /// Outer zone: inside it the evasion heading overrides normal
    /// movement output.
    pub fn danger_zone(&self) -> f64 {
        self.radius + HAZARD_SAFETY_MARGIN
    }

    /// Inner zone: inside it even melee pursuit is abandoned.
    pub fn critical_zone(&self) -> f64 {
        self.radius * HAZARD_CRITICAL_FACTOR
    }
}

/// Scan the snapshot for hazards threatening the observer, nearest
/// first. Recomputed per scan; nothing is persisted across ticks here.
pub fn scan(hazards: &[HazardState], observer: &Observer) -> Vec<HazardThreat> {
    let mut threats: Vec<HazardThreat> = hazards
        .iter()
        .filter(|h| !h.dead)
        .filter(|h| HAZARD_PATTERNS.iter().any(|p| h.kind.contains(p)))
        .filter(|h| h.layer.map_or(true, |l| l.compatible(observer.layer)))
        .filter_map(|h| {
            let distance = h.position.distance(observer.position);
            (distance <= HAZARD_SCAN_RANGE).then_some(HazardThreat {
                position: h.position,
                distance,
                radius: h.explosion_radius.unwrap_or(HAZARD_BASE_RADIUS),
            })
        })
        .collect();
    threats.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    threats
}

/// Combined evasion heading away from all scanned hazards, weighted
/// inversely by distance. Returns `None` when nothing threatens or the
/// contributions cancel out.
///
/// The RNG only fires for the distance-zero singularity: standing on a
/// hazard still needs a defined, strong flee direction.
pub fn evasion_heading(
    observer_pos: DVec2,
    threats: &[HazardThreat],
    rng: &mut ChaCha8Rng,
) -> Option<f64> {
    if threats.is_empty() {
        return None;
    }

    let mut away = DVec2::ZERO;
    for threat in threats {
        let offset = observer_pos - threat.position;
        let dist = offset.length();
        if dist < HAZARD_ZERO_DISTANCE_EPSILON {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            away += heading_vector(angle) * HAZARD_ZERO_DISTANCE_WEIGHT;
        } else {
            let weight = 1.0 / (dist + 1.0);
            away += (offset / dist) * weight;
        }
    }

    let magnitude = away.length();
    if magnitude < HAZARD_MIN_RESULTANT {
        return None;
    }
    Some(away.y.atan2(away.x))
}

/// Nearest threat whose danger zone contains the observer, if any.
pub fn nearest_danger(threats: &[HazardThreat]) -> Option<&HazardThreat> {
    threats.iter().find(|t| t.distance <= t.danger_zone())
}

/// Whether any threat's critical zone contains the observer.
pub fn in_critical_zone(threats: &[HazardThreat]) -> bool {
    threats.iter().any(|t| t.distance <= t.critical_zone())
}
