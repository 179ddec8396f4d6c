//! Visibility oracle — multi-ray line-of-effect queries against dynamic
//! obstacle geometry.
//!
//! A single centre ray would reject targets behind partial cover that a
//! spread weapon can in fact hit, so the query fans rays across the
//! widened spread cone and accepts when enough of them get through.

use glam::DVec2;

use skirmish_core::constants::*;
use skirmish_core::enums::ObstacleClass;
use skirmish_core::snapshot::ObstacleState;
use skirmish_core::types::{heading_vector, Layer};

/// Type substrings that always block projectiles.
const BLOCKING_PATTERNS: &[&str] = &[
    "metal_wall_",
    "brick_wall_",
    "concrete_wall_",
    "stone_wall_",
    "container_wall_",
    "_wall_int_",
    "house_wall_",
    "warehouse_wall_",
    "cabin_wall_",
    "shack_wall_",
    "silo_",
    "bollard_",
    "sandbags_",
    "hedgehog",
    "stone_0",
    "tree_",
    "glass_wall_",
    "locker_",
    "deposit_box_",
];

/// Type substrings that never block projectiles (destructible clutter).
const NON_BLOCKING_PATTERNS: &[&str] = &[
    "bush_",
    "brush_",
    "crate_",
    "barrel_",
    "refrigerator_",
    "chest_",
    "case_",
    "oven_",
    "bed_",
    "bookshelf_",
    "couch_",
    "table_",
    "drawers_",
    "window",
    "toilet_",
    "pot_",
    "planter_",
    "woodpile_",
    "decal",
];

/// Classify an obstacle from its flags and type tag. `Unknown` means no
/// flag or pattern applied and the health heuristic decides.
pub fn classify(obstacle: &ObstacleState) -> ObstacleClass {
    if !obstacle.collidable {
        return ObstacleClass::NonBlocking;
    }
    if obstacle.is_wall || obstacle.indestructible {
        return ObstacleClass::Blocking;
    }
    if BLOCKING_PATTERNS.iter().any(|p| obstacle.kind.contains(p)) {
        return ObstacleClass::Blocking;
    }
    if NON_BLOCKING_PATTERNS.iter().any(|p| obstacle.kind.contains(p)) {
        return ObstacleClass::NonBlocking;
    }
    ObstacleClass::Unknown
}

/// Whether an obstacle blocks projectiles, with the high-health fallback
/// for unclassified types.
pub fn is_blocking(obstacle: &ObstacleState) -> bool {
    match classify(obstacle) {
        ObstacleClass::Blocking => true,
        ObstacleClass::NonBlocking => false,
        ObstacleClass::Unknown => obstacle
            .health
            .map_or(false, |h| h > BLOCKING_HEALTH_THRESHOLD),
    }
}

/// Whether a clear line of effect exists from `from` to `to` for a
/// weapon with the given spread, against the snapshot's obstacles.
///
/// Targets beyond `max_range` are never in effect. Rays fan across
/// `spread_deg * 1.5` centred on the direct bearing; a ray is blocked
/// when any blocking obstacle intersects it strictly before the target's
/// collision radius. Accepts early above the fast-accept fraction,
/// otherwise requires the minimum fraction of unblocked rays.
pub fn has_line_of_effect(
    from: DVec2,
    to: DVec2,
    spread_deg: f64,
    max_range: f64,
    observer_layer: Layer,
    obstacles: &[ObstacleState],
) -> bool {
    let delta = to - from;
    let distance = delta.length();
    if distance > max_range {
        return false;
    }
    if distance < 1e-9 {
        return true;
    }

    let candidates: Vec<&ObstacleState> = obstacles
        .iter()
        .filter(|o| {
            o.collider.is_some()
                && !o.dead
                && o.height >= PROJECTILE_HEIGHT
                && o.layer.map_or(true, |l| l.compatible(observer_layer))
        })
        .filter(|o| is_blocking(o))
        .collect();

    if candidates.is_empty() {
        return true;
    }

    let aim_angle = delta.y.atan2(delta.x);
    let fan = spread_deg.to_radians() * SPREAD_FAN_FACTOR;
    let ray_count = ray_count(spread_deg, distance);

    let mut unblocked = 0usize;
    for i in 0..ray_count {
        let t = if ray_count == 1 {
            0.5
        } else {
            i as f64 / (ray_count - 1) as f64
        };
        let ray_angle = aim_angle - fan / 2.0 + fan * t;
        let end = from + heading_vector(ray_angle) * distance;

        let mut blocked = false;
        for obstacle in &candidates {
            let collider = match obstacle.collider {
                Some(c) => c,
                None => continue,
            };
            if let Some(hit) = collider.intersect_segment(from, end) {
                if (hit - from).length() < distance - TARGET_COLLISION_RADIUS {
                    blocked = true;
                    break;
                }
            }
        }

        if !blocked {
            unblocked += 1;
            // Early exit once a clear majority of rays pass through.
            if unblocked as f64 > ray_count as f64 * VISIBILITY_FAST_ACCEPT {
                return true;
            }
        }
    }

    unblocked as f64 > ray_count as f64 * VISIBILITY_MIN_ACCEPT
}

/// Ray count scales with spread and distance, bounded to cap cost.
fn ray_count(spread_deg: f64, distance: f64) -> usize {
    let spread_rays = if spread_deg > 0.0 {
        (spread_deg * 2.0).ceil() as usize
    } else {
        ZERO_SPREAD_RAY_COUNT
    };
    let distance_rays = (distance / RAY_DISTANCE_STEP).ceil() as usize;
    spread_rays
        .min(MAX_RAY_COUNT)
        .max(distance_rays)
        .clamp(MIN_RAY_COUNT, MAX_RAY_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::types::{Collider, EntityId};

    fn wall(center: DVec2, half: DVec2) -> ObstacleState {
        ObstacleState {
            id: EntityId(100),
            kind: "brick_wall_1".into(),
            position: center,
            collider: Some(Collider::Aabb {
                min: center - half,
                max: center + half,
            }),
            layer: Some(Layer(0)),
            height: 1.0,
            health: None,
            dead: false,
            collidable: true,
            is_wall: true,
            indestructible: false,
        }
    }

    #[test]
    fn test_no_blocking_obstacles_trivially_visible() {
        let bush = ObstacleState {
            kind: "bush_01".into(),
            is_wall: false,
            ..wall(DVec2::new(50.0, 0.0), DVec2::new(2.0, 2.0))
        };
        assert!(has_line_of_effect(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            5.0,
            1000.0,
            Layer(0),
            &[bush],
        ));
    }

    #[test]
    fn test_spanning_wall_blocks() {
        // Wall fully spans the direct line and every fan ray.
        let obstacles = vec![wall(DVec2::new(50.0, 0.0), DVec2::new(1.0, 200.0))];
        assert!(!has_line_of_effect(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            5.0,
            1000.0,
            Layer(0),
            &obstacles,
        ));
    }

    #[test]
    fn test_short_obstacle_overflown() {
        let mut low = wall(DVec2::new(50.0, 0.0), DVec2::new(1.0, 200.0));
        low.height = 0.1; // below projectile height
        assert!(has_line_of_effect(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            5.0,
            1000.0,
            Layer(0),
            &[low],
        ));
    }

    #[test]
    fn test_other_layer_obstacle_ignored() {
        let mut other = wall(DVec2::new(50.0, 0.0), DVec2::new(1.0, 200.0));
        other.layer = Some(Layer(1));
        assert!(has_line_of_effect(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            5.0,
            1000.0,
            Layer(0),
            &[other],
        ));
    }

    #[test]
    fn test_target_beyond_max_range_not_in_effect() {
        assert!(!has_line_of_effect(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            0.0,
            50.0,
            Layer(0),
            &[],
        ));
    }

    #[test]
    fn test_hit_within_target_radius_does_not_block() {
        // Obstacle hugging the target: hits land inside the target's
        // collision radius and must not count as cover.
        let hugging = wall(DVec2::new(99.8, 0.0), DVec2::new(0.1, 0.1));
        assert!(has_line_of_effect(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            0.0,
            1000.0,
            Layer(0),
            &[hugging],
        ));
    }

    #[test]
    fn test_classification_order() {
        let mut o = wall(DVec2::ZERO, DVec2::ONE);
        o.is_wall = false;
        o.kind = "mystery_object".into();
        assert_eq!(classify(&o), ObstacleClass::Unknown);
        assert!(!is_blocking(&o), "no health: falls through to non-blocking");
        o.health = Some(500.0);
        assert!(is_blocking(&o), "high health fallback blocks");
        o.collidable = false;
        assert!(!is_blocking(&o), "non-collidable wins over everything");
    }

    #[test]
    fn test_ray_count_bounds() {
        assert_eq!(ray_count(0.0, 10.0), ZERO_SPREAD_RAY_COUNT);
        assert!(ray_count(90.0, 10.0) <= MAX_RAY_COUNT);
        assert!(ray_count(0.1, 10_000.0) <= MAX_RAY_COUNT);
        assert!(ray_count(0.1, 1.0) >= MIN_RAY_COUNT);
    }
}
