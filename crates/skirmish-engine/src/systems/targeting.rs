//! Target acquisition — scores and selects the best ranged target and,
//! independently, the best melee/loot target.
//!
//! Both selectors are a single O(n) pass over the snapshot. Ranged
//! selection works in screen space around the cursor; melee selection
//! works in world space around the observer.

use skirmish_core::config::{MeleeConfig, RangedConfig};
use skirmish_core::constants::*;
use skirmish_core::snapshot::{Observer, ObstacleState, PlayerState, WorldSnapshot};
use skirmish_core::types::EntityId;

/// Type substrings of destructible/interactable objects worth targeting.
const LOOT_PATTERNS: &[&str] = &[
    "crate_",
    "chest_",
    "barrel_",
    "bookshelf_",
    "drawers_",
    "locker_",
    "deposit_box_",
    "refrigerator_",
    "case_",
    "oven_",
    "bed_",
    "couch_",
    "table_",
    "window",
    "pot_",
    "planter_",
];

/// Shared candidate filter for player targets.
fn is_valid_player_target(
    player: &PlayerState,
    observer: &Observer,
    target_downed: bool,
    target_allies: bool,
) -> bool {
    player.alive
        && (target_downed || !player.downed)
        && player.id != observer.id
        && player.layer.compatible(observer.layer)
        && (target_allies || player.team != observer.team)
}

/// Select the best ranged target: candidates inside the screen-space FOV
/// around the cursor, scored by proximity with a continuity bonus that
/// biases against flapping between near-equal candidates.
pub fn find_ranged_target<'a>(
    snapshot: &'a WorldSnapshot,
    observer: &Observer,
    config: &RangedConfig,
    previous: Option<EntityId>,
) -> Option<&'a PlayerState> {
    let fov_sq = config.fov_radius * config.fov_radius;
    let mut best: Option<&PlayerState> = None;
    let mut best_score = f64::NEG_INFINITY;

    for player in &snapshot.players {
        if !is_valid_player_target(player, observer, config.target_downed, config.target_allies) {
            continue;
        }

        let screen_pos = snapshot.camera.world_to_screen(player.position);
        let dist_sq = screen_pos.distance_squared(observer.cursor_screen);
        if dist_sq > fov_sq {
            continue;
        }

        let screen_distance = dist_sq.sqrt();
        let distance_factor = (-screen_distance / RANGED_SCORE_DECAY).exp();
        let continuity = if previous == Some(player.id) {
            TARGET_CONTINUITY_BONUS
        } else {
            0.0
        };
        let score = distance_factor + continuity;

        if score > best_score {
            best_score = score;
            best = Some(player);
        }
    }

    best
}

/// Select the nearest valid player for melee engagement (world distance).
pub fn find_melee_target<'a>(
    snapshot: &'a WorldSnapshot,
    observer: &Observer,
    ranged: &RangedConfig,
    melee: &MeleeConfig,
) -> Option<&'a PlayerState> {
    let target_allies = melee.attack_allies || ranged.target_allies;
    let mut best: Option<&PlayerState> = None;
    let mut best_dist_sq = f64::INFINITY;

    for player in &snapshot.players {
        if !is_valid_player_target(player, observer, ranged.target_downed, target_allies) {
            continue;
        }
        let dist_sq = player.position.distance_squared(observer.position);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(player);
        }
    }

    best
}

/// Whether an obstacle is a targetable interactable object.
pub fn is_loot_targetable(obstacle: &ObstacleState) -> bool {
    !obstacle.dead
        && obstacle.collider.is_some()
        && obstacle.layer.is_some()
        && LOOT_PATTERNS.iter().any(|p| obstacle.kind.contains(p))
}

/// Nearest interactable object within melee lock range — the secondary,
/// lower-priority target class used when no player is available.
pub fn find_melee_loot_target<'a>(
    snapshot: &'a WorldSnapshot,
    observer: &Observer,
) -> Option<&'a ObstacleState> {
    let lock_range = MELEE_ENGAGE_DISTANCE + MELEE_LOCK_HYSTERESIS;
    let mut best: Option<&ObstacleState> = None;
    let mut best_dist = f64::INFINITY;

    for obstacle in &snapshot.obstacles {
        if !is_loot_targetable(obstacle) {
            continue;
        }
        if !layer_ok(obstacle, observer) {
            continue;
        }
        let dist = obstacle.position.distance(observer.position);
        if dist <= lock_range && dist < best_dist {
            best_dist = dist;
            best = Some(obstacle);
        }
    }

    best
}

/// Ranged-style loot scorer: FOV-filtered interactables preferred by
/// screen proximity, with a bonus for objects near the observer.
pub fn find_ranged_loot_target<'a>(
    snapshot: &'a WorldSnapshot,
    observer: &Observer,
    config: &RangedConfig,
) -> Option<&'a ObstacleState> {
    let fov_sq = config.fov_radius * config.fov_radius;
    let mut best: Option<&ObstacleState> = None;
    let mut best_score = f64::NEG_INFINITY;

    for obstacle in &snapshot.obstacles {
        if !is_loot_targetable(obstacle) {
            continue;
        }
        if !layer_ok(obstacle, observer) {
            continue;
        }

        let screen_pos = snapshot.camera.world_to_screen(obstacle.position);
        let dist_sq = screen_pos.distance_squared(observer.cursor_screen);
        if dist_sq > fov_sq {
            continue;
        }

        let world_dist = obstacle.position.distance(observer.position);
        let near_bonus = if world_dist < LOOT_NEAR_DISTANCE {
            LOOT_NEAR_BONUS
        } else {
            0.0
        };
        let score = -dist_sq.sqrt() + near_bonus;

        if score > best_score {
            best_score = score;
            best = Some(obstacle);
        }
    }

    best
}

fn layer_ok(obstacle: &ObstacleState, observer: &Observer) -> bool {
    obstacle.layer.map_or(true, |l| l.compatible(observer.layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use skirmish_core::enums::EquippedSlot;
    use skirmish_core::snapshot::{Camera, WeaponProfile};
    use skirmish_core::types::Layer;

    fn observer() -> Observer {
        Observer {
            id: EntityId(1),
            position: DVec2::ZERO,
            team: 1,
            layer: Layer(0),
            equipped_slot: EquippedSlot::Primary,
            weapon: WeaponProfile::default(),
            cursor_screen: DVec2::ZERO,
            is_firing: false,
        }
    }

    fn player(id: u64, pos: DVec2, team: u32) -> PlayerState {
        PlayerState {
            id: EntityId(id),
            position: pos,
            team,
            layer: Layer(0),
            alive: true,
            downed: false,
            name: format!("p{id}"),
            helmet_level: 0,
            chest_level: 0,
            backpack_level: 0,
        }
    }

    fn snapshot(players: Vec<PlayerState>) -> WorldSnapshot {
        WorldSnapshot {
            camera: Camera::identity(),
            players,
            ..Default::default()
        }
    }

    #[test]
    fn test_ranged_prefers_cursor_proximity() {
        let snap = snapshot(vec![
            player(2, DVec2::new(100.0, 0.0), 2),
            player(3, DVec2::new(20.0, 0.0), 2),
        ]);
        let target = find_ranged_target(&snap, &observer(), &RangedConfig::default(), None)
            .expect("target inside FOV");
        assert_eq!(target.id, EntityId(3));
    }

    #[test]
    fn test_ranged_skips_teammates_dead_and_downed() {
        let mut teammate = player(2, DVec2::new(10.0, 0.0), 1);
        teammate.team = 1;
        let mut dead = player(3, DVec2::new(10.0, 0.0), 2);
        dead.alive = false;
        let mut downed = player(4, DVec2::new(10.0, 0.0), 2);
        downed.downed = true;

        let snap = snapshot(vec![teammate, dead, downed]);
        assert!(
            find_ranged_target(&snap, &observer(), &RangedConfig::default(), None).is_none(),
            "no valid candidates should remain"
        );
    }

    #[test]
    fn test_ranged_outside_fov_ignored() {
        let snap = snapshot(vec![player(2, DVec2::new(1000.0, 0.0), 2)]);
        assert!(find_ranged_target(&snap, &observer(), &RangedConfig::default(), None).is_none());
    }

    #[test]
    fn test_continuity_bonus_holds_target_on_near_tie() {
        let snap = snapshot(vec![
            player(2, DVec2::new(30.0, 0.0), 2),
            player(3, DVec2::new(30.5, 0.0), 2),
        ]);
        // Slightly farther, but previously selected: bonus keeps it.
        let target = find_ranged_target(
            &snap,
            &observer(),
            &RangedConfig::default(),
            Some(EntityId(3)),
        )
        .unwrap();
        assert_eq!(target.id, EntityId(3), "continuity bonus should win ties");
    }

    #[test]
    fn test_melee_picks_nearest_player() {
        let snap = snapshot(vec![
            player(2, DVec2::new(5.0, 0.0), 2),
            player(3, DVec2::new(3.0, 0.0), 2),
        ]);
        let target = find_melee_target(
            &snap,
            &observer(),
            &RangedConfig::default(),
            &MeleeConfig::default(),
        )
        .unwrap();
        assert_eq!(target.id, EntityId(3));
    }

    #[test]
    fn test_melee_loot_fallback_range_gated() {
        let loot_near = ObstacleState {
            id: EntityId(10),
            kind: "crate_01".into(),
            position: DVec2::new(4.0, 0.0),
            collider: Some(skirmish_core::types::Collider::Circle {
                center: DVec2::new(4.0, 0.0),
                radius: 1.0,
            }),
            layer: Some(Layer(0)),
            height: 0.5,
            health: Some(100.0),
            dead: false,
            collidable: true,
            is_wall: false,
            indestructible: false,
        };
        let loot_far = ObstacleState {
            id: EntityId(11),
            position: DVec2::new(20.0, 0.0),
            ..loot_near.clone()
        };
        let snap = WorldSnapshot {
            obstacles: vec![loot_far, loot_near],
            ..Default::default()
        };
        let target = find_melee_loot_target(&snap, &observer()).expect("near crate in lock range");
        assert_eq!(target.id, EntityId(10));
    }
}
