//! Targeting engine — the top-level orchestrator.
//!
//! `TargetingEngine` owns all cross-tick state (histories, the melee
//! lock session, the hazard cache, the action queue) and composes the
//! decision subsystems once per tick into a single directive. Completely
//! headless and single-threaded: the host calls `tick` once per frame
//! with a fresh snapshot and drains the action queue afterwards.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error};

use skirmish_core::commands::ActionRequest;
use skirmish_core::config::EngineConfig;
use skirmish_core::constants::*;
use skirmish_core::directive::{Directive, HudInfo, TickOutput};
use skirmish_core::enums::{EquippedSlot, LockPhase};
use skirmish_core::snapshot::{Observer, ObstacleState, PlayerState, WorldSnapshot};
use skirmish_core::types::{angle_towards, heading_vector, EntityId};

use crate::error::TickError;
use crate::session::EngagementSession;
use crate::systems::hazard::{self, HazardThreat};
use crate::systems::history::HistoryTracker;
use crate::systems::{targeting, trajectory, visibility};

/// Projectile speed assumed when the snapshot carries none.
const DEFAULT_PROJECTILE_SPEED: f64 = 1000.0;

/// Throttled hazard scan results carried between scans.
#[derive(Debug, Default)]
struct HazardCache {
    last_scan: Option<f64>,
    threats: Vec<HazardThreat>,
}

/// A melee lock candidate resolved against the current snapshot.
#[derive(Clone, Copy)]
enum MeleeTargetRef<'a> {
    Player(&'a PlayerState),
    Loot(&'a ObstacleState),
}

impl MeleeTargetRef<'_> {
    fn id(&self) -> EntityId {
        match self {
            MeleeTargetRef::Player(p) => p.id,
            MeleeTargetRef::Loot(o) => o.id,
        }
    }

    fn position(&self) -> DVec2 {
        match self {
            MeleeTargetRef::Player(p) => p.position,
            MeleeTargetRef::Loot(o) => o.position,
        }
    }

    fn is_loot(&self) -> bool {
        matches!(self, MeleeTargetRef::Loot(_))
    }
}

/// The targeting decision engine. Owns all session state.
pub struct TargetingEngine {
    config: EngineConfig,
    history: HistoryTracker,
    session: Option<EngagementSession>,
    phase: LockPhase,
    /// Host-pinned target that preempts acquisition while valid.
    focused_target: Option<EntityId>,
    /// Previously selected ranged target (continuity bonus, history reset).
    current_target: Option<EntityId>,
    /// Melee weapon swap has been requested but not yet observed.
    switching_to_melee: bool,
    hazards: HazardCache,
    last_directive: Directive,
    actions: VecDeque<ActionRequest>,
    rng: ChaCha8Rng,
}

impl TargetingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            history: HistoryTracker::new(),
            session: None,
            phase: LockPhase::Idle,
            focused_target: None,
            current_target: None,
            switching_to_melee: false,
            hazards: HazardCache::default(),
            last_directive: Directive::idle(),
            actions: VecDeque::new(),
            rng,
        }
    }

    /// Run one decision tick. Never panics outward: unexpected faults
    /// force a full reset to idle so a single bad tick cannot corrupt
    /// subsequent ticks.
    pub fn tick(&mut self, snapshot: &WorldSnapshot) -> TickOutput {
        let output = match catch_unwind(AssertUnwindSafe(|| self.run_tick(snapshot))) {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                debug!(%err, "tick skipped");
                TickOutput {
                    directive: Directive::idle(),
                    hud: None,
                }
            }
            Err(_) => {
                error!("tick faulted; resetting to idle");
                self.reset();
                TickOutput {
                    directive: Directive::idle_immediate(),
                    hud: None,
                }
            }
        };
        self.last_directive = output.directive.clone();
        output
    }

    /// The last published directive (last-write-wins across ticks).
    pub fn last_directive(&self) -> &Directive {
        &self.last_directive
    }

    /// Current melee engagement phase.
    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    /// The active melee lock session, if any.
    pub fn session(&self) -> Option<&EngagementSession> {
        self.session.as_ref()
    }

    /// Pin a target that preempts acquisition until it becomes invalid.
    pub fn set_focus(&mut self, target: Option<EntityId>) {
        self.focused_target = target;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable config access; changes take effect on the next tick.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Drain queued action requests in decision order.
    pub fn drain_actions(&mut self) -> Vec<ActionRequest> {
        self.actions.drain(..).collect()
    }

    /// Clear all session and tracking state.
    pub fn reset(&mut self) {
        self.session = None;
        self.phase = LockPhase::Idle;
        self.focused_target = None;
        self.current_target = None;
        self.switching_to_melee = false;
        self.history.clear();
        self.hazards = HazardCache::default();
        self.actions.clear();
    }

    fn clear_session(&mut self) {
        if self.session.take().is_some() {
            debug!("melee lock released");
        }
        self.switching_to_melee = false;
    }

    /// Rule priority order per tick:
    /// 1. disabled/spectating -> idle, clear session
    /// 2. validate or reacquire the melee lock
    /// 3. locked target in range -> melee pursuit directive
    /// 4. ranged target -> predicted aim directive
    /// 5. loot fallback -> ranged directive at its screen position
    /// 6. hazard override or plain idle
    fn run_tick(&mut self, snapshot: &WorldSnapshot) -> Result<TickOutput, TickError> {
        // 1. Feature kill-switch and non-interactive modes.
        if !self.config.any_enabled() || snapshot.spectating {
            self.clear_session();
            self.current_target = None;
            self.phase = LockPhase::Idle;
            return Ok(TickOutput {
                directive: Directive::idle(),
                hud: None,
            });
        }

        let observer = snapshot.observer.as_ref().ok_or(TickError::ObserverMissing)?;

        self.history.prune(snapshot.time_secs);

        // Hazard rescans are throttled; stale data between scans is fine.
        let threats = if self.config.melee.hazard_evasion {
            self.rescan_hazards(snapshot, observer);
            self.hazards.threats.clone()
        } else {
            Vec::new()
        };

        let is_melee_equipped = observer.equipped_slot == EquippedSlot::Melee;
        let is_throwable = observer.equipped_slot == EquippedSlot::Throwable;
        let cooking = is_throwable && observer.is_firing;

        let ranged_cfg = self.config.ranged.clone();
        let melee_cfg = self.config.melee.clone();

        let wants_melee = melee_cfg.enabled && (ranged_cfg.automatic || observer.is_firing);

        // 2. Validate the existing lock, else reacquire.
        let melee_target = if wants_melee {
            self.resolve_melee_target(snapshot, observer)
        } else {
            self.clear_session();
            None
        };

        let mut distance_to_melee = f64::INFINITY;
        let mut predicted_melee = DVec2::ZERO;
        if let Some(target) = &melee_target {
            distance_to_melee = target.position().distance(observer.position);
            predicted_melee = match target {
                MeleeTargetRef::Player(p) => {
                    self.history
                        .observe_melee(p.id, p.position, snapshot.time_secs);
                    match self.history.estimate_melee(p.id) {
                        Some(estimate) => trajectory::melee_aim_point(p.position, &estimate),
                        None => p.position,
                    }
                }
                // Objects do not move.
                MeleeTargetRef::Loot(o) => o.position,
            };
            if let Some(session) = &mut self.session {
                session.last_distance = distance_to_melee;
            }
        }

        // Adaptive engage distance: fast movers get a slightly larger
        // envelope so prediction error does not drop the lock.
        let adaptive_engage = MELEE_ENGAGE_DISTANCE
            + match &melee_target {
                Some(MeleeTargetRef::Player(p)) => self
                    .history
                    .estimate_melee(p.id)
                    .map_or(0.0, |e| {
                        (e.velocity.length() / MELEE_ADAPTIVE_SPEED_SCALE)
                            .min(MELEE_ADAPTIVE_MAX_BONUS)
                    }),
                _ => 0.0,
            };
        let melee_in_range = distance_to_melee <= adaptive_engage + MELEE_LOCK_HYSTERESIS;
        let melee_detected = distance_to_melee <= MELEE_DETECTION_DISTANCE + MELEE_LOCK_HYSTERESIS;
        let aggressive_range = ranged_cfg.aggressive
            && melee_cfg.auto_equip
            && distance_to_melee <= MELEE_DETECTION_DISTANCE * AGGRESSIVE_MELEE_RANGE_FACTOR;

        // 3. Auto-equip and melee pursuit.
        if wants_melee
            && melee_cfg.auto_equip
            && !is_melee_equipped
            && (melee_in_range || aggressive_range)
            && melee_target.is_some()
        {
            self.actions.push_back(ActionRequest::EquipMelee);
            self.switching_to_melee = true;
        }
        if is_melee_equipped || (!melee_in_range && !aggressive_range) {
            self.switching_to_melee = false;
        }

        let lock_active = wants_melee
            && (melee_in_range || aggressive_range)
            && melee_target.is_some()
            && (is_melee_equipped || self.switching_to_melee);

        if let (true, Some(target)) = (lock_active, melee_target) {
            let shootable = target.is_loot()
                || !ranged_cfg.respect_obstacles
                || visibility::has_line_of_effect(
                    observer.position,
                    target.position(),
                    observer.weapon.spread_deg,
                    observer.weapon.range.unwrap_or(f64::INFINITY),
                    observer.layer,
                    &snapshot.obstacles,
                );

            if shootable {
                let mut move_angle = angle_towards(observer.position, predicted_melee);

                // Bounded directional lead for fast movers.
                if let MeleeTargetRef::Player(p) = target {
                    if let Some(estimate) = self.history.estimate_melee(p.id) {
                        let speed = estimate.velocity.length();
                        if speed > MELEE_LEAD_SPEED_THRESHOLD {
                            let target_heading =
                                estimate.velocity.y.atan2(estimate.velocity.x);
                            let lead =
                                (speed / MAX_TARGET_SPEED).min(MELEE_LEAD_MAX_FACTOR);
                            move_angle += wrap_angle(target_heading - move_angle) * lead;
                        }
                    }
                }

                // A hazard inside its critical zone trumps pursuit.
                let mut final_angle = move_angle;
                if melee_cfg.hazard_evasion && hazard::in_critical_zone(&threats) {
                    if let Some(evade) =
                        hazard::evasion_heading(observer.position, &threats, &mut self.rng)
                    {
                        final_angle = evade;
                    }
                }

                if melee_cfg.auto_attack
                    && is_melee_equipped
                    && distance_to_melee < MELEE_ENGAGE_DISTANCE
                {
                    self.actions.push_back(ActionRequest::Fire);
                }

                self.phase = if is_melee_equipped {
                    LockPhase::Locked
                } else {
                    LockPhase::TransitioningToMelee
                };
                return Ok(TickOutput {
                    directive: Directive::MeleeLock {
                        aim_point: snapshot.camera.world_to_screen(predicted_melee),
                        move_vector: heading_vector(final_angle),
                        immediate: true,
                    },
                    hud: None,
                });
            }
        }

        // Gradual target loss: drop the session only once the target
        // leaves the (hysteresis-extended) detection range.
        if wants_melee && !melee_detected {
            self.clear_session();
        }
        self.phase = if wants_melee && self.session.is_some() {
            LockPhase::Seeking
        } else {
            LockPhase::Idle
        };

        // 4. Ranged targeting. A seeking melee lock borrows the ranged
        // path while its target is close enough; an active lock (even one
        // whose target failed the visibility check), melee in hand, or a
        // cold throwable suppresses ranged aiming entirely.
        let ranged_allowed = ranged_cfg.enabled
            || (melee_cfg.enabled && distance_to_melee <= MELEE_RANGED_ASSIST_DISTANCE);
        if !ranged_allowed || is_melee_equipped || lock_active || (is_throwable && !cooking) {
            self.current_target = None;
            return Ok(TickOutput {
                directive: Directive::idle(),
                hud: None,
            });
        }

        let should_aim =
            ranged_cfg.aggressive || observer.is_firing || ranged_cfg.automatic;

        let enemy = self.resolve_ranged_target(snapshot, observer);
        if let Some(target) = enemy {
            if self.current_target != Some(target.id) {
                // Fresh target, fresh history.
                self.history.reset(target.id);
                self.current_target = Some(target.id);
                debug!(id = target.id.0, "ranged target selected");
            }
            self.history
                .observe_ranged(target.id, target.position, snapshot.time_secs);
            let velocity = self.history.estimate_ranged(target.id).unwrap_or(DVec2::ZERO);

            let projectile_speed = observer
                .weapon
                .projectile_speed
                .unwrap_or(DEFAULT_PROJECTILE_SPEED);
            let aim_world = trajectory::ranged_aim_point(
                observer.position,
                target.position,
                velocity,
                projectile_speed,
                ranged_cfg.prediction_strength,
            );
            let aim_point = snapshot.camera.world_to_screen(aim_world);

            let distance = target.position.distance(observer.position);
            let range = observer.weapon.range.unwrap_or(f64::INFINITY);
            // The fire gate always respects obstacles; the aim gate may
            // not, depending on configuration.
            let shootable = visibility::has_line_of_effect(
                observer.position,
                target.position,
                observer.weapon.spread_deg,
                range,
                observer.layer,
                &snapshot.obstacles,
            );
            let may_aim = distance <= range
                && (ranged_cfg.aggressive || !ranged_cfg.respect_obstacles || shootable);

            let hud = Some(HudInfo {
                target_name: target.name.clone(),
                distance,
                direction: angle_towards(observer.position, target.position),
                helmet_level: target.helmet_level,
                chest_level: target.chest_level,
                backpack_level: target.backpack_level,
            });

            if should_aim && may_aim {
                return Ok(TickOutput {
                    directive: Directive::Ranged {
                        aim_point,
                        shootable,
                        immediate: true,
                    },
                    hud,
                });
            }
            return Ok(self.idle_or_evade(observer, &threats, hud));
        }

        // 5. Loot fallback via the ranged-style scorer.
        self.current_target = None;
        if should_aim {
            if let Some(loot) = targeting::find_ranged_loot_target(snapshot, observer, &ranged_cfg)
            {
                let aim_point = snapshot.camera.world_to_screen(loot.position);
                let distance = loot.position.distance(observer.position);
                let range = observer.weapon.range.unwrap_or(f64::INFINITY);
                let shootable = visibility::has_line_of_effect(
                    observer.position,
                    loot.position,
                    observer.weapon.spread_deg,
                    range,
                    observer.layer,
                    &snapshot.obstacles,
                );
                let may_aim = distance <= range
                    && (ranged_cfg.aggressive || !ranged_cfg.respect_obstacles || shootable);
                if may_aim {
                    return Ok(TickOutput {
                        directive: Directive::Ranged {
                            aim_point,
                            shootable,
                            immediate: true,
                        },
                        hud: None,
                    });
                }
            }
        }

        // 6. Nothing targetable.
        Ok(self.idle_or_evade(observer, &threats, None))
    }

    /// Idle directive, with the evasion heading overriding movement when
    /// a hazard's danger zone contains the observer.
    fn idle_or_evade(
        &mut self,
        observer: &Observer,
        threats: &[HazardThreat],
        hud: Option<HudInfo>,
    ) -> TickOutput {
        if self.config.melee.hazard_evasion && hazard::nearest_danger(threats).is_some() {
            if let Some(angle) = hazard::evasion_heading(observer.position, threats, &mut self.rng)
            {
                return TickOutput {
                    directive: Directive::Idle {
                        evasion: Some(heading_vector(angle)),
                        immediate: true,
                    },
                    hud,
                };
            }
        }
        TickOutput {
            directive: Directive::idle(),
            hud,
        }
    }

    /// Validate the current lock (alive, layer-compatible, inside the
    /// hysteresis-extended range), else run melee acquisition.
    fn resolve_melee_target<'a>(
        &mut self,
        snapshot: &'a WorldSnapshot,
        observer: &Observer,
    ) -> Option<MeleeTargetRef<'a>> {
        let release_range = MELEE_DETECTION_DISTANCE + MELEE_LOCK_HYSTERESIS * 2.0;

        if let Some(session) = &self.session {
            let held: Option<MeleeTargetRef<'a>> = if session.is_loot {
                snapshot
                    .obstacles
                    .iter()
                    .find(|o| o.id == session.target_id)
                    .filter(|o| targeting::is_loot_targetable(o))
                    .filter(|o| o.layer.map_or(true, |l| l.compatible(observer.layer)))
                    .map(MeleeTargetRef::Loot)
            } else {
                snapshot
                    .players
                    .iter()
                    .find(|p| p.id == session.target_id)
                    .filter(|p| p.alive && p.layer.compatible(observer.layer))
                    .map(MeleeTargetRef::Player)
            };
            if let Some(target) = held {
                if target.position().distance(observer.position) <= release_range {
                    return Some(target);
                }
            }
        }

        // Lock invalid: find a replacement, players first.
        let replacement = targeting::find_melee_target(
            snapshot,
            observer,
            &self.config.ranged,
            &self.config.melee,
        )
        .map(MeleeTargetRef::Player)
        .or_else(|| {
            targeting::find_melee_loot_target(snapshot, observer).map(MeleeTargetRef::Loot)
        });

        match replacement {
            Some(target) => {
                let switched = self
                    .session
                    .as_ref()
                    .map_or(true, |s| s.target_id != target.id());
                if switched {
                    debug!(id = target.id().0, loot = target.is_loot(), "melee lock acquired");
                    self.session = Some(EngagementSession::new(
                        target.id(),
                        target.is_loot(),
                        snapshot.time_secs,
                    ));
                }
                Some(target)
            }
            None => {
                self.clear_session();
                None
            }
        }
    }

    /// A valid pinned target preempts acquisition; otherwise score the
    /// snapshot.
    fn resolve_ranged_target<'a>(
        &mut self,
        snapshot: &'a WorldSnapshot,
        observer: &Observer,
    ) -> Option<&'a PlayerState> {
        if let Some(id) = self.focused_target {
            let pinned = snapshot
                .players
                .iter()
                .find(|p| p.id == id)
                .filter(|p| p.alive && p.layer.compatible(observer.layer))
                .filter(|p| self.config.ranged.target_downed || !p.downed);
            match pinned {
                Some(p) => return Some(p),
                None => {
                    // Pin no longer valid; fall back to acquisition.
                    self.focused_target = None;
                }
            }
        }
        targeting::find_ranged_target(snapshot, observer, &self.config.ranged, self.current_target)
    }

    fn rescan_hazards(&mut self, snapshot: &WorldSnapshot, observer: &Observer) {
        let due = self
            .hazards
            .last_scan
            .map_or(true, |t| snapshot.time_secs - t >= HAZARD_SCAN_INTERVAL);
        if due {
            self.hazards.threats = hazard::scan(&snapshot.hazards, observer);
            self.hazards.last_scan = Some(snapshot.time_secs);
        }
    }
}

/// Wrap an angle difference into [-pi, pi].
fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}
