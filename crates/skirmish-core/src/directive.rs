//! Directives and HUD records — the engine's per-tick output.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::AimMode;

/// The engine's sole externally visible decision for one tick.
///
/// Exactly one directive is live at a time; each tick's directive fully
/// supersedes the previous one. The variant determines which fields
/// exist, so a ranged directive can never carry a movement vector and a
/// melee directive always carries both an aim point and a movement
/// vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum Directive {
    /// No target. May still carry a hazard-evasion movement vector.
    Idle {
        evasion: Option<DVec2>,
        /// Suppress actuator smoothing and apply at once.
        immediate: bool,
    },
    /// Aim a projectile weapon at a predicted screen-space point.
    Ranged {
        aim_point: DVec2,
        /// Whether a clear line of effect exists for actually firing.
        /// Aiming may be allowed even when this is false.
        shootable: bool,
        immediate: bool,
    },
    /// Pursue a close-range locked target.
    MeleeLock {
        aim_point: DVec2,
        /// Unit movement direction in world space.
        move_vector: DVec2,
        immediate: bool,
    },
}

impl Directive {
    /// A plain idle directive with no movement override.
    pub fn idle() -> Self {
        Directive::Idle {
            evasion: None,
            immediate: false,
        }
    }

    /// An idle directive that takes effect without smoothing.
    pub fn idle_immediate() -> Self {
        Directive::Idle {
            evasion: None,
            immediate: true,
        }
    }

    pub fn mode(&self) -> AimMode {
        match self {
            Directive::Idle { .. } => AimMode::Idle,
            Directive::Ranged { .. } => AimMode::Ranged,
            Directive::MeleeLock { .. } => AimMode::MeleeLock,
        }
    }

    pub fn aim_point(&self) -> Option<DVec2> {
        match self {
            Directive::Idle { .. } => None,
            Directive::Ranged { aim_point, .. } | Directive::MeleeLock { aim_point, .. } => {
                Some(*aim_point)
            }
        }
    }

    pub fn move_vector(&self) -> Option<DVec2> {
        match self {
            Directive::Idle { evasion, .. } => *evasion,
            Directive::Ranged { .. } => None,
            Directive::MeleeLock { move_vector, .. } => Some(*move_vector),
        }
    }

    pub fn immediate(&self) -> bool {
        match self {
            Directive::Idle { immediate, .. }
            | Directive::Ranged { immediate, .. }
            | Directive::MeleeLock { immediate, .. } => *immediate,
        }
    }
}

impl Default for Directive {
    fn default() -> Self {
        Directive::idle()
    }
}

/// Target information for the overlay HUD, published alongside a ranged
/// directive when a player target is held.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HudInfo {
    pub target_name: String,
    /// World distance to the target (units).
    pub distance: f64,
    /// Bearing from observer to target (radians).
    pub direction: f64,
    pub helmet_level: u8,
    pub chest_level: u8,
    pub backpack_level: u8,
}

/// Everything one tick produces for downstream collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickOutput {
    pub directive: Directive,
    pub hud: Option<HudInfo>,
}
