//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Top-level aiming mode carried by a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AimMode {
    /// No target; the actuator should leave input alone (unless an
    /// evasion vector is supplied).
    #[default]
    Idle,
    /// Aiming a projectile weapon at a predicted intercept point.
    Ranged,
    /// Locked onto a close-range target; movement steers toward it.
    MeleeLock,
}

/// Melee engagement state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockPhase {
    /// Melee engagement not desired or no candidates.
    #[default]
    Idle,
    /// Melee desired, searching for (or out of range of) a target.
    Seeking,
    /// Lock target in range, melee weapon swap requested but not confirmed.
    TransitioningToMelee,
    /// Locked and pursuing with melee equipped.
    Locked,
}

/// Which weapon slot the observer currently has out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquippedSlot {
    #[default]
    Primary,
    Secondary,
    Melee,
    Throwable,
}

/// Obstacle blocking classification from flags and type patterns.
/// `Unknown` falls through to the health heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleClass {
    Blocking,
    NonBlocking,
    Unknown,
}
