//! Melee engagement session — the lock state that lives across ticks.
//!
//! Held by `TargetingEngine`, not derived from the snapshot.

use skirmish_core::types::EntityId;

/// An active melee lock on a player or interactable object.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementSession {
    /// The locked target.
    pub target_id: EntityId,
    /// Whether the target is an interactable object rather than a player.
    pub is_loot: bool,
    /// Snapshot time at which the lock was acquired (seconds).
    pub started_at: f64,
    /// World distance to the target at the last validation.
    pub last_distance: f64,
}

impl EngagementSession {
    pub fn new(target_id: EntityId, is_loot: bool, started_at: f64) -> Self {
        Self {
            target_id,
            is_loot,
            started_at,
            last_distance: f64::INFINITY,
        }
    }
}
