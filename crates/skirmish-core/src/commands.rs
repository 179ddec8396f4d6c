//! Action requests emitted by the engine toward the input dispatcher.
//!
//! Requests are appended in decision order during a tick and drained by
//! the host; the engine never dispatches input itself.

use serde::{Deserialize, Serialize};

/// An abstract input action the engine wants performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionRequest {
    /// Switch the observer to the melee weapon slot.
    EquipMelee,
    /// Press the fire input once.
    Fire,
}
