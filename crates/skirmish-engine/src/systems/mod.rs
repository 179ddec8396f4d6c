//! Decision subsystems composed by the engagement state machine.

pub mod hazard;
pub mod history;
pub mod targeting;
pub mod trajectory;
pub mod visibility;
