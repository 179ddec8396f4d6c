//! Real-time targeting decision engine.
//!
//! Each tick the engine reads a [`skirmish_core::snapshot::WorldSnapshot`],
//! selects a target, predicts where it will be when a projectile or melee
//! strike could connect, checks for a clear line of effect, and publishes
//! a compact [`skirmish_core::directive::Directive`] for downstream
//! actuation and rendering collaborators. The engine computes intent
//! only; it never moves the observer or dispatches input.

pub mod engine;
pub mod error;
pub mod session;
pub mod systems;

pub use engine::TargetingEngine;
pub use error::TickError;
