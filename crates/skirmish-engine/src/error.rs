//! Tick fault taxonomy.

use thiserror::Error;

/// Faults that abort a tick before a decision is reached.
///
/// These are the missing-context class: the snapshot is re-checked next
/// tick, so no retry or state reset is needed. Degenerate geometry is
/// guarded locally in each subsystem and never surfaces here; anything
/// unexpected is caught at the engine's unwind boundary instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TickError {
    /// The snapshot carries no observer entity yet.
    #[error("observer entity missing from snapshot")]
    ObserverMissing,
}
