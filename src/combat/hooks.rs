//! Notification hooks exposed to presentation layers
//!
//! Fired synchronously on the scheduler thread after each resolved
//! interaction or movement step; handlers should be quick.

use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

/// One observable step of battle progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Attack {
        source: UnitId,
        target: UnitId,
        damage: i32,
        retaliation: bool,
        lethal: bool,
    },
    Moved {
        unit: UnitId,
        to: HexCoord,
    },
}

/// Callback invoked after each step; shared across threads via `Arc`
pub type StepHook = dyn Fn(&StepEvent) + Send + Sync;
