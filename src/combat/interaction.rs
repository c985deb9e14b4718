//! Ephemeral combat interactions
//!
//! An interaction is created during a tick (by a manual order or the
//! behavior engine) and consumed before the tick ends. It is never
//! persisted; the queue is cleared every cycle.

use std::time::Duration;

use crate::core::types::{AttackKind, UnitId};
use crate::grid::hex::HexCoord;

/// What an interaction does, as a tagged union per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Attack(AttackKind),
    Ability,
    Area,
    Status,
    Move(HexCoord),
}

/// One source-to-target effect resolved within a single tick
#[derive(Debug, Clone)]
pub struct Interaction {
    pub source: UnitId,
    pub target: UnitId,
    pub kind: InteractionKind,
    pub created_at: Duration,
}

impl Interaction {
    pub fn attack(source: UnitId, target: UnitId, kind: AttackKind, now: Duration) -> Self {
        Self {
            source,
            target,
            kind: InteractionKind::Attack(kind),
            created_at: now,
        }
    }
}
