//! Combat unit state
//!
//! Stat values come from the external card-data layer; the core only reads
//! them through explicit accessors. Runtime combat state (health, pending
//! order, scheduled-event handles, statistics) lives here.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{AttackKind, EventId, PlayerId, UnitId};
use crate::combat::orders::Order;
use crate::grid::hex::HexCoord;

/// Kind of scheduled activity a unit can have in flight
///
/// A unit holds at most one active handle per kind; starting a new movement
/// or engagement cancels whatever was there before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionKind {
    Movement,
    Attack,
}

/// Static stat block for a unit, supplied by the card layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_health: i32,
    pub physical_attack: i32,
    pub magical_attack: i32,
    pub physical_defense: i32,
    pub magical_defense: i32,
    /// Maximum hops a single AI-initiated move may span
    pub move_range: u32,
    /// Hops per second while moving (step cadence = 1 / move_speed)
    pub move_speed: f32,
    pub attack_range: u32,
    /// Attacks per second (cadence = 1 / attack_speed)
    pub attack_speed: f32,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            max_health: 100,
            physical_attack: 10,
            magical_attack: 0,
            physical_defense: 3,
            magical_defense: 3,
            move_range: 3,
            move_speed: 2.0,
            attack_range: 1,
            attack_speed: 1.0,
        }
    }
}

/// A unit participating in combat resolution
#[derive(Debug)]
pub struct CombatUnit {
    pub id: UnitId,
    pub owner: PlayerId,
    /// Current cell, `None` while off the board
    pub coord: Option<HexCoord>,
    /// Spawn cell, used by the return-to-base behavior and phase resets
    pub home: Option<HexCoord>,
    pub health: i32,
    pub stats: UnitStats,
    /// Units with this cleared are skipped by the resolver entirely
    pub can_act: bool,
    pub movement_behavior: String,
    pub combat_behavior: String,
    /// At most one manual order; mutually exclusive with AI control for the
    /// tick in which it is processed
    pub pending_order: Option<Order>,
    /// Active scheduled-event handles, for cancellation
    pub scheduled: HashMap<MotionKind, EventId>,
    pub damage_dealt: u64,
    pub kills: u32,
    pub last_damaged_at: Option<Duration>,
    pub last_attack_at: Option<Duration>,
}

impl CombatUnit {
    pub fn new(owner: PlayerId, stats: UnitStats) -> Self {
        Self {
            id: UnitId::new(),
            owner,
            coord: None,
            home: None,
            health: stats.max_health,
            stats,
            can_act: true,
            movement_behavior: String::new(),
            combat_behavior: String::new(),
            pending_order: None,
            scheduled: HashMap::new(),
            damage_dealt: 0,
            kills: 0,
            last_damaged_at: None,
            last_attack_at: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage, flooring health at zero
    pub fn apply_damage(&mut self, amount: i32, now: Duration) {
        self.health = (self.health - amount.max(0)).max(0);
        self.last_damaged_at = Some(now);
    }

    /// Revive and reset for a new phase: full health, no pending order, no
    /// in-flight motion handles (callers cancel the events themselves)
    pub fn reset_for_phase(&mut self) {
        self.health = self.stats.max_health;
        self.can_act = true;
        self.pending_order = None;
        self.scheduled.clear();
        self.last_damaged_at = None;
        self.last_attack_at = None;
    }

    pub fn attack_power(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Physical => self.stats.physical_attack,
            AttackKind::Magical => self.stats.magical_attack,
        }
    }

    pub fn physical_defense(&self) -> i32 {
        self.stats.physical_defense
    }

    pub fn magical_defense(&self) -> i32 {
        self.stats.magical_defense
    }

    pub fn defense(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Physical => self.physical_defense(),
            AttackKind::Magical => self.magical_defense(),
        }
    }

    /// The attack channel this unit leads with
    pub fn preferred_attack_kind(&self) -> AttackKind {
        if self.stats.magical_attack > self.stats.physical_attack {
            AttackKind::Magical
        } else {
            AttackKind::Physical
        }
    }

    /// Time between consecutive attacks
    pub fn attack_cooldown(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.stats.attack_speed.max(0.01)))
    }

    /// Time between consecutive movement steps
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.stats.move_speed.max(0.01)))
    }

    pub fn off_cooldown(&self, now: Duration) -> bool {
        match self.last_attack_at {
            Some(last) => now.saturating_sub(last) >= self.attack_cooldown(),
            None => true,
        }
    }
}
