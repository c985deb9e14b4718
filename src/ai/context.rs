//! Per-unit environment snapshot handed to behavior evaluation
//!
//! Built fresh once per unit per tick by the resolver; behaviors only ever
//! see this snapshot, never the battlefield itself.

use crate::core::types::{PlayerId, UnitId};
use crate::combat::battlefield::Battlefield;
use crate::combat::unit::CombatUnit;
use crate::grid::hex::HexCoord;

/// What one unit can see and reach this tick
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub unit: UnitId,
    pub owner: PlayerId,
    pub coord: HexCoord,
    pub attack_range: u32,
    pub move_range: u32,
    /// Spawn cell, if the unit still has one
    pub home: Option<HexCoord>,
    /// Living enemies within attack range
    pub enemies_in_range: Vec<(UnitId, HexCoord)>,
    /// Living enemies within vision range (superset of `enemies_in_range`)
    pub visible_enemies: Vec<(UnitId, HexCoord)>,
    /// Living allies within vision range
    pub visible_allies: Vec<(UnitId, HexCoord)>,
    /// Unoccupied cells adjacent to the unit
    pub free_neighbors: Vec<HexCoord>,
    pub has_taken_damage: bool,
}

impl DecisionContext {
    /// Snapshot the battlefield from one unit's point of view
    ///
    /// Returns `None` for units that are dead or off the board.
    pub fn snapshot(field: &Battlefield, unit: &CombatUnit, vision_range: u32) -> Option<Self> {
        if !unit.is_alive() {
            return None;
        }
        let coord = unit.coord?;

        let visible_enemies: Vec<(UnitId, HexCoord)> = field
            .enemies_of(unit.owner)
            .into_iter()
            .filter(|(_, c)| coord.distance(c) <= vision_range)
            .collect();
        let enemies_in_range = visible_enemies
            .iter()
            .filter(|(_, c)| coord.distance(c) <= unit.stats.attack_range)
            .copied()
            .collect();
        let visible_allies = field
            .allies_of(unit.owner, unit.id)
            .into_iter()
            .filter(|(_, c)| coord.distance(c) <= vision_range)
            .collect();

        Some(Self {
            unit: unit.id,
            owner: unit.owner,
            coord,
            attack_range: unit.stats.attack_range,
            move_range: unit.stats.move_range,
            home: unit.home,
            enemies_in_range,
            visible_enemies,
            visible_allies,
            free_neighbors: field.board.free_neighbors(coord),
            has_taken_damage: unit.last_damaged_at.is_some(),
        })
    }

    /// Closest visible enemy, ties broken by id order
    pub fn nearest_enemy(&self) -> Option<(UnitId, HexCoord)> {
        self.visible_enemies
            .iter()
            .min_by_key(|(id, c)| (self.coord.distance(c), *id))
            .copied()
    }

    /// Closest enemy already within attack range
    pub fn nearest_enemy_in_range(&self) -> Option<(UnitId, HexCoord)> {
        self.enemies_in_range
            .iter()
            .min_by_key(|(id, c)| (self.coord.distance(c), *id))
            .copied()
    }

    /// Closest visible ally
    pub fn nearest_ally(&self) -> Option<(UnitId, HexCoord)> {
        self.visible_allies
            .iter()
            .min_by_key(|(id, c)| (self.coord.distance(c), *id))
            .copied()
    }
}
