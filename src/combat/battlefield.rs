//! Shared battle state: the board plus every unit on it
//!
//! External layers (API, UI adapters) and the resolver share a
//! `Arc<Mutex<Battlefield>>`; scheduled movement steps and engagement
//! callbacks lock it briefly on the scheduler thread.

use std::collections::HashMap;

use crate::core::error::{CoreError, Result};
use crate::core::types::{PlayerId, UnitId};
use crate::combat::orders::{Order, OrderGoal};
use crate::combat::unit::CombatUnit;
use crate::grid::board::HexBoard;
use crate::grid::hex::HexCoord;

#[derive(Debug)]
pub struct Battlefield {
    pub board: HexBoard,
    pub units: HashMap<UnitId, CombatUnit>,
}

impl Battlefield {
    pub fn new(board_radius: u32) -> Self {
        Self {
            board: HexBoard::new(board_radius),
            units: HashMap::new(),
        }
    }

    /// Add a unit to the battle, placing it on the board
    ///
    /// The spawn cell becomes the unit's home for return-to-base behavior
    /// and phase resets.
    pub fn spawn(&mut self, mut unit: CombatUnit, at: HexCoord) -> Result<UnitId> {
        self.board.place(unit.id, at)?;
        unit.coord = Some(at);
        unit.home = Some(at);
        let id = unit.id;
        self.units.insert(id, unit);
        Ok(id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&CombatUnit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit> {
        self.units.get_mut(&id)
    }

    /// Living units, sorted by id for deterministic iteration
    pub fn living_units(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.is_alive())
            .map(|u| u.id)
            .collect();
        ids.sort();
        ids
    }

    /// Units owned by a player (dead and alive), sorted by id
    pub fn units_of(&self, owner: PlayerId) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.owner == owner)
            .map(|u| u.id)
            .collect();
        ids.sort();
        ids
    }

    /// Living enemies of `owner` that are on the board, with their cells
    pub fn enemies_of(&self, owner: PlayerId) -> Vec<(UnitId, HexCoord)> {
        let mut hits: Vec<(UnitId, HexCoord)> = self
            .units
            .values()
            .filter(|u| u.owner != owner && u.is_alive())
            .filter_map(|u| u.coord.map(|c| (u.id, c)))
            .collect();
        hits.sort_by_key(|(id, _)| *id);
        hits
    }

    /// Living allies of `owner` (excluding `except`) on the board
    pub fn allies_of(&self, owner: PlayerId, except: UnitId) -> Vec<(UnitId, HexCoord)> {
        let mut hits: Vec<(UnitId, HexCoord)> = self
            .units
            .values()
            .filter(|u| u.owner == owner && u.id != except && u.is_alive())
            .filter_map(|u| u.coord.map(|c| (u.id, c)))
            .collect();
        hits.sort_by_key(|(id, _)| *id);
        hits
    }

    /// Write a manual order into a unit's pending-order slot
    ///
    /// Overwrites any order that has not been picked up yet. Fails for
    /// unknown or dead units, and for attack orders aimed at a dead target.
    pub fn issue_order(&mut self, unit: UnitId, goal: OrderGoal) -> Result<()> {
        if let OrderGoal::Attack(target) = goal {
            let alive = self.units.get(&target).map(|t| t.is_alive()).unwrap_or(false);
            if !alive {
                return Err(CoreError::InvalidOrder(format!(
                    "attack target {target:?} is missing or dead"
                )));
            }
        }
        let unit = self
            .units
            .get_mut(&unit)
            .ok_or(CoreError::UnitNotFound(unit))?;
        if !unit.is_alive() {
            return Err(CoreError::InvalidOrder(format!(
                "unit {:?} is dead",
                unit.id
            )));
        }
        unit.pending_order = Some(Order::new(goal));
        Ok(())
    }
}
