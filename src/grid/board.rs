//! Occupancy map for a radius-bounded hexagonal board
//!
//! The board tracks which unit stands on which cell. It knows nothing about
//! unit stats or health; that lives in the combat layer. Invariants: each
//! cell holds at most one occupant, and each occupant stands on exactly one
//! cell or none.

use std::collections::HashMap;

use crate::core::error::{CoreError, Result};
use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

/// Hexagonal board bounded by a radius around the origin
#[derive(Debug, Clone, Default)]
pub struct HexBoard {
    radius: u32,
    occupants: HashMap<HexCoord, UnitId>,
    positions: HashMap<UnitId, HexCoord>,
}

impl HexBoard {
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            occupants: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Whether a coordinate lies on the board
    pub fn contains(&self, coord: HexCoord) -> bool {
        HexCoord::origin().distance(&coord) <= self.radius
    }

    pub fn occupant_at(&self, coord: HexCoord) -> Option<UnitId> {
        self.occupants.get(&coord).copied()
    }

    pub fn position_of(&self, unit: UnitId) -> Option<HexCoord> {
        self.positions.get(&unit).copied()
    }

    /// On the board and unoccupied
    pub fn is_free(&self, coord: HexCoord) -> bool {
        self.contains(coord) && !self.occupants.contains_key(&coord)
    }

    /// Place a unit on an empty cell
    pub fn place(&mut self, unit: UnitId, coord: HexCoord) -> Result<()> {
        if !self.contains(coord) {
            return Err(CoreError::OutOfBounds(coord));
        }
        if self.occupants.contains_key(&coord) {
            return Err(CoreError::CellOccupied(coord));
        }
        if self.positions.contains_key(&unit) {
            return Err(CoreError::UnitAlreadyPlaced(unit));
        }
        self.occupants.insert(coord, unit);
        self.positions.insert(unit, coord);
        Ok(())
    }

    /// Remove a unit from the board; returns the vacated cell
    pub fn remove(&mut self, unit: UnitId) -> Option<HexCoord> {
        let coord = self.positions.remove(&unit)?;
        self.occupants.remove(&coord);
        Some(coord)
    }

    /// Move a placed unit to a new cell
    ///
    /// Fails when the unit is not placed, the destination is off the board,
    /// or the destination is occupied.
    pub fn relocate(&mut self, unit: UnitId, dest: HexCoord) -> Result<()> {
        let from = self
            .positions
            .get(&unit)
            .copied()
            .ok_or(CoreError::UnitNotPlaced(unit))?;
        if !self.contains(dest) {
            return Err(CoreError::OutOfBounds(dest));
        }
        if from == dest {
            return Ok(());
        }
        if self.occupants.contains_key(&dest) {
            return Err(CoreError::CellOccupied(dest));
        }
        self.occupants.remove(&from);
        self.occupants.insert(dest, unit);
        self.positions.insert(unit, dest);
        Ok(())
    }

    /// All unoccupied cells on the board
    pub fn free_cells(&self) -> Vec<HexCoord> {
        HexCoord::origin()
            .area(self.radius)
            .into_iter()
            .filter(|c| !self.occupants.contains_key(c))
            .collect()
    }

    /// All occupied cells with their occupants
    pub fn occupied_cells(&self) -> Vec<(HexCoord, UnitId)> {
        self.occupants.iter().map(|(&c, &u)| (c, u)).collect()
    }

    /// Occupied cells within `radius` hexes of an origin cell
    pub fn occupied_within(&self, origin: HexCoord, radius: u32) -> Vec<(HexCoord, UnitId)> {
        self.occupants
            .iter()
            .filter(|(c, _)| origin.distance(c) <= radius)
            .map(|(&c, &u)| (c, u))
            .collect()
    }

    /// Free cells adjacent to a coordinate
    pub fn free_neighbors(&self, coord: HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|c| self.is_free(*c))
            .collect()
    }
}
