use thiserror::Error;

use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Unit not placed on the board: {0:?}")]
    UnitNotPlaced(UnitId),

    #[error("Unit already placed on the board: {0:?}")]
    UnitAlreadyPlaced(UnitId),

    #[error("Cell already occupied: {0:?}")]
    CellOccupied(HexCoord),

    #[error("Coordinate outside the board: {0:?}")]
    OutOfBounds(HexCoord),

    #[error("Unknown behavior primitive: {0}")]
    UnknownPrimitive(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Phase error: {0}")]
    PhaseError(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
