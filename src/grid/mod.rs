//! Hex board: coordinates, occupancy, and routing

pub mod board;
pub mod hex;
pub mod pathfinding;

pub use board::HexBoard;
pub use hex::HexCoord;
pub use pathfinding::find_path;
