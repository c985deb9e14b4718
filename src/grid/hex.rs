//! Hex coordinate system for the battle board (axial coordinates)
//!
//! Uses axial coordinates (q, r) for easy neighbor calculation. The third
//! cube coordinate s is derived, never stored.

use serde::{Deserialize, Serialize};

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn origin() -> Self {
        Self { q: 0, r: 0 }
    }

    /// Cube coordinate s (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Hex distance: (|dq| + |dr| + |ds|) / 2
    ///
    /// Equivalent to max(|dq|, |dr|, |ds|).
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get all 6 neighboring hex coordinates
    pub fn neighbors(&self) -> [HexCoord; 6] {
        [
            HexCoord::new(self.q + 1, self.r),
            HexCoord::new(self.q + 1, self.r - 1),
            HexCoord::new(self.q, self.r - 1),
            HexCoord::new(self.q - 1, self.r),
            HexCoord::new(self.q - 1, self.r + 1),
            HexCoord::new(self.q, self.r + 1),
        ]
    }

    /// All hexes within `radius` of self (inclusive)
    ///
    /// Contains exactly 3r² + 3r + 1 coordinates for radius r.
    pub fn area(&self, radius: u32) -> Vec<HexCoord> {
        let radius = radius as i32;
        let mut results = Vec::with_capacity((3 * radius * radius + 3 * radius + 1) as usize);
        for q in -radius..=radius {
            for r in (-radius).max(-q - radius)..=radius.min(-q + radius) {
                results.push(HexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }
}
