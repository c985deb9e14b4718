//! Turn sequence construction
//!
//! A phase runs a fixed alternation of colored turns. Durations are not
//! uniform: the opening and closing turns get the bookend duration, which
//! battle setups typically stretch to give both sides time to settle in and
//! wrap up.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnColor {
    Red,
    Blue,
}

impl TurnColor {
    pub fn other(self) -> Self {
        match self {
            TurnColor::Red => TurnColor::Blue,
            TurnColor::Blue => TurnColor::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub color: TurnColor,
    pub duration: Duration,
}

/// Ordered list of 2·N turns alternating from Red
///
/// The first and last turns use `bookend`, every interior turn uses
/// `interior`. `turns_per_color = 0` yields an empty sequence.
pub fn build_sequence(
    turns_per_color: u32,
    interior: Duration,
    bookend: Duration,
) -> Vec<Turn> {
    let total = turns_per_color as usize * 2;
    let mut turns = Vec::with_capacity(total);
    let mut color = TurnColor::Red;
    for index in 0..total {
        let duration = if index == 0 || index == total - 1 {
            bookend
        } else {
            interior
        };
        turns.push(Turn { color, duration });
        color = color.other();
    }
    turns
}
