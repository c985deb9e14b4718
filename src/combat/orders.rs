//! Manual orders issued by an external controller
//!
//! An order occupies a unit's single pending-order slot and takes priority
//! over AI control for the tick in which it is processed. Move and attack
//! orders complete as soon as the motion/engagement is initiated; arrival
//! and follow-up strikes proceed asynchronously via scheduled events.

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

/// What the order asks the unit to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderGoal {
    /// Walk to a cell
    Move(HexCoord),
    /// Engage a target: re-attack at cadence, closing distance when out of
    /// range, until the target dies or becomes unreachable
    Attack(UnitId),
    /// Swap behavior tags; completes immediately
    SetBehavior {
        movement: Option<String>,
        combat: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    Pending,
    Executing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub goal: OrderGoal,
    pub state: OrderState,
}

impl Order {
    pub fn new(goal: OrderGoal) -> Self {
        Self {
            goal,
            state: OrderState::Pending,
        }
    }

    pub fn move_to(dest: HexCoord) -> Self {
        Self::new(OrderGoal::Move(dest))
    }

    pub fn attack(target: UnitId) -> Self {
        Self::new(OrderGoal::Attack(target))
    }

    pub fn set_behavior(movement: Option<String>, combat: Option<String>) -> Self {
        Self::new(OrderGoal::SetBehavior { movement, combat })
    }
}
