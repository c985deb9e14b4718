//! Combat resolution: units, damage, interactions, orders, and movement

pub mod battlefield;
pub mod damage;
pub mod hooks;
pub mod interaction;
pub mod motion;
pub mod orders;
pub mod resolver;
pub mod unit;

pub use battlefield::Battlefield;
pub use hooks::{StepEvent, StepHook};
pub use interaction::{Interaction, InteractionKind};
pub use orders::{Order, OrderGoal, OrderState};
pub use resolver::{resolve_attack, InteractionResolver, RESOLVER_COMPONENT_ID};
pub use unit::{CombatUnit, MotionKind, UnitStats};
