//! Unit decision-making: primitives, behavior definitions, and evaluation

pub mod behavior;
pub mod context;
pub mod primitives;

pub use behavior::{BehaviorEngine, BehaviorSpec, StepSpec};
pub use context::DecisionContext;
pub use primitives::{Intent, PrimitiveRegistry};
