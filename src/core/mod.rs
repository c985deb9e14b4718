//! Core types, errors, and configuration shared by every subsystem

pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{CoreError, Result};
pub use types::{AttackKind, EventId, PlayerId, UnitId};
