//! Hexfray - real-time simulation core for a hex-grid auto-battler
//!
//! A fixed-rate tick scheduler drives turn-phase progression, per-tick
//! combat resolution, grid-constrained movement, and behavior-driven unit
//! AI. This crate is the engine only; presentation, networking, and card
//! data live in the layers above it.

pub mod ai;
pub mod combat;
pub mod core;
pub mod grid;
pub mod phase;
pub mod scheduler;
