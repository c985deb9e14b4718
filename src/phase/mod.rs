//! Turn sequencing and phase lifecycle

pub mod controller;
pub mod sequencer;

pub use controller::{Participant, PhaseEvent, PhaseState, TransitionHook, TurnPhaseController};
pub use sequencer::{build_sequence, Turn, TurnColor};
