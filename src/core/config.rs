//! Simulation configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact with each other. Collaborating layers (config file
//! loading, the API surface) construct one of these and inject it into the
//! core's constructors; there is no process-wide mutable state.

use std::time::Duration;

/// Configuration for the simulation core
///
/// These values have been tuned for a readable battle pace at the default
/// tick rate. Changing them affects combat pacing, not correctness.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    // === SCHEDULER ===
    /// Target tick rate of the scheduler loop (ticks per second)
    ///
    /// Every registered component gets one `process_tick` call per tick.
    /// The loop sleeps whatever remains of the frame budget after processing.
    pub tick_rate: u32,

    /// Ticks between rolling throughput log lines
    ///
    /// The scheduler reports its effective tick rate every this many ticks.
    /// Larger values mean quieter logs and a smoother average.
    pub stats_interval: u64,

    /// Upper bound on waiting for the loop thread to exit during `stop()`
    ///
    /// Past this, the thread is abandoned (best effort, not a hard failure).
    pub stop_timeout: Duration,

    // === BATTLE ===
    /// How far units can see other units (hexes)
    ///
    /// Drives the `enemy-visible` condition and the ally/enemy snapshots
    /// handed to the behavior engine. Attack range is a per-unit stat and is
    /// always clamped by this.
    pub vision_range: u32,

    /// Scale constant for end-of-phase settlement damage
    ///
    /// A participant who lost its entire roster's health over a phase takes
    /// exactly this much damage to its own health pool; partial losses scale
    /// proportionally and round to the nearest integer.
    pub phase_damage_scale: f32,

    // === DETERMINISM ===
    /// Seed for the behavior engine's random number generator
    ///
    /// Two runs with the same seed, the same board, and a virtual clock make
    /// identical random-walk decisions.
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20,
            stats_interval: 100,
            stop_timeout: Duration::from_secs(2),
            vision_range: 8,
            phase_damage_scale: 30.0,
            rng_seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Duration of one scheduler frame at the configured tick rate
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}
