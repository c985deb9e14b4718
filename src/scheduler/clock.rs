//! Clock abstraction behind the tick loop
//!
//! The production scheduler runs against `WallClock` on a dedicated thread.
//! Deterministic tests run the identical tick algorithm against
//! `VirtualClock`, advancing time by hand and calling `tick()` directly.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of monotonic simulation time
///
/// Time is expressed as a `Duration` since the clock's epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;

    /// Block (or simulate blocking) for the given duration
    fn sleep(&self, duration: Duration);
}

/// Real monotonic clock anchored at construction time
#[derive(Debug)]
pub struct WallClock {
    epoch: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Manually advanced clock for deterministic tests
///
/// `sleep` advances time instead of blocking, so a loop driven by this clock
/// runs as fast as the host allows while observing the same timestamps it
/// would under a wall clock.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Mutex<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta`
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
