//! Component seam between the tick loop and the subsystems it drives

use std::time::Duration;

/// A subsystem ticked once per scheduler frame
///
/// `process_tick` returns `false` to request removal from the scheduler; a
/// panic inside it is caught at the scheduler boundary and also removes the
/// component. Either way, sibling components still run in the same cycle.
pub trait TickComponent: Send {
    /// Stable identifier; registration rejects duplicates
    fn id(&self) -> &str;

    /// Advance the component by `delta` of simulated time
    fn process_tick(&mut self, delta: Duration) -> bool;
}
