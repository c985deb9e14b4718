//! Fixed-rate tick scheduler and its event/component plumbing

pub mod clock;
pub mod component;
pub mod events;
pub mod tick;

pub use clock::{Clock, VirtualClock, WallClock};
pub use component::TickComponent;
pub use events::{EventCallback, ScheduledEvent};
pub use tick::{SchedulerHandle, TickScheduler};
