//! Scheduled event records
//!
//! Events live in the scheduler's event map until they fire (one-shot) or
//! are cancelled. Cancellation deactivates; the map is swept lazily at the
//! next due-collection pass.

use std::time::Duration;

use crate::core::types::EventId;

/// Callback fired when a scheduled event comes due
///
/// Returning `false` from a recurring callback stops the recurrence; the
/// return value of a one-shot callback is ignored. Parameters the caller
/// needs travel as closure captures.
pub type EventCallback = Box<dyn FnMut() -> bool + Send>;

/// A scheduled (possibly recurring) callback
pub struct ScheduledEvent {
    pub id: EventId,
    pub callback: EventCallback,
    /// Absolute execution time (duration since the scheduler's clock epoch)
    pub fire_at: Duration,
    /// Recurring events reschedule at fire_at + interval after each firing
    pub interval: Option<Duration>,
    /// Cleared by cancellation; inactive events are swept, never fired
    pub active: bool,
}

impl ScheduledEvent {
    pub fn new(id: EventId, fire_at: Duration, interval: Option<Duration>, callback: EventCallback) -> Self {
        Self {
            id,
            callback,
            fire_at,
            interval,
            active: true,
        }
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.active && self.fire_at <= now
    }
}

impl std::fmt::Debug for ScheduledEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledEvent")
            .field("id", &self.id)
            .field("fire_at", &self.fire_at)
            .field("interval", &self.interval)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_due() {
        let ev = ScheduledEvent::new(
            EventId(1),
            Duration::from_millis(100),
            None,
            Box::new(|| false),
        );
        assert!(!ev.is_due(Duration::from_millis(99)));
        assert!(ev.is_due(Duration::from_millis(100)));
        assert!(ev.is_due(Duration::from_millis(200)));
    }

    #[test]
    fn test_inactive_event_never_due() {
        let mut ev = ScheduledEvent::new(EventId(1), Duration::ZERO, None, Box::new(|| false));
        ev.active = false;
        assert!(!ev.is_due(Duration::from_secs(10)));
    }
}
