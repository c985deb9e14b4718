//! Fixed-rate tick loop
//!
//! One dedicated thread drives the loop: every frame it ticks each registered
//! component, fires due scheduled events, then sleeps the rest of the frame
//! budget. Component ticks and event callbacks run serially on that thread;
//! the registry and event map are mutex-guarded because registration,
//! cancellation, and order issuing arrive from other threads.
//!
//! Failures are isolated per component and per event: a panic removes the
//! offender, logs it, and never crosses the tick boundary. The only fatal
//! condition is a panic in the loop machinery itself, which records a fault
//! and halts the loop.

use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::core::config::SimulationConfig;
use crate::core::types::EventId;
use crate::scheduler::clock::{Clock, WallClock};
use crate::scheduler::component::TickComponent;
use crate::scheduler::events::{EventCallback, ScheduledEvent};

/// Rolling throughput counters
#[derive(Debug, Default)]
struct LoopStats {
    ticks: u64,
    last_report_tick: u64,
    last_report_at: Duration,
}

struct SchedulerState {
    components: Mutex<Vec<Box<dyn TickComponent>>>,
    component_ids: Mutex<HashSet<String>>,
    events: Mutex<HashMap<EventId, ScheduledEvent>>,
    /// Ids cancelled while their callback was executing; consulted before a
    /// recurring event reinserts itself
    cancelled_in_flight: Mutex<HashSet<EventId>>,
    next_event_id: AtomicU64,
    running: AtomicBool,
    paused: AtomicBool,
    fault: Mutex<Option<String>>,
    /// Delta-time anchor; `None` after start/resume so the next tick sees a
    /// zero delta instead of one huge simulated step
    last_tick: Mutex<Option<Duration>>,
    stats: Mutex<LoopStats>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cheap cloneable handle for scheduling, cancellation, registration, and
/// pause control from any thread
#[derive(Clone)]
pub struct SchedulerHandle {
    clock: Arc<dyn Clock>,
    state: Arc<SchedulerState>,
    tick_interval: Duration,
    stats_interval: u64,
}

impl SchedulerHandle {
    /// Current simulation time (duration since the clock epoch)
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Register a component; fails (returns false) on a duplicate id
    pub fn register_component(&self, component: Box<dyn TickComponent>) -> bool {
        let mut components = guard(&self.state.components);
        let mut ids = guard(&self.state.component_ids);
        let id = component.id().to_string();
        if !ids.insert(id.clone()) {
            tracing::warn!(component = %id, "duplicate component id; registration rejected");
            return false;
        }
        tracing::debug!(component = %id, "component registered");
        components.push(component);
        true
    }

    /// Unregister a component by id; false when no such component exists
    pub fn unregister_component(&self, id: &str) -> bool {
        let mut components = guard(&self.state.components);
        let mut ids = guard(&self.state.component_ids);
        if !ids.remove(id) {
            return false;
        }
        components.retain(|c| c.id() != id);
        true
    }

    pub fn has_component(&self, id: &str) -> bool {
        guard(&self.state.component_ids).contains(id)
    }

    /// Schedule a one-shot event `delay` from now
    ///
    /// The event fires no earlier than now + delay, during some tick's
    /// event phase, never synchronously inside this call.
    pub fn schedule_event(&self, delay: Duration, callback: EventCallback) -> EventId {
        self.schedule_internal(delay, None, callback)
    }

    /// Schedule a recurring event: first firing after `delay`, then every
    /// `interval` until the callback returns false or the event is cancelled
    pub fn schedule_recurring(
        &self,
        delay: Duration,
        interval: Duration,
        callback: EventCallback,
    ) -> EventId {
        self.schedule_internal(delay, Some(interval), callback)
    }

    fn schedule_internal(
        &self,
        delay: Duration,
        interval: Option<Duration>,
        callback: EventCallback,
    ) -> EventId {
        let id = EventId(self.state.next_event_id.fetch_add(1, Ordering::Relaxed));
        let fire_at = self.clock.now() + delay;
        let event = ScheduledEvent::new(id, fire_at, interval, callback);
        guard(&self.state.events).insert(id, event);
        id
    }

    /// Deactivate a scheduled event
    ///
    /// Prevents all future firings; an execution already in flight on the
    /// loop thread is not interrupted. Returns true when a pending event was
    /// found and deactivated.
    pub fn cancel_event(&self, id: EventId) -> bool {
        {
            let mut events = guard(&self.state.events);
            if let Some(event) = events.get_mut(&id) {
                let was_active = event.active;
                event.active = false;
                return was_active;
            }
        }
        // Possibly executing right now; make sure a recurrence does not
        // bring it back.
        guard(&self.state.cancelled_in_flight).insert(id);
        false
    }

    /// Rewrite a pending event's execution time to now (fast-forward)
    pub fn hasten_event(&self, id: EventId) -> bool {
        let now = self.clock.now();
        let mut events = guard(&self.state.events);
        match events.get_mut(&id) {
            Some(event) if event.active => {
                event.fire_at = now;
                true
            }
            _ => false,
        }
    }

    pub fn is_event_scheduled(&self, id: EventId) -> bool {
        guard(&self.state.events)
            .get(&id)
            .map(|e| e.active)
            .unwrap_or(false)
    }

    /// Soft-pause: the loop keeps polling but skips tick processing
    pub fn pause(&self) {
        self.state.paused.store(true, Ordering::SeqCst);
    }

    /// Resume after a pause, resetting the delta-time anchor so the first
    /// tick back does not see one huge simulated step
    pub fn resume(&self) {
        self.state.paused.store(false, Ordering::SeqCst);
        *guard(&self.state.last_tick) = None;
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }

    /// Execute exactly one loop iteration without sleeping
    ///
    /// Exposed for deterministic/synchronous testing against a virtual
    /// clock; the background loop calls the same code.
    pub fn tick(&self) {
        if self.is_paused() {
            return;
        }
        let now = self.clock.now();
        let delta = {
            let mut last = guard(&self.state.last_tick);
            let delta = match *last {
                Some(prev) => now.saturating_sub(prev),
                None => Duration::ZERO,
            };
            *last = Some(now);
            delta
        };
        self.run_components(delta);
        self.fire_due_events(now);
        self.update_stats(now);
    }

    /// Tick every registered component once, isolating failures
    ///
    /// Components are taken out of the registry while running so a component
    /// may register or unregister others from within its own tick.
    fn run_components(&self, delta: Duration) {
        let batch = std::mem::take(&mut *guard(&self.state.components));
        let mut survivors = Vec::with_capacity(batch.len());

        for mut component in batch {
            let id = component.id().to_string();
            match catch_unwind(AssertUnwindSafe(|| component.process_tick(delta))) {
                Ok(true) => survivors.push(component),
                Ok(false) => {
                    tracing::debug!(component = %id, "component requested removal");
                    guard(&self.state.component_ids).remove(&id);
                }
                Err(_) => {
                    tracing::warn!(component = %id, "component panicked during tick; removing");
                    guard(&self.state.component_ids).remove(&id);
                }
            }
        }

        let mut components = guard(&self.state.components);
        let ids = guard(&self.state.component_ids);
        // Keep registrations that happened mid-tick, honor unregistrations
        let added = std::mem::take(&mut *components);
        survivors.extend(added);
        survivors.retain(|c| ids.contains(c.id()));
        *components = survivors;
    }

    /// Fire all due events, isolating failures
    ///
    /// Due events are removed from the map before their callbacks run, so a
    /// callback may freely schedule or cancel events. Recurring events
    /// reschedule at fire time + interval; a panicking callback drops its
    /// event.
    fn fire_due_events(&self, now: Duration) {
        let mut due: Vec<ScheduledEvent> = {
            let mut events = guard(&self.state.events);
            // Lazy sweep of cancelled events
            events.retain(|_, ev| ev.active);
            let due_ids: Vec<EventId> = events
                .values()
                .filter(|ev| ev.is_due(now))
                .map(|ev| ev.id)
                .collect();
            due_ids.iter().filter_map(|id| events.remove(id)).collect()
        };
        due.sort_by_key(|ev| (ev.fire_at, ev.id.0));

        for mut event in due {
            let outcome = catch_unwind(AssertUnwindSafe(|| (event.callback)()));
            let cancelled_mid_flight = guard(&self.state.cancelled_in_flight).remove(&event.id);
            match outcome {
                Ok(keep) => {
                    if let (Some(interval), true, false) = (event.interval, keep, cancelled_mid_flight) {
                        event.fire_at += interval;
                        guard(&self.state.events).insert(event.id, event);
                    }
                }
                Err(_) => {
                    tracing::warn!(event = event.id.0, "scheduled event panicked; dropping");
                }
            }
        }

        // Leftover tombstones name events that are neither pending nor
        // executing; they can never fire again.
        guard(&self.state.cancelled_in_flight).clear();
    }

    fn update_stats(&self, now: Duration) {
        let mut stats = guard(&self.state.stats);
        stats.ticks += 1;
        if self.stats_interval == 0 || stats.ticks - stats.last_report_tick < self.stats_interval {
            return;
        }
        let span = now.saturating_sub(stats.last_report_at);
        let rate = if span > Duration::ZERO {
            (stats.ticks - stats.last_report_tick) as f64 / span.as_secs_f64()
        } else {
            0.0
        };
        tracing::debug!(ticks = stats.ticks, rate = format_args!("{rate:.1}"), "scheduler throughput");
        stats.last_report_tick = stats.ticks;
        stats.last_report_at = now;
    }

    /// Body of the dedicated loop thread
    fn run_loop(&self) {
        tracing::info!(interval = ?self.tick_interval, "tick loop started");
        while self.state.running.load(Ordering::SeqCst) {
            let frame_start = self.clock.now();
            if catch_unwind(AssertUnwindSafe(|| self.tick())).is_err() {
                // Per-component/per-event panics are already isolated; this
                // is the loop machinery itself failing.
                *guard(&self.state.fault) = Some("tick loop panicked".to_string());
                self.state.running.store(false, Ordering::SeqCst);
                tracing::error!("unrecoverable scheduler failure; halting loop");
                break;
            }
            let elapsed = self.clock.now().saturating_sub(frame_start);
            if elapsed < self.tick_interval {
                self.clock.sleep(self.tick_interval - elapsed);
            }
        }
        tracing::info!("tick loop stopped");
    }
}

/// Top-level fixed-rate scheduler owning the loop thread
pub struct TickScheduler {
    handle: SchedulerHandle,
    stop_timeout: Duration,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl TickScheduler {
    /// Production scheduler driven by the wall clock
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_clock(config, Arc::new(WallClock::new()))
    }

    /// Scheduler over an injected clock (virtual clock for deterministic tests)
    pub fn with_clock(config: &SimulationConfig, clock: Arc<dyn Clock>) -> Self {
        let state = SchedulerState {
            components: Mutex::new(Vec::new()),
            component_ids: Mutex::new(HashSet::new()),
            events: Mutex::new(HashMap::new()),
            cancelled_in_flight: Mutex::new(HashSet::new()),
            next_event_id: AtomicU64::new(1),
            running: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            fault: Mutex::new(None),
            last_tick: Mutex::new(None),
            stats: Mutex::new(LoopStats::default()),
        };
        Self {
            handle: SchedulerHandle {
                clock,
                state: Arc::new(state),
                tick_interval: config.tick_interval(),
                stats_interval: config.stats_interval,
            },
            stop_timeout: config.stop_timeout,
            thread: Mutex::new(None),
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Spawn the loop thread; returns false (and does nothing) when the
    /// scheduler is already running
    pub fn start(&self) -> bool {
        let state = &self.handle.state;
        if state.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("start() called while scheduler already running");
            return false;
        }
        *guard(&state.fault) = None;
        *guard(&state.last_tick) = None;

        let loop_handle = self.handle.clone();
        let spawned = std::thread::Builder::new()
            .name("hexfray-tick".to_string())
            .spawn(move || loop_handle.run_loop());
        match spawned {
            Ok(join_handle) => {
                *guard(&self.thread) = Some(join_handle);
                true
            }
            Err(e) => {
                state.running.store(false, Ordering::SeqCst);
                *guard(&state.fault) = Some(format!("failed to spawn loop thread: {e}"));
                tracing::error!(error = %e, "failed to spawn tick loop thread");
                false
            }
        }
    }

    /// Signal the loop to exit and join with a bounded timeout
    ///
    /// Safe to call when already stopped. Exceeding the timeout abandons the
    /// thread (best effort, not a hard failure).
    pub fn stop(&self) {
        self.handle.state.running.store(false, Ordering::SeqCst);
        let Some(join_handle) = guard(&self.thread).take() else {
            return;
        };
        let deadline = Instant::now() + self.stop_timeout;
        while !join_handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        if join_handle.is_finished() {
            let _ = join_handle.join();
        } else {
            tracing::warn!(timeout = ?self.stop_timeout, "tick loop did not exit in time; abandoning thread");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.state.running.load(Ordering::SeqCst)
    }

    /// The fatal-error state, set only when the loop itself failed
    pub fn fault(&self) -> Option<String> {
        guard(&self.handle.state.fault).clone()
    }

    pub fn pause(&self) {
        self.handle.pause();
    }

    pub fn resume(&self) {
        self.handle.resume();
    }

    /// Execute one loop iteration synchronously (testing)
    pub fn tick(&self) {
        self.handle.tick();
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::clock::VirtualClock;
    use std::sync::atomic::AtomicUsize;

    struct CountingComponent {
        id: String,
        count: Arc<AtomicUsize>,
        keep: bool,
    }

    impl TickComponent for CountingComponent {
        fn id(&self) -> &str {
            &self.id
        }

        fn process_tick(&mut self, _delta: Duration) -> bool {
            self.count.fetch_add(1, Ordering::SeqCst);
            self.keep
        }
    }

    fn counting(id: &str, count: &Arc<AtomicUsize>) -> Box<CountingComponent> {
        Box::new(CountingComponent {
            id: id.to_string(),
            count: count.clone(),
            keep: true,
        })
    }

    fn test_scheduler() -> (TickScheduler, Arc<VirtualClock>) {
        let clock = Arc::new(VirtualClock::new());
        let scheduler = TickScheduler::with_clock(&SimulationConfig::default(), clock.clone());
        (scheduler, clock)
    }

    #[test]
    fn test_register_duplicate_id_fails() {
        let (scheduler, _clock) = test_scheduler();
        let count = Arc::new(AtomicUsize::new(0));

        assert!(scheduler.handle().register_component(counting("a", &count)));
        assert!(!scheduler.handle().register_component(counting("a", &count)));
    }

    #[test]
    fn test_unregister_component() {
        let (scheduler, _clock) = test_scheduler();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.handle();

        handle.register_component(counting("a", &count));
        assert!(handle.unregister_component("a"));
        assert!(!handle.unregister_component("a"));

        scheduler.tick();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_component_ticked_each_cycle() {
        let (scheduler, _clock) = test_scheduler();
        let count = Arc::new(AtomicUsize::new(0));
        scheduler.handle().register_component(counting("a", &count));

        scheduler.tick();
        scheduler.tick();
        scheduler.tick();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_component_returning_false_auto_unregisters() {
        let (scheduler, _clock) = test_scheduler();
        let count = Arc::new(AtomicUsize::new(0));
        scheduler.handle().register_component(Box::new(CountingComponent {
            id: "once".to_string(),
            count: count.clone(),
            keep: false,
        }));

        scheduler.tick();
        scheduler.tick();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!scheduler.handle().has_component("once"));
    }

    #[test]
    fn test_panicking_component_removed_siblings_survive() {
        struct PanickingComponent;
        impl TickComponent for PanickingComponent {
            fn id(&self) -> &str {
                "bad"
            }
            fn process_tick(&mut self, _delta: Duration) -> bool {
                panic!("boom");
            }
        }

        let (scheduler, _clock) = test_scheduler();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.handle();
        handle.register_component(Box::new(PanickingComponent));
        handle.register_component(counting("good", &count));

        scheduler.tick();
        // Sibling still ran in the same cycle
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!handle.has_component("bad"));

        scheduler.tick();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_delay_event_fires_next_tick_not_synchronously() {
        let (scheduler, _clock) = test_scheduler();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();

        scheduler.handle().schedule_event(
            Duration::ZERO,
            Box::new(move || {
                fired2.fetch_add(1, Ordering::SeqCst);
                false
            }),
        );
        // Not fired synchronously by schedule_event
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        scheduler.tick();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        scheduler.tick();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_fires_no_earlier_than_delay() {
        let (scheduler, clock) = test_scheduler();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();

        scheduler.handle().schedule_event(
            Duration::from_millis(100),
            Box::new(move || {
                fired2.fetch_add(1, Ordering::SeqCst);
                false
            }),
        );

        clock.advance(Duration::from_millis(50));
        scheduler.tick();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        clock.advance(Duration::from_millis(50));
        scheduler.tick();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recurring_event_reschedules() {
        let (scheduler, clock) = test_scheduler();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();

        scheduler.handle().schedule_recurring(
            Duration::from_millis(10),
            Duration::from_millis(10),
            Box::new(move || {
                fired2.fetch_add(1, Ordering::SeqCst);
                true
            }),
        );

        for _ in 0..5 {
            clock.advance(Duration::from_millis(10));
            scheduler.tick();
        }
        assert_eq!(fired.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_recurring_event_stops_when_callback_declines() {
        let (scheduler, clock) = test_scheduler();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();

        scheduler.handle().schedule_recurring(
            Duration::from_millis(10),
            Duration::from_millis(10),
            Box::new(move || fired2.fetch_add(1, Ordering::SeqCst) < 2),
        );

        for _ in 0..6 {
            clock.advance(Duration::from_millis(10));
            scheduler.tick();
        }
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_cancel_event() {
        let (scheduler, clock) = test_scheduler();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();

        let id = scheduler.handle().schedule_event(
            Duration::from_millis(10),
            Box::new(move || {
                fired2.fetch_add(1, Ordering::SeqCst);
                false
            }),
        );
        assert!(scheduler.handle().cancel_event(id));
        assert!(!scheduler.handle().cancel_event(id));

        clock.advance(Duration::from_millis(20));
        scheduler.tick();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_event_dropped_others_fire() {
        let (scheduler, clock) = test_scheduler();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();
        let handle = scheduler.handle();

        handle.schedule_recurring(
            Duration::from_millis(10),
            Duration::from_millis(10),
            Box::new(|| panic!("bad event")),
        );
        handle.schedule_recurring(
            Duration::from_millis(10),
            Duration::from_millis(10),
            Box::new(move || {
                fired2.fetch_add(1, Ordering::SeqCst);
                true
            }),
        );

        clock.advance(Duration::from_millis(10));
        scheduler.tick();
        clock.advance(Duration::from_millis(10));
        scheduler.tick();

        // The panicker fired once and was dropped; the healthy one kept going
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hasten_event() {
        let (scheduler, _clock) = test_scheduler();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();

        let id = scheduler.handle().schedule_event(
            Duration::from_secs(3600),
            Box::new(move || {
                fired2.fetch_add(1, Ordering::SeqCst);
                false
            }),
        );
        assert!(scheduler.handle().hasten_event(id));

        scheduler.tick();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pause_skips_processing_resume_recovers() {
        let (scheduler, _clock) = test_scheduler();
        let count = Arc::new(AtomicUsize::new(0));
        scheduler.handle().register_component(counting("a", &count));

        scheduler.pause();
        scheduler.tick();
        scheduler.tick();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        scheduler.resume();
        scheduler.tick();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_start_twice_second_fails() {
        let scheduler = TickScheduler::new(&SimulationConfig::default());
        assert!(scheduler.start());
        assert!(!scheduler.start());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_stop_never_started_is_noop() {
        let scheduler = TickScheduler::new(&SimulationConfig::default());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_loop_thread_ticks_components() {
        let config = SimulationConfig {
            tick_rate: 200,
            ..Default::default()
        };
        let scheduler = TickScheduler::new(&config);
        let count = Arc::new(AtomicUsize::new(0));
        scheduler.handle().register_component(counting("a", &count));

        assert!(scheduler.start());
        let deadline = Instant::now() + Duration::from_secs(2);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        scheduler.stop();

        assert!(count.load(Ordering::SeqCst) >= 3);
        assert!(scheduler.fault().is_none());
    }
}
