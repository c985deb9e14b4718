//! Turn-phase state machine
//!
//! Drives a built turn sequence with one-shot scheduled events: starting a
//! turn schedules the transition that ends it. When the sequence runs out
//! the phase finalizes, billing each participant's health pool for the
//! health their units lost and resetting the units for the next phase.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::combat::battlefield::Battlefield;
use crate::core::config::SimulationConfig;
use crate::core::error::{CoreError, Result};
use crate::core::types::{EventId, PlayerId, UnitId};
use crate::phase::sequencer::{Turn, TurnColor};
use crate::scheduler::tick::SchedulerHandle;

/// One side of the battle and its out-of-battle health pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub id: PlayerId,
    pub color: TurnColor,
    pub health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    TurnActive,
    Finished,
}

/// Fired on turn changes and at phase end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    TurnStarted { index: usize, color: TurnColor },
    Finished,
}

pub type TransitionHook = dyn Fn(&PhaseEvent) + Send + Sync;

struct PhaseInner {
    turns: Vec<Turn>,
    index: usize,
    state: PhaseState,
    ends_at: Duration,
    transition: Option<EventId>,
    participants: Vec<Participant>,
    damage_scale: f32,
    on_transition: Option<Arc<TransitionHook>>,
    started: bool,
}

/// Owns the phase lifecycle for one battle
pub struct TurnPhaseController {
    inner: Arc<Mutex<PhaseInner>>,
    scheduler: SchedulerHandle,
    world: Arc<Mutex<Battlefield>>,
}

fn guard<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TurnPhaseController {
    pub fn new(
        config: &SimulationConfig,
        scheduler: SchedulerHandle,
        world: Arc<Mutex<Battlefield>>,
        turns: Vec<Turn>,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PhaseInner {
                turns,
                index: 0,
                state: PhaseState::TurnActive,
                ends_at: Duration::ZERO,
                transition: None,
                participants,
                damage_scale: config.phase_damage_scale,
                on_transition: None,
                started: false,
            })),
            scheduler,
            world,
        }
    }

    /// Install the hook fired on every turn start and at phase end
    pub fn set_transition_hook(&self, hook: Arc<TransitionHook>) {
        guard(&self.inner).on_transition = Some(hook);
    }

    /// Begin the phase at turn 0
    ///
    /// An empty sequence finalizes immediately. Starting twice fails.
    pub fn start(&self) -> Result<()> {
        let empty = {
            let mut inner = guard(&self.inner);
            if inner.started {
                return Err(CoreError::PhaseError("phase already started".into()));
            }
            inner.started = true;
            inner.turns.is_empty()
        };

        if empty {
            finalize(&self.inner, &self.scheduler, &self.world);
            return Ok(());
        }
        begin_turn(&self.inner, &self.scheduler, &self.world, 0);
        Ok(())
    }

    pub fn state(&self) -> PhaseState {
        guard(&self.inner).state
    }

    /// Color whose turn is running, `None` once finished
    pub fn active_color(&self) -> Option<TurnColor> {
        let inner = guard(&self.inner);
        match inner.state {
            PhaseState::TurnActive => inner.turns.get(inner.index).map(|t| t.color),
            PhaseState::Finished => None,
        }
    }

    pub fn turn_index(&self) -> usize {
        guard(&self.inner).index
    }

    /// Time left in the running turn
    pub fn remaining(&self) -> Duration {
        let inner = guard(&self.inner);
        match inner.state {
            PhaseState::TurnActive => inner.ends_at.saturating_sub(self.scheduler.now()),
            PhaseState::Finished => Duration::ZERO,
        }
    }

    /// Whether a participant may issue manual orders right now
    ///
    /// Only the side whose color is active may command its units.
    pub fn may_issue_orders(&self, participant: PlayerId) -> bool {
        let inner = guard(&self.inner);
        if inner.state != PhaseState::TurnActive {
            return false;
        }
        let Some(turn) = inner.turns.get(inner.index) else {
            return false;
        };
        inner
            .participants
            .iter()
            .any(|p| p.id == participant && p.color == turn.color)
    }

    /// Pull the pending turn transition forward to fire on the next tick
    pub fn accelerate(&self) -> bool {
        let transition = guard(&self.inner).transition;
        match transition {
            Some(event) => self.scheduler.hasten_event(event),
            None => false,
        }
    }

    pub fn participants(&self) -> Vec<Participant> {
        guard(&self.inner).participants.clone()
    }

    pub fn participant_health(&self, id: PlayerId) -> Option<i32> {
        guard(&self.inner)
            .participants
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.health)
    }
}

/// Enter turn `index` and schedule the transition that ends it
fn begin_turn(
    inner: &Arc<Mutex<PhaseInner>>,
    scheduler: &SchedulerHandle,
    world: &Arc<Mutex<Battlefield>>,
    index: usize,
) {
    let (duration, color, hook) = {
        let mut state = guard(inner);
        state.index = index;
        state.state = PhaseState::TurnActive;
        let turn = state.turns[index];
        state.ends_at = scheduler.now() + turn.duration;
        (turn.duration, turn.color, state.on_transition.clone())
    };
    debug!(turn = index, ?color, ?duration, "turn started");

    let inner2 = inner.clone();
    let scheduler2 = scheduler.clone();
    let world2 = world.clone();
    let event = scheduler.schedule_event(
        duration,
        Box::new(move || {
            advance(&inner2, &scheduler2, &world2);
            false
        }),
    );
    guard(inner).transition = Some(event);

    if let Some(hook) = hook {
        hook(&PhaseEvent::TurnStarted { index, color });
    }
}

/// A turn timer fired: move to the next turn or finalize the phase
fn advance(
    inner: &Arc<Mutex<PhaseInner>>,
    scheduler: &SchedulerHandle,
    world: &Arc<Mutex<Battlefield>>,
) {
    let next = {
        let mut state = guard(inner);
        state.transition = None;
        state.index + 1
    };
    if next >= guard(inner).turns.len() {
        finalize(inner, scheduler, world);
    } else {
        begin_turn(inner, scheduler, world, next);
    }
}

/// Close out the phase: bill health pools and reset every unit
fn finalize(
    inner: &Arc<Mutex<PhaseInner>>,
    scheduler: &SchedulerHandle,
    world: &Arc<Mutex<Battlefield>>,
) {
    let (participants, scale, hook) = {
        let state = guard(inner);
        (state.participants.clone(), state.damage_scale, state.on_transition.clone())
    };

    let mut field = guard(world);
    let mut billed = Vec::with_capacity(participants.len());
    for participant in participants {
        let lost = lost_fraction(&field, participant.id);
        let damage = (scale * lost).round() as i32;
        let health = (participant.health - damage).max(0);
        info!(
            participant = participant.id.0,
            lost_fraction = lost,
            damage,
            health,
            "phase finalized for participant"
        );
        billed.push(Participant { health, ..participant });

        for unit_id in field.units_of(participant.id) {
            reset_unit(&mut field, scheduler, unit_id);
        }
    }
    drop(field);

    {
        let mut state = guard(inner);
        state.participants = billed;
        state.state = PhaseState::Finished;
    }
    if let Some(hook) = hook {
        hook(&PhaseEvent::Finished);
    }
}

/// Fraction of total max health this participant's units lost (dead + alive)
fn lost_fraction(field: &Battlefield, owner: PlayerId) -> f32 {
    let mut max_total: i64 = 0;
    let mut current: i64 = 0;
    for id in field.units_of(owner) {
        if let Some(unit) = field.unit(id) {
            max_total += i64::from(unit.stats.max_health);
            current += i64::from(unit.health);
        }
    }
    if max_total == 0 {
        return 0.0;
    }
    (max_total - current) as f32 / max_total as f32
}

/// Cancel a unit's events, revive it, and put it back on its home cell
fn reset_unit(field: &mut Battlefield, scheduler: &SchedulerHandle, unit_id: UnitId) {
    let Some(unit) = field.unit_mut(unit_id) else { return };
    for (_, event) in unit.scheduled.drain() {
        scheduler.cancel_event(event);
    }
    unit.reset_for_phase();
    let home = unit.home;
    let off_board = unit.coord.is_none();

    if off_board {
        if let Some(home) = home {
            if field.board.place(unit_id, home).is_ok() {
                if let Some(unit) = field.unit_mut(unit_id) {
                    unit.coord = Some(home);
                }
            } else if let Some(cell) = field.board.free_neighbors(home).first().copied() {
                // Home was taken while the unit was down
                if field.board.place(unit_id, cell).is_ok() {
                    if let Some(unit) = field.unit_mut(unit_id) {
                        unit.coord = Some(cell);
                    }
                }
            }
        }
    }
}
