//! Stepwise unit movement
//!
//! Without a scheduler, steps apply immediately in sequence. With one, a
//! recurring event advances one hop per firing at the unit's step cadence.
//! Each firing re-reads the unit's current position and re-routes, so a unit
//! displaced by something else mid-walk just keeps heading for the goal.
//! The chain is iterative event scheduling, never call recursion, so long
//! paths cost no stack.

use std::sync::{Arc, Mutex, PoisonError};

use crate::core::error::{CoreError, Result};
use crate::core::types::{EventId, UnitId};
use crate::combat::battlefield::Battlefield;
use crate::combat::hooks::{StepEvent, StepHook};
use crate::combat::unit::{CombatUnit, MotionKind};
use crate::grid::hex::HexCoord;
use crate::grid::pathfinding::find_path;
use crate::scheduler::tick::SchedulerHandle;

/// Apply a whole path immediately (no scheduler involved)
pub fn apply_path(field: &mut Battlefield, unit: UnitId, path: &[HexCoord]) -> Result<()> {
    for &step in path.iter().skip(1) {
        field.board.relocate(unit, step)?;
        if let Some(u) = field.unit_mut(unit) {
            u.coord = Some(step);
        }
    }
    Ok(())
}

/// Cancel a unit's in-flight movement and attack events
///
/// Enforces the one-active-motion-intent rule: anything that starts a new
/// movement or engagement calls this first.
pub fn cancel_motion(unit: &mut CombatUnit, scheduler: &SchedulerHandle) {
    for (_, event) in unit.scheduled.drain() {
        scheduler.cancel_event(event);
    }
}

/// Start scheduled movement toward `goal`
///
/// Cancels any previous motion for the unit, then chains one step per
/// firing at interval = 1 / move_speed. The first step fires one interval
/// from now, never synchronously. Routing toward an occupied goal stops one
/// hop short (used by engagements closing distance).
pub fn begin_movement(
    field: &mut Battlefield,
    world: &Arc<Mutex<Battlefield>>,
    scheduler: &SchedulerHandle,
    unit_id: UnitId,
    goal: HexCoord,
    on_step: Option<Arc<StepHook>>,
) -> Result<EventId> {
    let unit = field
        .unit_mut(unit_id)
        .ok_or(CoreError::UnitNotFound(unit_id))?;
    if unit.coord.is_none() {
        return Err(CoreError::UnitNotPlaced(unit_id));
    }
    cancel_motion(unit, scheduler);
    let interval = unit.step_interval();

    let world = world.clone();
    let event_id = scheduler.schedule_recurring(
        interval,
        interval,
        Box::new(move || advance_step(&world, unit_id, goal, on_step.as_deref())),
    );
    if let Some(unit) = field.unit_mut(unit_id) {
        unit.scheduled.insert(MotionKind::Movement, event_id);
    }
    Ok(event_id)
}

/// One firing of the movement chain; returns false to end the recurrence
fn advance_step(
    world: &Arc<Mutex<Battlefield>>,
    unit_id: UnitId,
    goal: HexCoord,
    on_step: Option<&StepHook>,
) -> bool {
    let mut field = world.lock().unwrap_or_else(PoisonError::into_inner);

    let Some(unit) = field.unit(unit_id) else {
        return false;
    };
    if !unit.is_alive() {
        clear_movement_handle(&mut field, unit_id);
        return false;
    }
    let Some(pos) = unit.coord else {
        clear_movement_handle(&mut field, unit_id);
        return false;
    };
    if pos == goal {
        clear_movement_handle(&mut field, unit_id);
        return false;
    }

    // Re-route from the current position; tolerate concurrent displacement
    let path = find_path(&field.board, pos, goal);
    if path.len() < 2 {
        tracing::debug!(unit = ?unit_id, ?goal, "movement goal unreachable; abandoning walk");
        clear_movement_handle(&mut field, unit_id);
        return false;
    }
    let next = path[1];
    if next == goal && field.board.occupant_at(goal).is_some() {
        // Was routing toward an occupied cell; adjacent counts as arrival
        clear_movement_handle(&mut field, unit_id);
        return false;
    }

    match field.board.relocate(unit_id, next) {
        Ok(()) => {
            if let Some(unit) = field.unit_mut(unit_id) {
                unit.coord = Some(next);
            }
            if let Some(hook) = on_step {
                hook(&StepEvent::Moved { unit: unit_id, to: next });
            }
            true
        }
        // Someone took the cell between routing and stepping; retry on the
        // next firing with a fresh route.
        Err(_) => true,
    }
}

fn clear_movement_handle(field: &mut Battlefield, unit_id: UnitId) {
    if let Some(unit) = field.unit_mut(unit_id) {
        unit.scheduled.remove(&MotionKind::Movement);
    }
}
