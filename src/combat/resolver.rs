//! Tick-driven interaction resolution
//!
//! The resolver is the one tick component of a battle. Each cycle it picks
//! up manual orders, lets the behavior engine decide for everyone else, and
//! resolves the attack interactions produced this tick. Movement and
//! engagements it initiates run on afterwards as scheduled events; the
//! resolver only starts them.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::ai::behavior::BehaviorEngine;
use crate::ai::context::DecisionContext;
use crate::ai::primitives::Intent;
use crate::combat::battlefield::Battlefield;
use crate::combat::damage;
use crate::combat::hooks::{StepEvent, StepHook};
use crate::combat::interaction::{Interaction, InteractionKind};
use crate::combat::motion::{begin_movement, cancel_motion};
use crate::combat::orders::{Order, OrderGoal, OrderState};
use crate::combat::unit::MotionKind;
use crate::core::config::SimulationConfig;
use crate::core::types::{AttackKind, UnitId};
use crate::grid::hex::HexCoord;
use crate::grid::pathfinding::find_path;
use crate::scheduler::component::TickComponent;
use crate::scheduler::tick::SchedulerHandle;

pub const RESOLVER_COMPONENT_ID: &str = "interaction-resolver";

/// The battle-driving tick component
pub struct InteractionResolver {
    world: Arc<Mutex<Battlefield>>,
    scheduler: SchedulerHandle,
    engine: BehaviorEngine,
    vision_range: u32,
    queue: Vec<Interaction>,
    on_step: Option<Arc<StepHook>>,
}

impl InteractionResolver {
    pub fn new(
        config: &SimulationConfig,
        world: Arc<Mutex<Battlefield>>,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self {
            world,
            scheduler,
            engine: BehaviorEngine::new(config),
            vision_range: config.vision_range,
            queue: Vec::new(),
            on_step: None,
        }
    }

    /// Install the presentation hook fired after each attack or step
    pub fn set_step_hook(&mut self, hook: Arc<StepHook>) {
        self.on_step = Some(hook);
    }

    pub fn engine_mut(&mut self) -> &mut BehaviorEngine {
        &mut self.engine
    }

    fn run_cycle(&mut self, field: &mut Battlefield) {
        let now = self.scheduler.now();

        for unit_id in field.living_units() {
            let Some(unit) = field.unit(unit_id) else { continue };
            if !unit.can_act {
                continue;
            }

            // Manual orders beat AI for the tick they are picked up in
            if let Some(order) = field
                .unit_mut(unit_id)
                .and_then(|u| u.pending_order.take())
            {
                self.execute_order(field, unit_id, order);
                continue;
            }

            self.run_behaviors(field, unit_id, now);
        }

        let interactions = std::mem::take(&mut self.queue);
        for interaction in interactions {
            if let InteractionKind::Attack(kind) = interaction.kind {
                resolve_attack(
                    field,
                    &self.scheduler,
                    now,
                    interaction.source,
                    interaction.target,
                    kind,
                    false,
                    self.on_step.as_deref(),
                );
            }
        }
    }

    fn execute_order(&mut self, field: &mut Battlefield, unit_id: UnitId, mut order: Order) {
        order.state = OrderState::Executing;
        match order.goal {
            OrderGoal::Move(dest) => {
                if let Err(e) =
                    begin_movement(field, &self.world, &self.scheduler, unit_id, dest, self.on_step.clone())
                {
                    warn!(unit = ?unit_id, error = %e, "move order rejected");
                }
            }
            OrderGoal::Attack(target) => {
                self.begin_engagement(field, unit_id, target);
            }
            OrderGoal::SetBehavior { movement, combat } => {
                if let Some(unit) = field.unit_mut(unit_id) {
                    if let Some(tag) = movement {
                        unit.movement_behavior = tag;
                    }
                    if let Some(tag) = combat {
                        unit.combat_behavior = tag;
                    }
                }
            }
        }
        order.state = OrderState::Completed;
    }

    /// Start a recurring engagement: strike when in range and off cooldown,
    /// close one hop otherwise, stop when the target dies or the route dies
    fn begin_engagement(&self, field: &mut Battlefield, source: UnitId, target: UnitId) {
        let Some(unit) = field.unit_mut(source) else { return };
        cancel_motion(unit, &self.scheduler);
        let interval = unit.attack_cooldown();

        let world = self.world.clone();
        let scheduler = self.scheduler.clone();
        let on_step = self.on_step.clone();
        let event_id = self.scheduler.schedule_recurring(
            Duration::ZERO,
            interval,
            Box::new(move || {
                engagement_step(&world, &scheduler, source, target, on_step.as_deref())
            }),
        );
        if let Some(unit) = field.unit_mut(source) {
            unit.scheduled.insert(MotionKind::Attack, event_id);
        }
    }

    /// Evaluate both behavior lists for one unit
    ///
    /// Combat and movement are independent: a unit may strike and start
    /// walking in the same tick. Movement evaluation is skipped while the
    /// unit already has a scheduled walk or engagement in flight; combat
    /// evaluation runs every tick so a unit passing an enemy mid-walk still
    /// trades blows.
    fn run_behaviors(&mut self, field: &mut Battlefield, unit_id: UnitId, now: Duration) {
        let Some(unit) = field.unit(unit_id) else { return };
        let Some(ctx) = DecisionContext::snapshot(field, unit, self.vision_range) else {
            return;
        };
        let movement_tag = unit.movement_behavior.clone();
        let combat_tag = unit.combat_behavior.clone();
        let busy = !unit.scheduled.is_empty();

        if let Some(Intent::Attack(target)) = self.engine.combat_intent(&combat_tag, &ctx) {
            let ready = field
                .unit(unit_id)
                .map(|u| u.off_cooldown(now))
                .unwrap_or(false);
            if ready {
                let kind = field
                    .unit(unit_id)
                    .map(|u| u.preferred_attack_kind())
                    .unwrap_or(AttackKind::Physical);
                self.queue.push(Interaction::attack(unit_id, target, kind, now));
            }
        }

        if busy {
            return;
        }
        if let Some(Intent::Move(goal)) = self.engine.movement_intent(&movement_tag, &ctx) {
            let goal = clamp_to_move_range(field, ctx.coord, goal, ctx.move_range);
            if goal == ctx.coord {
                return;
            }
            if let Err(e) =
                begin_movement(field, &self.world, &self.scheduler, unit_id, goal, self.on_step.clone())
            {
                debug!(unit = ?unit_id, error = %e, "behavior move rejected");
            }
        }
    }
}

impl TickComponent for InteractionResolver {
    fn id(&self) -> &str {
        RESOLVER_COMPONENT_ID
    }

    fn process_tick(&mut self, _delta: Duration) -> bool {
        let world = self.world.clone();
        let mut field = world.lock().unwrap_or_else(PoisonError::into_inner);
        self.run_cycle(&mut field);
        true
    }
}

/// Trim a movement goal so the walk spans at most `move_range` hops
fn clamp_to_move_range(
    field: &Battlefield,
    from: HexCoord,
    goal: HexCoord,
    move_range: u32,
) -> HexCoord {
    if from.distance(&goal) <= move_range {
        return goal;
    }
    let path = find_path(&field.board, from, goal);
    if path.len() < 2 {
        return from;
    }
    let last = (move_range as usize).min(path.len() - 1);
    path[last]
}

/// Resolve one attack: mitigate, apply, record, and retaliate once
///
/// Missing or dead participants make this a silent no-op; interactions are
/// decided earlier in the tick than they resolve, and the world may have
/// moved on. A lethal hit takes the victim off the board and cancels its
/// in-flight events. The victim answers with one counter-hit if the
/// attacker stands in its range and its own cooldown allows, and counters
/// never chain.
#[allow(clippy::too_many_arguments)]
pub fn resolve_attack(
    field: &mut Battlefield,
    scheduler: &SchedulerHandle,
    now: Duration,
    source: UnitId,
    target: UnitId,
    kind: AttackKind,
    is_retaliation: bool,
    on_step: Option<&StepHook>,
) {
    let (amount, source_pos, target_pos) = {
        let Some(attacker) = field.unit(source) else { return };
        let Some(defender) = field.unit(target) else { return };
        if !attacker.is_alive() || !defender.is_alive() {
            return;
        }
        let (Some(sp), Some(tp)) = (attacker.coord, defender.coord) else {
            return;
        };
        (damage::resolve(attacker, defender, kind), sp, tp)
    };

    let lethal = {
        let Some(defender) = field.unit_mut(target) else { return };
        defender.apply_damage(amount, now);
        !defender.is_alive()
    };
    if let Some(attacker) = field.unit_mut(source) {
        attacker.damage_dealt += amount as u64;
        attacker.last_attack_at = Some(now);
        if lethal {
            attacker.kills += 1;
        }
    }

    if lethal {
        field.board.remove(target);
        if let Some(defender) = field.unit_mut(target) {
            defender.coord = None;
            for (_, event) in defender.scheduled.drain() {
                scheduler.cancel_event(event);
            }
        }
    }

    if let Some(hook) = on_step {
        hook(&StepEvent::Attack {
            source,
            target,
            damage: amount,
            retaliation: is_retaliation,
            lethal,
        });
    }

    if is_retaliation || lethal {
        return;
    }
    let counters = field
        .unit(target)
        .map(|defender| {
            defender.can_act
                && defender.off_cooldown(now)
                && target_pos.distance(&source_pos) <= defender.stats.attack_range
        })
        .unwrap_or(false);
    if counters {
        let counter_kind = field
            .unit(target)
            .map(|d| d.preferred_attack_kind())
            .unwrap_or(AttackKind::Physical);
        resolve_attack(field, scheduler, now, target, source, counter_kind, true, on_step);
    }
}

/// One firing of an engagement chain; returns false to end the recurrence
fn engagement_step(
    world: &Arc<Mutex<Battlefield>>,
    scheduler: &SchedulerHandle,
    source: UnitId,
    target: UnitId,
    on_step: Option<&StepHook>,
) -> bool {
    let mut field = world.lock().unwrap_or_else(PoisonError::into_inner);

    let source_state = field
        .unit(source)
        .and_then(|u| if u.is_alive() { u.coord } else { None });
    let Some(source_pos) = source_state else {
        clear_attack_handle(&mut field, source);
        return false;
    };
    let target_state = field
        .unit(target)
        .and_then(|u| if u.is_alive() { u.coord } else { None });
    let Some(target_pos) = target_state else {
        clear_attack_handle(&mut field, source);
        return false;
    };

    let now = scheduler.now();
    let (range, ready, kind) = {
        let Some(unit) = field.unit(source) else { return false };
        (unit.stats.attack_range, unit.off_cooldown(now), unit.preferred_attack_kind())
    };

    if source_pos.distance(&target_pos) <= range {
        if ready {
            resolve_attack(&mut field, scheduler, now, source, target, kind, false, on_step);
        }
        return true;
    }

    // Out of range: close one hop per firing
    let path = find_path(&field.board, source_pos, target_pos);
    if path.len() < 2 {
        debug!(unit = ?source, ?target, "engagement target unreachable; disengaging");
        clear_attack_handle(&mut field, source);
        return false;
    }
    let next = path[1];
    if next == target_pos {
        // Adjacent already; next firing attacks
        return true;
    }
    if field.board.relocate(source, next).is_ok() {
        if let Some(unit) = field.unit_mut(source) {
            unit.coord = Some(next);
        }
        if let Some(hook) = on_step {
            hook(&StepEvent::Moved { unit: source, to: next });
        }
    }
    true
}

fn clear_attack_handle(field: &mut Battlefield, unit_id: UnitId) {
    if let Some(unit) = field.unit_mut(unit_id) {
        unit.scheduled.remove(&MotionKind::Attack);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::unit::{CombatUnit, UnitStats};
    use crate::core::types::PlayerId;
    use crate::scheduler::clock::VirtualClock;
    use crate::scheduler::tick::TickScheduler;

    fn setup() -> (TickScheduler, Arc<VirtualClock>, Arc<Mutex<Battlefield>>) {
        let clock = Arc::new(VirtualClock::new());
        let scheduler = TickScheduler::with_clock(&SimulationConfig::default(), clock.clone());
        let world = Arc::new(Mutex::new(Battlefield::new(8)));
        (scheduler, clock, world)
    }

    fn spawn_with(
        world: &Arc<Mutex<Battlefield>>,
        owner: u32,
        at: HexCoord,
        stats: UnitStats,
    ) -> UnitId {
        let mut field = world.lock().unwrap();
        field
            .spawn(CombatUnit::new(PlayerId(owner), stats), at)
            .unwrap()
    }

    fn spawn(world: &Arc<Mutex<Battlefield>>, owner: u32, at: HexCoord) -> UnitId {
        spawn_with(world, owner, at, UnitStats::default())
    }

    fn install_resolver(
        scheduler: &TickScheduler,
        world: &Arc<Mutex<Battlefield>>,
    ) {
        let resolver = InteractionResolver::new(
            &SimulationConfig::default(),
            world.clone(),
            scheduler.handle(),
        );
        assert!(scheduler.handle().register_component(Box::new(resolver)));
    }

    fn step_clock(scheduler: &TickScheduler, clock: &VirtualClock, millis: u64) {
        clock.advance(Duration::from_millis(millis));
        scheduler.tick();
    }

    #[test]
    fn test_resolve_attack_applies_mitigated_damage() {
        let (scheduler, _clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(1, 0));
        let mut field = world.lock().unwrap();
        // can_act off so the target does not counter
        field.unit_mut(b).unwrap().can_act = false;

        resolve_attack(
            &mut field,
            &scheduler.handle(),
            Duration::ZERO,
            a,
            b,
            AttackKind::Physical,
            false,
            None,
        );

        // 10 attack vs 3 defense
        assert_eq!(field.unit(b).unwrap().health, 93);
        assert_eq!(field.unit(a).unwrap().damage_dealt, 7);
    }

    #[test]
    fn test_retaliation_fires_once_and_never_chains() {
        let (scheduler, _clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(1, 0));
        let mut field = world.lock().unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let seen = events.clone();
        let hook = move |ev: &StepEvent| seen.lock().unwrap().push(*ev);

        resolve_attack(
            &mut field,
            &scheduler.handle(),
            Duration::ZERO,
            a,
            b,
            AttackKind::Physical,
            false,
            Some(&hook),
        );

        // Attacker took a counter-hit; counter did not trigger a counter
        assert_eq!(field.unit(a).unwrap().health, 93);
        let log = events.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(matches!(log[0], StepEvent::Attack { retaliation: false, .. }));
        assert!(matches!(log[1], StepEvent::Attack { retaliation: true, .. }));
    }

    #[test]
    fn test_no_retaliation_out_of_range() {
        let (scheduler, _clock, world) = setup();
        let mut sniper_stats = UnitStats::default();
        sniper_stats.attack_range = 3;
        let a = spawn_with(&world, 1, HexCoord::origin(), sniper_stats);
        let b = spawn(&world, 2, HexCoord::new(3, 0));
        let mut field = world.lock().unwrap();

        resolve_attack(
            &mut field,
            &scheduler.handle(),
            Duration::ZERO,
            a,
            b,
            AttackKind::Physical,
            false,
            None,
        );

        assert_eq!(field.unit(b).unwrap().health, 93);
        assert_eq!(field.unit(a).unwrap().health, 100);
    }

    #[test]
    fn test_lethal_hit_clears_board_and_suppresses_counter() {
        let (scheduler, _clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(1, 0));
        let mut field = world.lock().unwrap();
        field.unit_mut(b).unwrap().health = 1;

        resolve_attack(
            &mut field,
            &scheduler.handle(),
            Duration::ZERO,
            a,
            b,
            AttackKind::Physical,
            false,
            None,
        );

        let dead = field.unit(b).unwrap();
        assert!(!dead.is_alive());
        assert_eq!(dead.coord, None);
        assert_eq!(field.board.occupant_at(HexCoord::new(1, 0)), None);
        assert_eq!(field.unit(a).unwrap().kills, 1);
        assert_eq!(field.unit(a).unwrap().health, 100);
    }

    #[test]
    fn test_attack_on_missing_unit_is_silent() {
        let (scheduler, _clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let mut field = world.lock().unwrap();

        resolve_attack(
            &mut field,
            &scheduler.handle(),
            Duration::ZERO,
            a,
            UnitId::new(),
            AttackKind::Physical,
            false,
            None,
        );
        assert_eq!(field.unit(a).unwrap().damage_dealt, 0);
    }

    #[test]
    fn test_move_order_beats_idle_behavior() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            let unit = field.unit_mut(a).unwrap();
            unit.movement_behavior = "idle".to_string();
            unit.combat_behavior = "ignore".to_string();
            field.issue_order(a, OrderGoal::Move(HexCoord::new(2, 0))).unwrap();
        }

        // Order picked up on the first tick; steps land at 500ms cadence
        step_clock(&scheduler, &clock, 50);
        for _ in 0..4 {
            step_clock(&scheduler, &clock, 500);
        }

        let field = world.lock().unwrap();
        assert_eq!(field.unit(a).unwrap().coord, Some(HexCoord::new(2, 0)));
        assert!(field.unit(a).unwrap().pending_order.is_none());
    }

    #[test]
    fn test_attack_order_engages_until_target_dies() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(1, 0));
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            for id in [a, b] {
                let unit = field.unit_mut(id).unwrap();
                unit.movement_behavior = "idle".to_string();
                unit.combat_behavior = "ignore".to_string();
            }
            field.unit_mut(b).unwrap().health = 15;
            field.issue_order(a, OrderGoal::Attack(b)).unwrap();
        }

        // 7 damage per strike at 1/sec; 15 health falls in three strikes
        for _ in 0..80 {
            step_clock(&scheduler, &clock, 50);
        }

        let field = world.lock().unwrap();
        assert!(!field.unit(b).unwrap().is_alive());
        assert_eq!(field.unit(a).unwrap().kills, 1);
        // Engagement wound down with its target
        assert!(field.unit(a).unwrap().scheduled.is_empty());
    }

    #[test]
    fn test_engagement_closes_distance_first() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(4, 0));
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            for id in [a, b] {
                let unit = field.unit_mut(id).unwrap();
                unit.movement_behavior = "idle".to_string();
                unit.combat_behavior = "ignore".to_string();
            }
            field.issue_order(a, OrderGoal::Attack(b)).unwrap();
        }

        for _ in 0..40 {
            step_clock(&scheduler, &clock, 100);
        }

        let field = world.lock().unwrap();
        // Walked to melee range and has been trading hits since
        assert_eq!(
            field.unit(a).unwrap().coord.unwrap().distance(&HexCoord::new(4, 0)),
            1
        );
        assert!(field.unit(b).unwrap().health < 100);
    }

    #[test]
    fn test_set_behavior_order_swaps_tags() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            let unit = field.unit_mut(a).unwrap();
            unit.movement_behavior = "idle".to_string();
            unit.combat_behavior = "ignore".to_string();
            field
                .issue_order(
                    a,
                    OrderGoal::SetBehavior {
                        movement: Some("flee".to_string()),
                        combat: None,
                    },
                )
                .unwrap();
        }

        step_clock(&scheduler, &clock, 50);

        let field = world.lock().unwrap();
        assert_eq!(field.unit(a).unwrap().movement_behavior, "flee");
        assert_eq!(field.unit(a).unwrap().combat_behavior, "ignore");
    }

    #[test]
    fn test_aggressive_behavior_attacks_adjacent_enemy() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(1, 0));
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            field.unit_mut(a).unwrap().movement_behavior = "idle".to_string();
            field.unit_mut(a).unwrap().combat_behavior = "aggressive".to_string();
            let target = field.unit_mut(b).unwrap();
            target.movement_behavior = "idle".to_string();
            target.combat_behavior = "ignore".to_string();
            target.can_act = false;
        }

        step_clock(&scheduler, &clock, 50);

        let field = world.lock().unwrap();
        assert_eq!(field.unit(b).unwrap().health, 93);
    }

    #[test]
    fn test_attack_cadence_respects_cooldown() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(1, 0));
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            field.unit_mut(a).unwrap().movement_behavior = "idle".to_string();
            field.unit_mut(a).unwrap().combat_behavior = "aggressive".to_string();
            let target = field.unit_mut(b).unwrap();
            target.movement_behavior = "idle".to_string();
            target.combat_behavior = "ignore".to_string();
            target.can_act = false;
        }

        // Ten ticks over 500ms; attack_speed 1.0 allows only the first hit
        for _ in 0..10 {
            step_clock(&scheduler, &clock, 50);
        }
        assert_eq!(world.lock().unwrap().unit(b).unwrap().health, 93);

        // The second hit lands once a full second has passed since the first
        for _ in 0..12 {
            step_clock(&scheduler, &clock, 50);
        }
        assert_eq!(world.lock().unwrap().unit(b).unwrap().health, 86);
    }

    #[test]
    fn test_cannot_act_unit_is_skipped() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(1, 0));
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            let unit = field.unit_mut(a).unwrap();
            unit.combat_behavior = "aggressive".to_string();
            unit.can_act = false;
            let target = field.unit_mut(b).unwrap();
            target.movement_behavior = "idle".to_string();
            target.combat_behavior = "ignore".to_string();
        }

        for _ in 0..5 {
            step_clock(&scheduler, &clock, 50);
        }
        assert_eq!(world.lock().unwrap().unit(b).unwrap().health, 100);
    }

    #[test]
    fn test_hunter_closes_on_visible_enemy() {
        let (scheduler, clock, world) = setup();
        let a = spawn(&world, 1, HexCoord::origin());
        let b = spawn(&world, 2, HexCoord::new(5, 0));
        install_resolver(&scheduler, &world);
        {
            let mut field = world.lock().unwrap();
            field.unit_mut(a).unwrap().movement_behavior = "hunter".to_string();
            field.unit_mut(a).unwrap().combat_behavior = "ignore".to_string();
            let target = field.unit_mut(b).unwrap();
            target.movement_behavior = "idle".to_string();
            target.combat_behavior = "ignore".to_string();
        }

        // Behavior picked up on the first tick; then hops at 500ms cadence
        step_clock(&scheduler, &clock, 50);
        for _ in 0..6 {
            step_clock(&scheduler, &clock, 500);
        }

        let field = world.lock().unwrap();
        let pos = field.unit(a).unwrap().coord.unwrap();
        assert!(pos.distance(&HexCoord::new(5, 0)) < 5);
    }

    #[test]
    fn test_clamp_to_move_range() {
        let field = Battlefield::new(8);
        let clamped = clamp_to_move_range(&field, HexCoord::origin(), HexCoord::new(6, 0), 3);
        assert_eq!(HexCoord::origin().distance(&clamped), 3);

        let near = clamp_to_move_range(&field, HexCoord::origin(), HexCoord::new(2, 0), 3);
        assert_eq!(near, HexCoord::new(2, 0));
    }
}
