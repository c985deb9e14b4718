//! Condition/action primitives behind the behavior registry
//!
//! Primitives are plain functions keyed by name. Behavior definitions refer
//! to them by name and are validated against this registry when loaded, so a
//! typo in configuration fails at load time, not mid-battle.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::ai::context::DecisionContext;
use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

/// What a behavior step wants the unit to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(HexCoord),
    Attack(UnitId),
}

pub type ConditionFn = fn(&DecisionContext) -> bool;
pub type ActionFn = fn(&DecisionContext, &mut ChaCha8Rng) -> Option<Intent>;

/// Name-keyed registry of conditions and actions
///
/// Ships with the built-in primitive set; collaborating layers may register
/// more before behaviors are loaded.
pub struct PrimitiveRegistry {
    conditions: HashMap<String, ConditionFn>,
    actions: HashMap<String, ActionFn>,
}

impl PrimitiveRegistry {
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            conditions: HashMap::new(),
            actions: HashMap::new(),
        };
        registry.register_condition("enemy-in-range", enemy_in_range);
        registry.register_condition("enemy-visible", enemy_visible);
        registry.register_condition("has-taken-damage", has_taken_damage);

        registry.register_action("move-random-free-cell", move_random_free_cell);
        registry.register_action("move-toward-nearest-enemy", move_toward_nearest_enemy);
        registry.register_action("move-away-from-nearest-enemy", move_away_from_nearest_enemy);
        registry.register_action("move-toward-nearest-ally", move_toward_nearest_ally);
        registry.register_action("move-to-home", move_to_home);
        registry.register_action("attack-nearest-enemy-in-range", attack_nearest_enemy_in_range);
        registry
    }

    pub fn register_condition(&mut self, name: &str, f: ConditionFn) {
        self.conditions.insert(name.to_string(), f);
    }

    pub fn register_action(&mut self, name: &str, f: ActionFn) {
        self.actions.insert(name.to_string(), f);
    }

    pub fn condition(&self, name: &str) -> Option<ConditionFn> {
        self.conditions.get(name).copied()
    }

    pub fn action(&self, name: &str) -> Option<ActionFn> {
        self.actions.get(name).copied()
    }
}

// === Conditions ===

fn enemy_in_range(ctx: &DecisionContext) -> bool {
    !ctx.enemies_in_range.is_empty()
}

fn enemy_visible(ctx: &DecisionContext) -> bool {
    !ctx.visible_enemies.is_empty()
}

fn has_taken_damage(ctx: &DecisionContext) -> bool {
    ctx.has_taken_damage
}

// === Actions ===

fn move_random_free_cell(ctx: &DecisionContext, rng: &mut ChaCha8Rng) -> Option<Intent> {
    ctx.free_neighbors.choose(rng).map(|&c| Intent::Move(c))
}

fn move_toward_nearest_enemy(ctx: &DecisionContext, _rng: &mut ChaCha8Rng) -> Option<Intent> {
    let (_, enemy_at) = ctx.nearest_enemy()?;
    if ctx.coord.distance(&enemy_at) <= ctx.attack_range {
        // Already close enough; moving would only thrash
        return None;
    }
    Some(Intent::Move(enemy_at))
}

fn move_away_from_nearest_enemy(ctx: &DecisionContext, _rng: &mut ChaCha8Rng) -> Option<Intent> {
    let (_, enemy_at) = ctx.nearest_enemy()?;
    ctx.free_neighbors
        .iter()
        .max_by_key(|c| (c.distance(&enemy_at), -(c.q as i64), -(c.r as i64)))
        .map(|&c| Intent::Move(c))
}

fn move_toward_nearest_ally(ctx: &DecisionContext, _rng: &mut ChaCha8Rng) -> Option<Intent> {
    let (_, ally_at) = ctx.nearest_ally()?;
    if ctx.coord.distance(&ally_at) <= 1 {
        return None;
    }
    Some(Intent::Move(ally_at))
}

fn move_to_home(ctx: &DecisionContext, _rng: &mut ChaCha8Rng) -> Option<Intent> {
    let home = ctx.home?;
    if ctx.coord == home {
        return None;
    }
    Some(Intent::Move(home))
}

fn attack_nearest_enemy_in_range(ctx: &DecisionContext, _rng: &mut ChaCha8Rng) -> Option<Intent> {
    ctx.nearest_enemy_in_range().map(|(id, _)| Intent::Attack(id))
}
