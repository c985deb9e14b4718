//! Defense-mitigated damage formula
//!
//! Pure functions; health mutation is the caller's responsibility.

use crate::core::types::AttackKind;
use crate::combat::unit::CombatUnit;

/// `max(1, base - defense)`
///
/// A landed hit always costs at least one point, no matter how hard the
/// target mitigates.
pub fn damage(base: i32, defense: i32) -> i32 {
    (base - defense).max(1)
}

/// Damage with a flat bonus applied before the floor of 1
///
/// Bonus/special-effect layers adjust the raw value; the floor is enforced
/// last so mitigation can never reduce a hit below 1.
pub fn damage_with_bonus(base: i32, defense: i32, bonus: i32) -> i32 {
    (base + bonus - defense).max(1)
}

/// Select stats by attack kind and compute the hit value
pub fn resolve(attacker: &CombatUnit, defender: &CombatUnit, kind: AttackKind) -> i32 {
    damage(attacker.attack_power(kind), defender.defense(kind))
}
