//! Behavior definitions and the engine that evaluates them
//!
//! A behavior is an ordered list of steps; each step pairs an optional
//! condition with an action. Evaluation walks the steps top to bottom and
//! takes the first one whose condition holds and whose action produces an
//! intent. Movement and combat behaviors are independent lists so a unit can
//! mix, say, cowardly movement with aggressive retaliation.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::context::DecisionContext;
use crate::ai::primitives::{ActionFn, ConditionFn, Intent, PrimitiveRegistry};
use crate::core::config::SimulationConfig;
use crate::core::error::{CoreError, Result};

/// One step of a behavior, as written in a definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    /// Condition primitive name; `None` means the step always applies
    #[serde(default)]
    pub when: Option<String>,
    /// Action primitive name
    pub then: String,
}

/// A named behavior definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorSpec {
    pub name: String,
    pub steps: Vec<StepSpec>,
}

struct CompiledStep {
    condition: Option<ConditionFn>,
    action: ActionFn,
}

struct CompiledBehavior {
    steps: Vec<CompiledStep>,
}

impl CompiledBehavior {
    fn evaluate(&self, ctx: &DecisionContext, rng: &mut ChaCha8Rng) -> Option<Intent> {
        for step in &self.steps {
            if let Some(condition) = step.condition {
                if !condition(ctx) {
                    continue;
                }
            }
            if let Some(intent) = (step.action)(ctx, rng) {
                return Some(intent);
            }
        }
        None
    }
}

/// Loads behavior definitions and evaluates them against unit snapshots
pub struct BehaviorEngine {
    registry: PrimitiveRegistry,
    movement: HashMap<String, CompiledBehavior>,
    combat: HashMap<String, CompiledBehavior>,
    rng: ChaCha8Rng,
}

impl BehaviorEngine {
    /// Engine with the built-in behavior set, seeded from configuration
    pub fn new(config: &SimulationConfig) -> Self {
        let mut engine = Self {
            registry: PrimitiveRegistry::with_defaults(),
            movement: HashMap::new(),
            combat: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        };
        for spec in builtin_movement() {
            // Built-ins only name built-in primitives
            engine
                .load_movement(&spec)
                .unwrap_or_else(|e| panic!("builtin movement behavior invalid: {e}"));
        }
        for spec in builtin_combat() {
            engine
                .load_combat(&spec)
                .unwrap_or_else(|e| panic!("builtin combat behavior invalid: {e}"));
        }
        engine
    }

    pub fn registry_mut(&mut self) -> &mut PrimitiveRegistry {
        &mut self.registry
    }

    /// Compile and store a movement behavior, replacing any same-named one
    pub fn load_movement(&mut self, spec: &BehaviorSpec) -> Result<()> {
        let compiled = self.compile(spec)?;
        self.movement.insert(spec.name.clone(), compiled);
        Ok(())
    }

    /// Compile and store a combat behavior, replacing any same-named one
    pub fn load_combat(&mut self, spec: &BehaviorSpec) -> Result<()> {
        let compiled = self.compile(spec)?;
        self.combat.insert(spec.name.clone(), compiled);
        Ok(())
    }

    pub fn has_movement(&self, name: &str) -> bool {
        self.movement.contains_key(name)
    }

    pub fn has_combat(&self, name: &str) -> bool {
        self.combat.contains_key(name)
    }

    /// Where the unit's movement behavior wants it to go, if anywhere
    pub fn movement_intent(&mut self, name: &str, ctx: &DecisionContext) -> Option<Intent> {
        let behavior = match self.movement.get(name) {
            Some(b) => b,
            None => {
                debug!(behavior = name, "unknown movement behavior, using hunter");
                self.movement.get("hunter")?
            }
        };
        behavior.evaluate(ctx, &mut self.rng)
    }

    /// Whom the unit's combat behavior wants to hit, if anyone
    pub fn combat_intent(&mut self, name: &str, ctx: &DecisionContext) -> Option<Intent> {
        let behavior = match self.combat.get(name) {
            Some(b) => b,
            None => {
                debug!(behavior = name, "unknown combat behavior, using aggressive");
                self.combat.get("aggressive")?
            }
        };
        behavior.evaluate(ctx, &mut self.rng)
    }

    fn compile(&self, spec: &BehaviorSpec) -> Result<CompiledBehavior> {
        let mut steps = Vec::with_capacity(spec.steps.len());
        for step in &spec.steps {
            let condition = match &step.when {
                Some(name) => Some(
                    self.registry
                        .condition(name)
                        .ok_or_else(|| CoreError::UnknownPrimitive(name.clone()))?,
                ),
                None => None,
            };
            let action = self
                .registry
                .action(&step.then)
                .ok_or_else(|| CoreError::UnknownPrimitive(step.then.clone()))?;
            steps.push(CompiledStep { condition, action });
        }
        Ok(CompiledBehavior { steps })
    }
}

fn step(when: Option<&str>, then: &str) -> StepSpec {
    StepSpec {
        when: when.map(str::to_string),
        then: then.to_string(),
    }
}

fn builtin_movement() -> Vec<BehaviorSpec> {
    vec![
        // Wanders until an enemy comes into view, then closes in
        BehaviorSpec {
            name: "explorer".to_string(),
            steps: vec![
                step(Some("enemy-visible"), "move-toward-nearest-enemy"),
                step(None, "move-random-free-cell"),
            ],
        },
        // Closes in only once hurt; lurks otherwise
        BehaviorSpec {
            name: "prowler".to_string(),
            steps: vec![
                step(Some("has-taken-damage"), "move-toward-nearest-enemy"),
                step(None, "move-random-free-cell"),
            ],
        },
        // Sticks with the nearest ally
        BehaviorSpec {
            name: "follower".to_string(),
            steps: vec![step(None, "move-toward-nearest-ally")],
        },
        // Runs from visible enemies, drifts otherwise
        BehaviorSpec {
            name: "flee".to_string(),
            steps: vec![
                step(Some("enemy-visible"), "move-away-from-nearest-enemy"),
                step(None, "move-random-free-cell"),
            ],
        },
        // Heads back to the spawn cell and holds there
        BehaviorSpec {
            name: "return_to_base".to_string(),
            steps: vec![step(None, "move-to-home")],
        },
        // Never moves on its own
        BehaviorSpec {
            name: "idle".to_string(),
            steps: Vec::new(),
        },
        // Seeks out the nearest visible enemy
        BehaviorSpec {
            name: "hunter".to_string(),
            steps: vec![step(Some("enemy-visible"), "move-toward-nearest-enemy")],
        },
    ]
}

fn builtin_combat() -> Vec<BehaviorSpec> {
    vec![
        // Attacks whenever anything is in range
        BehaviorSpec {
            name: "aggressive".to_string(),
            steps: vec![step(None, "attack-nearest-enemy-in-range")],
        },
        // Only fights back once hurt
        BehaviorSpec {
            name: "defensive".to_string(),
            steps: vec![step(
                Some("has-taken-damage"),
                "attack-nearest-enemy-in-range",
            )],
        },
        // Attacks anything that steps into range
        BehaviorSpec {
            name: "guardian".to_string(),
            steps: vec![step(
                Some("enemy-in-range"),
                "attack-nearest-enemy-in-range",
            )],
        },
        // Never attacks
        BehaviorSpec {
            name: "ignore".to_string(),
            steps: Vec::new(),
        },
    ]
}
