//! Pluggable per-side combat controllers.
//!
//! The session injects one `UnitController` per side at construction.
//! The default is the behavior tree; the harness swaps in biased or
//! policy-model variants without touching the engine.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::context::{CombatDecision, DecisionContext};
use crate::features::{decision_features, dot, sigmoid, DECISION_FEATURE_COUNT};
use crate::tree::{self, Node};

/// A drop-in decision source for one side's AI units.
pub trait UnitController {
    fn decide(&self, ctx: &DecisionContext, rng: &mut ChaCha8Rng) -> CombatDecision;
}

/// The stock behavior-tree controller.
pub struct TreeController {
    tree: Node,
}

impl TreeController {
    pub fn new() -> Self {
        Self {
            tree: tree::default_tree(),
        }
    }
}

impl Default for TreeController {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitController for TreeController {
    fn decide(&self, ctx: &DecisionContext, _rng: &mut ChaCha8Rng) -> CombatDecision {
        tree::run(&self.tree, ctx, ctx.desired_range, false)
    }
}

/// Tree variant with a multiplicative range bias and a custom evasion
/// threshold, used by the headless harness for style sweeps.
pub struct RangeBiasController {
    tree: Node,
    pub range_factor: f64,
    pub evade_integrity: f64,
}

impl RangeBiasController {
    pub fn new(range_factor: f64, evade_integrity: f64) -> Self {
        Self {
            tree: tree::default_tree(),
            range_factor,
            evade_integrity,
        }
    }
}

impl UnitController for RangeBiasController {
    fn decide(&self, ctx: &DecisionContext, _rng: &mut ChaCha8Rng) -> CombatDecision {
        let forced_evade = ctx.unit.integrity < self.evade_integrity;
        tree::run(
            &self.tree,
            ctx,
            ctx.desired_range * self.range_factor,
            forced_evade,
        )
    }
}

/// Linear/logistic policy head over the fixed decision feature vector.
///
/// Two weight rows produce a range factor and an evade probability; the
/// evade coin is flipped through the session RNG so replays stay
/// deterministic. The tree handles everything downstream.
pub struct LinearPolicyController {
    tree: Node,
    pub range_weights: [f64; DECISION_FEATURE_COUNT],
    pub evade_weights: [f64; DECISION_FEATURE_COUNT],
}

/// Range factor spread for the policy head: sigmoid output maps into
/// `[RANGE_FACTOR_MIN, RANGE_FACTOR_MIN + RANGE_FACTOR_SPAN]`.
const RANGE_FACTOR_MIN: f64 = 0.6;
const RANGE_FACTOR_SPAN: f64 = 0.9;

impl LinearPolicyController {
    pub fn new(
        range_weights: [f64; DECISION_FEATURE_COUNT],
        evade_weights: [f64; DECISION_FEATURE_COUNT],
    ) -> Self {
        Self {
            tree: tree::default_tree(),
            range_weights,
            evade_weights,
        }
    }
}

impl UnitController for LinearPolicyController {
    fn decide(&self, ctx: &DecisionContext, rng: &mut ChaCha8Rng) -> CombatDecision {
        let features = decision_features(ctx);
        let range_factor =
            RANGE_FACTOR_MIN + sigmoid(dot(&self.range_weights, &features)) * RANGE_FACTOR_SPAN;
        let evade_prob = sigmoid(dot(&self.evade_weights, &features));
        let forced_evade = rng.gen_bool(evade_prob.clamp(0.0, 1.0));

        tree::run(
            &self.tree,
            ctx,
            ctx.desired_range * range_factor,
            forced_evade,
        )
    }
}
