//! Behavior tree for the default combat AI.
//!
//! The tree is a tagged-variant structure (`Sequence | Selector |
//! Condition | Action`) evaluated over a mutable per-tick blackboard.
//! Nodes are plain functions, so each one is unit-testable in isolation,
//! and the visited-node trace doubles as the unit's decision path.

use arena_core::constants::*;
use arena_core::enums::{BlockReason, UnitKind};
use arena_core::types::{Position, Velocity};

use crate::ballistics;
use crate::context::{CombatDecision, DecisionContext, FireRequest};
use crate::features::projectile_pressure;
use crate::targeting;

/// Tri-state result of a node evaluation (running is not modeled: the
/// whole tree re-evaluates every tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

/// One tree node: a name for the decision path plus its kind.
pub struct Node {
    pub name: &'static str,
    pub kind: NodeKind,
}

pub enum NodeKind {
    Sequence(Vec<Node>),
    Selector(Vec<Node>),
    Condition(fn(&Blackboard) -> bool),
    Action(fn(&mut Blackboard) -> Status),
}

/// What the unit is attacking this tick: an enemy unit, or the enemy
/// base center when the field is clear.
#[derive(Debug, Clone, Copy)]
pub struct AttackTarget {
    /// Enemy unit id; `None` when the target is the base itself.
    pub unit_id: Option<u32>,
    pub kind: UnitKind,
    pub position: Position,
    pub velocity: Velocity,
}

/// Mutable scratch state threaded through one tree evaluation.
pub struct Blackboard<'a> {
    pub ctx: &'a DecisionContext,
    pub desired_range: f64,
    /// Evasion forced by the controller (policy models sample this).
    pub forced_evade: bool,
    pub attack: AttackTarget,
    /// Set by `plan-movement` when the unit is retreating; blocks the
    /// reposition node from steering it back into the fight.
    pub evading: bool,
    pub decision: CombatDecision,
    path: Vec<&'static str>,
}

impl<'a> Blackboard<'a> {
    pub fn new(ctx: &'a DecisionContext, desired_range: f64, forced_evade: bool) -> Self {
        Self {
            ctx,
            desired_range,
            forced_evade,
            attack: AttackTarget {
                unit_id: None,
                kind: UnitKind::Ground,
                position: ctx.base_target,
                velocity: Velocity::default(),
            },
            evading: false,
            decision: CombatDecision::default(),
            path: Vec::new(),
        }
    }
}

/// Evaluate a node, recording its name in the decision path.
pub fn evaluate(node: &Node, bb: &mut Blackboard) -> Status {
    bb.path.push(node.name);
    match &node.kind {
        NodeKind::Sequence(children) => {
            for child in children {
                if evaluate(child, bb) == Status::Failure {
                    return Status::Failure;
                }
            }
            Status::Success
        }
        NodeKind::Selector(children) => {
            for child in children {
                if evaluate(child, bb) == Status::Success {
                    return Status::Success;
                }
            }
            Status::Failure
        }
        NodeKind::Condition(check) => {
            if check(bb) {
                Status::Success
            } else {
                Status::Failure
            }
        }
        NodeKind::Action(act) => act(bb),
    }
}

/// Run a full evaluation and return the finished decision.
pub fn run(tree: &Node, ctx: &DecisionContext, desired_range: f64, forced_evade: bool) -> CombatDecision {
    let mut bb = Blackboard::new(ctx, desired_range, forced_evade);
    let _ = evaluate(tree, &mut bb);
    bb.decision.decision_path = bb.path.join(" > ");
    bb.decision
}

/// Build the default combat tree:
///
/// ```text
/// root = sequence(
///   choose-target,
///   plan-movement,
///   selector(
///     sequence(has-operational-weapons, evaluate-best-weapon-plan, has-shot-plan),
///     reposition-for-blocked-shot,
///   ),
/// )
/// ```
pub fn default_tree() -> Node {
    Node {
        name: "root",
        kind: NodeKind::Sequence(vec![
            Node {
                name: "choose-target",
                kind: NodeKind::Action(choose_target),
            },
            Node {
                name: "plan-movement",
                kind: NodeKind::Action(plan_movement),
            },
            Node {
                name: "engage",
                kind: NodeKind::Selector(vec![
                    Node {
                        name: "weapons",
                        kind: NodeKind::Sequence(vec![
                            Node {
                                name: "has-operational-weapons",
                                kind: NodeKind::Condition(has_operational_weapons),
                            },
                            Node {
                                name: "evaluate-best-weapon-plan",
                                kind: NodeKind::Action(evaluate_best_weapon_plan),
                            },
                            Node {
                                name: "has-shot-plan",
                                kind: NodeKind::Condition(has_shot_plan),
                            },
                        ]),
                    },
                    Node {
                        name: "reposition-for-blocked-shot",
                        kind: NodeKind::Action(reposition_for_blocked_shot),
                    },
                ]),
            },
        ]),
    }
}

// ---- Node implementations ----

/// Pick the attack target and set facing toward it.
pub fn choose_target(bb: &mut Blackboard) -> Status {
    if let Some(enemy) = targeting::select_best_target(bb.ctx) {
        bb.attack = AttackTarget {
            unit_id: Some(enemy.id),
            kind: enemy.kind,
            position: enemy.position,
            velocity: enemy.velocity,
        };
    } else {
        bb.attack = AttackTarget {
            unit_id: None,
            kind: UnitKind::Ground,
            position: bb.ctx.base_target,
            velocity: Velocity::default(),
        };
    }

    bb.decision.facing = if bb.attack.position.x >= bb.ctx.unit.position.x {
        1
    } else {
        -1
    };
    Status::Success
}

/// Plan the movement vector: range-band keeping, bullet dodging, and
/// evasive retreat when the hull is badly chewed up.
pub fn plan_movement(bb: &mut Blackboard) -> Status {
    let unit = &bb.ctx.unit;
    let dx = bb.attack.position.x - unit.position.x;
    let dy = bb.attack.position.y - unit.position.y;
    let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
    let nx = dx / dist;
    let ny = dy / dist;

    let mut mx = 0.0;
    let mut my = 0.0;

    let evading = bb.forced_evade || unit.integrity < EVADE_INTEGRITY_THRESHOLD;
    bb.evading = evading;
    if evading {
        mx -= nx;
        my -= ny;
        // Bias the retreat toward home.
        let bdx = bb.ctx.own_base.x - unit.position.x;
        let bdy = bb.ctx.own_base.y - unit.position.y;
        let bd = (bdx * bdx + bdy * bdy).sqrt().max(1e-6);
        mx += 0.6 * bdx / bd;
        my += 0.6 * bdy / bd;
    } else if dist > bb.desired_range {
        mx += nx;
        my += ny;
    } else if dist < bb.desired_range * RETREAT_BAND_FACTOR {
        mx -= nx;
        my -= ny;
    }

    let pressure = projectile_pressure(&unit.position, unit.side, &bb.ctx.projectiles);
    if pressure > DODGE_PRESSURE_MIN {
        let w = DODGE_WEIGHT * pressure;
        mx += -ny * w;
        my += nx * w;
    }

    bb.decision.move_x = mx.clamp(-1.0, 1.0);
    bb.decision.move_y = my.clamp(-1.0, 1.0);
    bb.decision.allow_descend = unit.kind == UnitKind::Air && pressure > DESCEND_PRESSURE_MIN;
    Status::Success
}

/// The unit still carries at least one live weapon.
pub fn has_operational_weapons(bb: &Blackboard) -> bool {
    !bb.ctx.unit.slots.is_empty()
}

/// Extra cone slack inside which a shot is taken at a scoring penalty
/// (the aim clamps to the cone edge); beyond it the slot is angle-locked.
const CONE_SLACK_DEG: f64 = 15.0;

/// Score every ready slot against the attack target and stage the best
/// shot. Records a block reason when nothing qualifies.
pub fn evaluate_best_weapon_plan(bb: &mut Blackboard) -> Status {
    let unit = &bb.ctx.unit;
    let attack = bb.attack;
    let dist = unit.position.distance_to(&attack.position);

    let mut best: Option<(f64, FireRequest)> = None;
    let mut any_ready = false;
    let mut rejected_range = false;
    let mut rejected_angle = false;
    let mut rejected_axis = false;

    for slot in &unit.slots {
        if !slot.ready {
            continue;
        }
        any_ready = true;

        if !targeting::axis_aligned(unit.kind, &unit.position, attack.kind, &attack.position) {
            rejected_axis = true;
            continue;
        }

        let reach = targeting::effective_weapon_range(slot, unit.kind);
        if dist > reach {
            rejected_range = true;
            continue;
        }

        let solution = ballistics::solve_lead(
            &unit.position,
            &attack.position,
            &attack.velocity,
            slot.speed,
            slot.gravity,
        );
        let (angle, lead_bonus) = match solution {
            Some(s) => (s.angle, SCORE_LEAD_BONUS),
            None => (
                ballistics::direct_aim(&unit.position, &attack.position),
                SCORE_LEAD_FALLBACK,
            ),
        };

        let off_axis = targeting::angle_difference(angle, targeting::facing_angle(bb.decision.facing)).abs();
        let half_cone = slot.shoot_angle_deg.to_radians();
        if off_axis > half_cone + CONE_SLACK_DEG.to_radians() {
            rejected_angle = true;
            continue;
        }
        let angle_penalty = if off_axis > half_cone {
            SCORE_ANGLE_PENALTY
        } else {
            0.0
        };

        let ratio = (dist / reach).min(1.0);
        let range_alignment = SCORE_RANGE_ALIGN_MAX * (1.0 - ((ratio - 0.65).abs() / 0.65)).clamp(0.0, 1.0);

        let score = slot.damage * SCORE_DAMAGE_WEIGHT + range_alignment + lead_bonus - angle_penalty;

        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            let aim = Position::new(
                unit.position.x + angle.cos() * dist,
                unit.position.y + angle.sin() * dist + unit.aim_bias_y,
            );
            best = Some((
                score,
                FireRequest {
                    slot: slot.index,
                    aim,
                    intended_target: attack.unit_id,
                },
            ));
        }
    }

    match best {
        Some((_, request)) => {
            bb.decision.fire_requests.push(request);
            bb.decision.block_reason = None;
        }
        None => {
            bb.decision.block_reason = Some(if !any_ready {
                BlockReason::NotReady
            } else if rejected_angle && !rejected_range {
                BlockReason::AngleLocked
            } else if rejected_range {
                BlockReason::OutOfRange
            } else if rejected_axis {
                BlockReason::AxisMisaligned
            } else {
                BlockReason::NotReady
            });
        }
    }
    Status::Success
}

/// A shot was staged this tick.
pub fn has_shot_plan(bb: &Blackboard) -> bool {
    !bb.decision.fire_requests.is_empty()
}

/// Nudge movement to unblock the recorded shot problem: close range for
/// range/axis blocks, swing the nose for angle locks.
pub fn reposition_for_blocked_shot(bb: &mut Blackboard) -> Status {
    if bb.evading {
        // A retreating unit stays retreating.
        return Status::Success;
    }

    let unit = &bb.ctx.unit;
    let dx = bb.attack.position.x - unit.position.x;
    let dy = bb.attack.position.y - unit.position.y;
    let dist = (dx * dx + dy * dy).sqrt().max(1e-6);

    match bb.decision.block_reason {
        Some(BlockReason::AngleLocked) => {
            // Face the target and ease toward it so the cone sweeps on.
            bb.decision.facing = if dx >= 0.0 { 1 } else { -1 };
            bb.decision.move_x = (dx / dist * 0.4).clamp(-1.0, 1.0);
        }
        _ => {
            // Close range, overriding the comfort-band hold that left the
            // unit parked outside its own weapons' reach.
            bb.decision.move_x = (dx / dist).clamp(-1.0, 1.0);
            bb.decision.move_y = (dy / dist).clamp(-1.0, 1.0);
        }
    }
    Status::Success
}
