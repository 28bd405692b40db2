//! Target selection and shot-feasibility checks.

use arena_core::constants::*;
use arena_core::enums::UnitKind;
use arena_core::types::Position;

use crate::context::{DecisionContext, EnemyContext, SlotContext};

/// Pick the best enemy to attack, or `None` when the field is clear.
///
/// Minimizes `distance + 0.7·|Δy| + closing_penalty` where the closing
/// penalty slightly favors slow or stationary targets.
pub fn select_best_target<'a>(ctx: &'a DecisionContext) -> Option<&'a EnemyContext> {
    let own = &ctx.unit.position;
    let mut best: Option<(&EnemyContext, f64)> = None;
    for enemy in &ctx.enemies {
        let distance = own.distance_to(&enemy.position);
        let dy = (enemy.position.y - own.y).abs();
        let closing_penalty =
            (CLOSING_SPEED_REF - enemy.velocity.speed()).max(0.0) * CLOSING_PENALTY_FACTOR;
        let score = distance + TARGET_Y_WEIGHT * dy + closing_penalty;
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((enemy, score));
        }
    }
    best.map(|(enemy, _)| enemy)
}

/// Effective reach of a weapon slot: a global multiplier on its base
/// range, plus a flat bonus for airborne shooters.
pub fn effective_weapon_range(slot: &SlotContext, shooter_kind: UnitKind) -> f64 {
    let altitude_bonus = match shooter_kind {
        UnitKind::Air => AIR_RANGE_ALTITUDE_BONUS,
        UnitKind::Ground => 0.0,
    };
    slot.range * EFFECTIVE_RANGE_MULTIPLIER + altitude_bonus
}

/// Ground units can only trade fire inside a vertical band; the check is
/// waived when either side is airborne.
pub fn axis_aligned(
    shooter_kind: UnitKind,
    shooter_pos: &Position,
    target_kind: UnitKind,
    target_pos: &Position,
) -> bool {
    if shooter_kind == UnitKind::Air || target_kind == UnitKind::Air {
        return true;
    }
    (target_pos.y - shooter_pos.y).abs() <= GROUND_FIRE_Y_TOLERANCE
}

/// Bearing of the facing direction: 0 for right, π for left.
pub fn facing_angle(facing: i8) -> f64 {
    if facing >= 0 {
        0.0
    } else {
        std::f64::consts::PI
    }
}

/// Signed smallest difference between two angles, in (-π, π].
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let mut d = (a - b) % std::f64::consts::TAU;
    if d > std::f64::consts::PI {
        d -= std::f64::consts::TAU;
    } else if d <= -std::f64::consts::PI {
        d += std::f64::consts::TAU;
    }
    d
}

/// Whether a shot bearing falls inside the weapon's permitted cone.
pub fn within_cone(angle: f64, facing: i8, half_cone_deg: f64) -> bool {
    let half = half_cone_deg.to_radians();
    angle_difference(angle, facing_angle(facing)).abs() <= half
}

/// Clamp a shot bearing to the nearest edge of the firing cone.
pub fn clamp_to_cone(angle: f64, facing: i8, half_cone_deg: f64) -> f64 {
    let center = facing_angle(facing);
    let half = half_cone_deg.to_radians();
    let diff = angle_difference(angle, center);
    if diff.abs() <= half {
        angle
    } else {
        center + half.copysign(diff)
    }
}
