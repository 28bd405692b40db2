//! Feature extraction for policy-model controllers and threat scoring.
//!
//! The feature vector layout is fixed: linear controllers are trained
//! offline against these exact indices, so order changes are breaking.

use arena_core::constants::*;
use arena_core::enums::Side;
use arena_core::types::Position;

use crate::context::{DecisionContext, ProjectileContext};

/// Number of entries in the decision feature vector.
pub const DECISION_FEATURE_COUNT: usize = 6;

/// Extract the fixed decision feature vector:
/// `[bias, integrity, dist_to_base_norm, speed_norm, can_fire, is_air]`.
pub fn decision_features(ctx: &DecisionContext) -> [f64; DECISION_FEATURE_COUNT] {
    let unit = &ctx.unit;
    let dist_to_base = unit.position.distance_to(&ctx.own_base);
    let speed_norm = if unit.max_speed > 1.0 {
        (unit.velocity.speed() / unit.max_speed).clamp(0.0, 2.0)
    } else {
        0.0
    };
    let can_fire = if unit.slots.iter().any(|s| s.ready) {
        1.0
    } else {
        0.0
    };
    let is_air = if unit.kind == arena_core::enums::UnitKind::Air {
        1.0
    } else {
        0.0
    };

    [
        1.0,
        unit.integrity.clamp(0.0, 1.0),
        (dist_to_base / BATTLEFIELD_WIDTH).clamp(0.0, 2.0),
        speed_norm,
        can_fire,
        is_air,
    ]
}

/// Bullet pressure near a position from hostile projectiles.
///
/// Sums an inverse-square kernel over every opposing round and clamps to
/// [0, 1]; higher means the unit is standing in incoming fire.
pub fn projectile_pressure(
    position: &Position,
    side: Side,
    projectiles: &[ProjectileContext],
) -> f64 {
    let mut total = 0.0;
    for projectile in projectiles {
        if projectile.side == side {
            continue;
        }
        let d2 = position.distance_sq_to(&projectile.position).max(1.0);
        total += PROJECTILE_PRESSURE_SCALE / d2;
    }
    total.clamp(0.0, 1.0)
}

/// Offset to the nearest hostile projectile, if any.
pub fn nearest_hostile_projectile(
    position: &Position,
    side: Side,
    projectiles: &[ProjectileContext],
) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64, f64)> = None;
    for projectile in projectiles {
        if projectile.side == side {
            continue;
        }
        let dx = projectile.position.x - position.x;
        let dy = projectile.position.y - position.y;
        let d2 = dx * dx + dy * dy;
        if best.map_or(true, |(bd2, _, _)| d2 < bd2) {
            best = Some((d2, dx, dy));
        }
    }
    best.map(|(_, dx, dy)| (dx, dy))
}

/// Logistic squash used by linear policy heads.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Dot product of a weight row with the decision feature vector.
pub fn dot(weights: &[f64; DECISION_FEATURE_COUNT], features: &[f64; DECISION_FEATURE_COUNT]) -> f64 {
    weights
        .iter()
        .zip(features.iter())
        .map(|(w, f)| w * f)
        .sum()
}
