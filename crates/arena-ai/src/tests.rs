//! Tests for targeting, the behavior tree, and the controller variants.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_core::constants::*;
use arena_core::enums::{BlockReason, Side, UnitKind, WeaponClass};
use arena_core::types::{Position, Velocity};

use crate::context::{
    DecisionContext, EnemyContext, ProjectileContext, SelfContext, SlotContext,
};
use crate::controller::{
    LinearPolicyController, RangeBiasController, TreeController, UnitController,
};
use crate::features::{decision_features, projectile_pressure};
use crate::targeting;
use crate::tree;

fn gun_slot(index: usize) -> SlotContext {
    SlotContext {
        index,
        class: WeaponClass::Light,
        damage: 22.0,
        range: 360.0,
        speed: 420.0,
        gravity: 70.0,
        shoot_angle_deg: 55.0,
        ready: true,
    }
}

fn ground_enemy(id: u32, x: f64, y: f64, vx: f64) -> EnemyContext {
    EnemyContext {
        id,
        kind: UnitKind::Ground,
        position: Position::new(x, y),
        velocity: Velocity::new(vx, 0.0),
        weapon_count: 1,
    }
}

fn basic_ctx() -> DecisionContext {
    DecisionContext {
        unit: SelfContext {
            id: 1,
            side: Side::Player,
            kind: UnitKind::Ground,
            position: Position::new(400.0, 840.0),
            velocity: Velocity::default(),
            facing: 1,
            integrity: 1.0,
            max_speed: 90.0,
            aim_bias_y: 0.0,
            slots: vec![gun_slot(0)],
        },
        enemies: vec![ground_enemy(7, 640.0, 840.0, 0.0)],
        projectiles: Vec::new(),
        base_target: Position::new(1955.0, 810.0),
        own_base: Position::new(45.0, 810.0),
        desired_range: DESIRED_RANGE_DEFAULT,
        dt: DT,
    }
}

// ---- Targeting ----

#[test]
fn test_select_best_target_prefers_close_and_aligned() {
    let mut ctx = basic_ctx();
    ctx.enemies = vec![
        ground_enemy(1, 700.0, 840.0, 0.0),  // 300 away, aligned
        ground_enemy(2, 620.0, 640.0, 0.0),  // closer in x but 200 off-axis
        ground_enemy(3, 1400.0, 840.0, 0.0), // far
    ];

    let best = targeting::select_best_target(&ctx).unwrap();
    assert_eq!(best.id, 1, "vertical misalignment is worth 0.7/pixel");
}

#[test]
fn test_select_best_target_closing_penalty_favors_slow() {
    let mut ctx = basic_ctx();
    // Same position; the stationary one carries max(0, 40-v)*0.2 = 8 extra.
    ctx.enemies = vec![
        ground_enemy(1, 700.0, 840.0, 0.0),
        ground_enemy(2, 700.0, 840.0, 60.0),
    ];
    let best = targeting::select_best_target(&ctx).unwrap();
    assert_eq!(best.id, 2, "moving target escapes the closing penalty");
}

#[test]
fn test_select_best_target_empty_field() {
    let mut ctx = basic_ctx();
    ctx.enemies.clear();
    assert!(targeting::select_best_target(&ctx).is_none());
}

#[test]
fn test_axis_alignment_waived_for_air() {
    let shooter = Position::new(0.0, 840.0);
    let far_above = Position::new(100.0, 500.0);
    assert!(!targeting::axis_aligned(
        UnitKind::Ground,
        &shooter,
        UnitKind::Ground,
        &far_above
    ));
    assert!(targeting::axis_aligned(
        UnitKind::Ground,
        &shooter,
        UnitKind::Air,
        &far_above
    ));
    assert!(targeting::axis_aligned(
        UnitKind::Air,
        &far_above,
        UnitKind::Ground,
        &shooter
    ));
}

#[test]
fn test_cone_clamp() {
    // Facing right, 30° half-cone.
    let clamped = targeting::clamp_to_cone(1.2, 1, 30.0);
    assert!((clamped - 30.0_f64.to_radians()).abs() < 1e-9);

    let inside = targeting::clamp_to_cone(0.3, 1, 30.0);
    assert!((inside - 0.3).abs() < 1e-12);

    // Facing left: π is the cone center.
    let left = targeting::clamp_to_cone(0.0, -1, 30.0);
    let diff = targeting::angle_difference(left, std::f64::consts::PI).abs();
    assert!((diff - 30.0_f64.to_radians()).abs() < 1e-9);
}

#[test]
fn test_effective_range_air_bonus() {
    let slot = gun_slot(0);
    let ground = targeting::effective_weapon_range(&slot, UnitKind::Ground);
    let air = targeting::effective_weapon_range(&slot, UnitKind::Air);
    assert!((ground - slot.range * EFFECTIVE_RANGE_MULTIPLIER).abs() < 1e-9);
    assert!((air - ground - AIR_RANGE_ALTITUDE_BONUS).abs() < 1e-9);
}

// ---- Features ----

#[test]
fn test_projectile_pressure_scales_with_proximity() {
    let pos = Position::new(0.0, 0.0);
    let near = vec![ProjectileContext {
        side: Side::Enemy,
        position: Position::new(60.0, 0.0),
    }];
    let far = vec![ProjectileContext {
        side: Side::Enemy,
        position: Position::new(600.0, 0.0),
    }];
    let friendly = vec![ProjectileContext {
        side: Side::Player,
        position: Position::new(10.0, 0.0),
    }];

    let p_near = projectile_pressure(&pos, Side::Player, &near);
    let p_far = projectile_pressure(&pos, Side::Player, &far);
    assert!(p_near > p_far);
    assert!(p_near <= 1.0);
    assert!(
        projectile_pressure(&pos, Side::Player, &friendly).abs() < 1e-12,
        "own rounds exert no pressure"
    );
}

#[test]
fn test_decision_feature_layout() {
    let ctx = basic_ctx();
    let f = decision_features(&ctx);
    assert!((f[0] - 1.0).abs() < 1e-12, "bias");
    assert!((f[1] - 1.0).abs() < 1e-12, "integrity");
    assert!(f[2] > 0.0 && f[2] < 1.0, "distance to base normalized");
    assert!(f[3].abs() < 1e-12, "stationary");
    assert!((f[4] - 1.0).abs() < 1e-12, "can fire");
    assert!(f[5].abs() < 1e-12, "ground unit");
}

// ---- Behavior tree ----

#[test]
fn test_tree_produces_shot_plan_in_range() {
    let ctx = basic_ctx();
    let decision = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);

    assert_eq!(decision.facing, 1);
    assert_eq!(decision.fire_requests.len(), 1);
    assert_eq!(decision.fire_requests[0].intended_target, Some(7));
    assert!(decision.block_reason.is_none());
    assert!(decision.decision_path.contains("has-shot-plan"));
    assert!(!decision.decision_path.contains("reposition-for-blocked-shot"));
}

#[test]
fn test_tree_blocks_out_of_range_and_closes() {
    let mut ctx = basic_ctx();
    ctx.enemies = vec![ground_enemy(7, 1600.0, 840.0, 0.0)];
    let decision = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);

    assert!(decision.fire_requests.is_empty());
    assert_eq!(decision.block_reason, Some(BlockReason::OutOfRange));
    assert!(decision.decision_path.contains("reposition-for-blocked-shot"));
    assert!(decision.move_x > 0.0, "should close toward the target");
}

#[test]
fn test_tree_blocks_when_no_slot_ready() {
    let mut ctx = basic_ctx();
    ctx.unit.slots[0].ready = false;
    let decision = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);

    assert!(decision.fire_requests.is_empty());
    assert_eq!(decision.block_reason, Some(BlockReason::NotReady));
}

#[test]
fn test_tree_angle_lock_swings_facing() {
    let mut ctx = basic_ctx();
    // Enemy close behind with a narrow forward cone: angle-locked.
    ctx.unit.slots[0].shoot_angle_deg = 10.0;
    ctx.unit.facing = 1;
    ctx.enemies = vec![ground_enemy(7, 250.0, 840.0, 0.0)];

    let decision = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);
    assert_eq!(decision.facing, -1, "facing flips toward the enemy");
}

#[test]
fn test_tree_falls_back_to_base_with_no_enemies() {
    let mut ctx = basic_ctx();
    ctx.enemies.clear();
    let decision = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);

    assert_eq!(decision.facing, 1, "base is to the right");
    assert!(decision.move_x > 0.0, "advance on the base");
    assert!(
        decision
            .fire_requests
            .iter()
            .all(|r| r.intended_target.is_none()),
        "base shots carry no intended unit"
    );
}

#[test]
fn test_tree_evades_at_low_integrity() {
    let mut ctx = basic_ctx();
    ctx.unit.integrity = 0.2; // below 0.24
    let decision = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);
    assert!(
        decision.move_x < 0.0,
        "damaged unit retreats from a target on its right"
    );
}

#[test]
fn test_tree_dodges_under_fire() {
    let mut ctx = basic_ctx();
    // Keep the unit inside its comfort band so range-keeping is quiet.
    ctx.enemies = vec![ground_enemy(7, 600.0, 840.0, 0.0)];
    ctx.projectiles = vec![ProjectileContext {
        side: Side::Enemy,
        position: Position::new(420.0, 840.0),
    }];
    let decision = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);
    assert!(
        decision.move_y.abs() > 1e-6,
        "perpendicular dodge shows up as vertical intent"
    );
}

#[test]
fn test_aim_bias_offsets_aim_point() {
    let mut ctx = basic_ctx();
    ctx.unit.aim_bias_y = -20.0;
    let biased = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);
    ctx.unit.aim_bias_y = 0.0;
    let neutral = tree::run(&tree::default_tree(), &ctx, DESIRED_RANGE_DEFAULT, false);

    let ya = biased.fire_requests[0].aim.y;
    let yb = neutral.fire_requests[0].aim.y;
    assert!((ya - (yb - 20.0)).abs() < 1e-9);
}

// ---- Controllers ----

#[test]
fn test_tree_controller_is_deterministic() {
    let ctx = basic_ctx();
    let controller = TreeController::new();
    let mut rng_a = ChaCha8Rng::seed_from_u64(1);
    let mut rng_b = ChaCha8Rng::seed_from_u64(999);

    let a = controller.decide(&ctx, &mut rng_a);
    let b = controller.decide(&ctx, &mut rng_b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap(),
        "default tree ignores the RNG entirely"
    );
}

#[test]
fn test_range_bias_controller_backs_off_sooner() {
    let mut ctx = basic_ctx();
    // 240 away: holds at stock range, but sits inside the doubled
    // controller's retreat band (560 * 0.6 = 336).
    ctx.enemies = vec![ground_enemy(7, 640.0, 840.0, 0.0)];
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let stock = TreeController::new().decide(&ctx, &mut rng);
    let biased = RangeBiasController::new(2.0, EVADE_INTEGRITY_THRESHOLD).decide(&ctx, &mut rng);

    // Stock holds (240 < 280 but > 168); doubled range wants 560, so the
    // biased controller keeps distance while stock stands still.
    assert!(stock.move_x.abs() < 1e-9);
    assert!(biased.move_x < 0.0);
}

#[test]
fn test_range_bias_controller_custom_evade_threshold() {
    let mut ctx = basic_ctx();
    ctx.unit.integrity = 0.5;
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let timid = RangeBiasController::new(1.0, 0.6);
    let decision = timid.decide(&ctx, &mut rng);
    assert!(
        decision.move_x < 0.0,
        "custom threshold forces evasion at 0.5 integrity"
    );
}

#[test]
fn test_linear_policy_controller_seeded_reproducibility() {
    let ctx = basic_ctx();
    let controller = LinearPolicyController::new(
        [0.2, -0.5, 0.1, 0.0, 0.3, 0.0],
        [1.5, -4.0, 0.0, 0.0, 0.0, 0.5],
    );

    let mut rng_a = ChaCha8Rng::seed_from_u64(77);
    let mut rng_b = ChaCha8Rng::seed_from_u64(77);
    let a = controller.decide(&ctx, &mut rng_a);
    let b = controller.decide(&ctx, &mut rng_b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_linear_policy_strong_evade_weights_force_retreat() {
    let ctx = basic_ctx();
    // Huge positive bias weight: evade probability ~1 regardless of state.
    let controller = LinearPolicyController::new([0.0; 6], [50.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let decision = controller.decide(&ctx, &mut rng);
    assert!(decision.move_x < 0.0, "forced evade retreats");
}
