//! Weapon firing: gates, cone clamping, spread, and projectile spawning.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_ai::targeting;
use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::FuseMode;
use arena_core::events::BattleEvent;
use arena_core::types::{Position, Velocity};

/// Tick down every slot's fire timer. Timers only decrease here and only
/// reset upward when a shot is actually taken.
pub fn tick_cooldowns(world: &mut World, dt: f64) {
    for (_entity, (battery, pilot)) in world.query_mut::<(&mut WeaponBattery, &Pilot)>() {
        if !pilot.alive {
            continue;
        }
        for slot in &mut battery.slots {
            slot.fire_timer = (slot.fire_timer - dt).max(0.0);
        }
    }
}

/// Effective muzzle parameters for a weapon: bomb delivery trades speed
/// for a heavier arc.
pub fn effective_ballistics(weapon: &WeaponSpec) -> (f64, f64) {
    if weapon.bomb_delivery {
        (
            weapon.speed * BOMB_SPEED_FACTOR,
            weapon.gravity * BOMB_GRAVITY_FACTOR,
        )
    } else {
        (weapon.speed, weapon.gravity)
    }
}

/// Attempt to fire one slot at an aim point.
///
/// Returns false — with no state mutated — when the slot is on cooldown,
/// out of charges, or structurally gone. On success the projectile entity
/// is spawned and the slot's cooldown restarts.
#[allow(clippy::too_many_arguments)]
pub fn try_fire(
    world: &mut World,
    entity: Entity,
    slot_index: usize,
    aim: Position,
    intended_target: Option<u32>,
    rng: &mut ChaCha8Rng,
    next_projectile_id: &mut u32,
    events: &mut Vec<BattleEvent>,
) -> bool {
    struct ShotSpec {
        unit_id: u32,
        side: arena_core::enums::Side,
        class: arena_core::enums::WeaponClass,
        muzzle: Position,
        velocity: Velocity,
        damage: f64,
        gravity: f64,
        max_distance: f64,
        ttl_secs: f64,
        pierce_air: bool,
        blast: Option<BlastSpec>,
        homing: Option<HomingState>,
    }

    let shot: Option<ShotSpec> = {
        let Ok((tag, pos, hull, battery, pilot)) = world.query_one_mut::<(
            &UnitTag,
            &Position,
            &Hull,
            &mut WeaponBattery,
            &Pilot,
        )>(entity) else {
            return false;
        };

        if !pilot.alive {
            return false;
        }
        let Some(slot) = battery.slots.get(slot_index) else {
            return false;
        };
        if slot.fire_timer > 0.0 {
            return false;
        }

        let Some(attachment) = hull.attachment(slot.attachment).filter(|a| a.alive) else {
            return false;
        };
        let AttachmentSpec::Weapon(weapon) = &attachment.spec else {
            return false;
        };

        // Loader-managed classes spend a banked charge and restart on the
        // loader's burst interval instead of the weapon's own cooldown.
        let cooldown = if weapon.class.needs_loader() {
            if slot.ready_charges == 0 {
                return false;
            }
            min_burst_interval(hull, weapon.class).unwrap_or(LOADER_DEFAULT_BURST_SECS)
        } else {
            weapon.cooldown_secs
        };

        let Some(anchor) = hull.cell(attachment.cell) else {
            return false;
        };
        let (mx, my) = rotation_offset(attachment.rotation);
        let muzzle = Position::new(
            pos.x + anchor.grid_x as f64 * CELL_SIZE + mx,
            pos.y + anchor.grid_y as f64 * CELL_SIZE + my,
        );

        // Clamp the bearing to the firing cone, then jitter.
        let desired = muzzle.angle_to(&aim);
        let clamped = targeting::clamp_to_cone(desired, pilot.facing, weapon.shoot_angle_deg);
        let spread = weapon.spread_deg.to_radians();
        let angle = if spread > 0.0 {
            clamped + rng.gen_range(-spread..spread)
        } else {
            clamped
        };

        let (speed, gravity) = effective_ballistics(weapon);
        let ttl_secs = match weapon.blast {
            Some(blast) if blast.fuse == FuseMode::Timed => blast.fuse_secs,
            _ => (weapon.range / speed.max(PROJECTILE_TTL_SPEED_FLOOR)).max(PROJECTILE_TTL_MIN),
        };

        let spec = ShotSpec {
            unit_id: tag.id,
            side: tag.side,
            class: weapon.class,
            muzzle,
            velocity: Velocity::new(angle.cos() * speed, angle.sin() * speed),
            damage: weapon.damage,
            gravity,
            max_distance: weapon.range,
            ttl_secs,
            pierce_air: weapon.pierce_air,
            blast: weapon.blast,
            homing: weapon
                .homing_turn_rate
                .map(|turn_rate| HomingState {
                    turn_rate,
                    locked: intended_target,
                }),
        };

        let slot = &mut battery.slots[slot_index];
        if weapon.class.needs_loader() {
            slot.ready_charges -= 1;
        }
        slot.fire_timer = cooldown;

        Some(spec)
    };

    let Some(shot) = shot else {
        return false;
    };

    let id = *next_projectile_id;
    *next_projectile_id += 1;

    world.spawn((
        Projectile {
            id,
            side: shot.side,
            source_unit: shot.unit_id,
            intended_target,
            aim_point: aim,
            class: shot.class,
            damage: shot.damage,
            gravity: shot.gravity,
            traveled: 0.0,
            max_distance: shot.max_distance,
            ttl_secs: shot.ttl_secs,
            prev: shot.muzzle,
            pierce_air: shot.pierce_air,
            blast: shot.blast,
            homing: shot.homing,
            hit_intended: false,
        },
        shot.muzzle,
        shot.velocity,
    ));

    events.push(BattleEvent::ShotFired {
        unit: shot.unit_id,
        slot: slot_index,
        class: shot.class,
    });
    true
}

/// Smallest burst interval across alive loaders that can feed `class`.
fn min_burst_interval(hull: &Hull, class: arena_core::enums::WeaponClass) -> Option<f64> {
    hull.attachments
        .iter()
        .filter(|a| a.alive)
        .filter_map(|a| match &a.spec {
            AttachmentSpec::Loader(loader) if loader.supports.contains(&class) => {
                Some(loader.burst_interval_secs)
            }
            _ => None,
        })
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}

/// Muzzle offset from the anchor cell center by quarter-turn rotation.
fn rotation_offset(rotation: u8) -> (f64, f64) {
    let half = CELL_SIZE / 2.0;
    match rotation % 4 {
        0 => (half, 0.0),
        1 => (0.0, half),
        2 => (-half, 0.0),
        _ => (0.0, -half),
    }
}
