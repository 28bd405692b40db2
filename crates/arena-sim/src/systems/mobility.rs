//! Mobility system: engine aggregation, steering, and the air-drop
//! failure mode.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::components::{AirDrop, AttachmentSpec, Hull, Mobility, Pilot, UnitTag};
use arena_core::constants::*;
use arena_core::enums::{UnitKind, UnitLossReason};
use arena_core::events::BattleEvent;
use arena_core::types::{Position, Velocity};

/// Recompute each unit's mobility aggregate from its alive engines, and
/// push air units that lost lift into the air-drop state.
pub fn refresh(world: &mut World, rng: &mut ChaCha8Rng) {
    for (_entity, (tag, hull, vel, mobility, pilot)) in
        world.query_mut::<(&UnitTag, &Hull, &Velocity, &mut Mobility, &mut Pilot)>()
    {
        if !pilot.alive {
            continue;
        }

        let mass = hull.total_mass();
        let mut power = 0.0;
        let mut weighted_cap = 0.0;
        for attachment in &hull.attachments {
            if !attachment.alive {
                continue;
            }
            if let AttachmentSpec::Engine(engine) = &attachment.spec {
                power += engine.power;
                weighted_cap += engine.power * engine.speed_cap;
            }
        }

        if power <= 0.0 {
            *mobility = Mobility {
                mass,
                max_speed: 0.0,
                accel: 0.0,
                turn_drag: TURN_DRAG_MIN,
            };
        } else {
            let speed_cap = weighted_cap / power;
            let raw = power / mass * SPEED_SCALE;
            let max_speed = raw.clamp(0.0, speed_cap);
            let accel = (ACCEL_FACTOR * raw).min(ACCEL_SPEED_CAP_FACTOR * max_speed);
            let ratio = if max_speed > 1e-6 {
                (vel.speed() / max_speed).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let turn_drag = TURN_DRAG_MIN + (TURN_DRAG_MAX - TURN_DRAG_MIN) * ratio;
            *mobility = Mobility {
                mass,
                max_speed,
                accel,
                turn_drag,
            };
        }

        // Air units that can no longer sustain lift start falling toward
        // a random ground-band landing spot.
        if tag.kind == UnitKind::Air
            && pilot.air_drop.is_none()
            && mobility.max_speed < AIR_LIFT_MIN_SPEED
        {
            pilot.air_drop = Some(AirDrop {
                landing_y: rng.gen_range(GROUND_BAND_MIN_Y..GROUND_BAND_MAX_Y),
            });
        }
    }
}

/// Steer one unit by its decision's movement intent and integrate its
/// position. Air-drop units are flown by `air_drop_fall` instead.
pub fn apply_decision_movement(
    world: &mut World,
    entity: Entity,
    move_x: f64,
    move_y: f64,
    allow_descend: bool,
    dt: f64,
) {
    let Ok((tag, mobility, pilot, vel, pos)) = world.query_one_mut::<(
        &UnitTag,
        &Mobility,
        &Pilot,
        &mut Velocity,
        &mut Position,
    )>(entity) else {
        return;
    };
    if !pilot.alive || pilot.air_drop.is_some() {
        return;
    }

    let mut dx = move_x.clamp(-1.0, 1.0);
    let mut dy = move_y.clamp(-1.0, 1.0);
    match tag.kind {
        UnitKind::Ground => dy = 0.0,
        UnitKind::Air => {
            if dy > 0.0 && !allow_descend {
                dy = 0.0;
            }
        }
    }
    let len = (dx * dx + dy * dy).sqrt();
    if len > 1.0 {
        dx /= len;
        dy /= len;
    }

    // turn_drag is per-second retention; scale it to the step size.
    let drag = mobility.turn_drag.powf(dt);
    vel.x = (vel.x + dx * mobility.accel * dt) * drag;
    vel.y = (vel.y + dy * mobility.accel * dt) * drag;
    vel.clamp_speed(mobility.max_speed);

    pos.x = (pos.x + vel.x * dt).clamp(0.0, BATTLEFIELD_WIDTH);
    match tag.kind {
        UnitKind::Ground => {
            vel.y = 0.0;
        }
        UnitKind::Air => {
            pos.y = (pos.y + vel.y * dt).clamp(60.0, GROUND_BAND_MIN_Y);
        }
    }
}

/// Free-fall for units in the air-drop state; impact destroys the unit
/// outright, whatever its remaining structure.
pub fn air_drop_fall(world: &mut World, dt: f64, events: &mut Vec<BattleEvent>) {
    for (_entity, (tag, pos, vel, pilot)) in
        world.query_mut::<(&UnitTag, &mut Position, &mut Velocity, &mut Pilot)>()
    {
        if !pilot.alive {
            continue;
        }
        let Some(drop) = pilot.air_drop else {
            continue;
        };

        vel.y += AIR_DROP_GRAVITY * dt;
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;

        if pos.y >= drop.landing_y {
            pos.y = drop.landing_y;
            pilot.alive = false;
            events.push(BattleEvent::UnitDestroyed {
                unit: tag.id,
                side: tag.side,
                reason: UnitLossReason::Crash,
            });
        }
    }
}
