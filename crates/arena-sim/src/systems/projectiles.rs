//! Projectile integration, collision, blast propagation, and base siege.
//!
//! Projectiles are processed in id order against a unit picture collected
//! once at the start of the pass; damage lands immediately, so an earlier
//! round can break the cell a later round would have hit — that later hit
//! then falls through the armor path as a no-op.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use arena_core::components::{BlastSpec, Hull, Pilot, Projectile, UnitTag};
use arena_core::constants::*;
use arena_core::enums::{FuseMode, Side, UnitKind};
use arena_core::events::BattleEvent;
use arena_core::types::{Position, Rect, Velocity};

use crate::economy::BaseStatus;
use crate::systems::effects::{self, Effect};
use crate::systems::structure;

/// Collision picture of one unit, captured after movement this tick.
struct UnitInfo {
    entity: Entity,
    id: u32,
    side: Side,
    kind: UnitKind,
    position: Position,
    has_weapon: bool,
    cells: Vec<(u16, Rect)>,
}

/// One candidate impact found along a projectile's sweep.
struct ImpactCandidate {
    unit_index: usize,
    cell: u16,
    distance_sq: f64,
}

/// Slack absorbing accumulated fixed-step rounding, so a round whose
/// lifetime divides evenly into ticks ends on the expected tick.
const EXPIRY_EPS: f64 = 1e-9;

/// Advance every projectile one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    dt: f64,
    rng: &mut ChaCha8Rng,
    player_base: &mut BaseStatus,
    enemy_base: &mut BaseStatus,
    controlled_unit: Option<u32>,
    events: &mut Vec<BattleEvent>,
    despawn_buffer: &mut Vec<Entity>,
    particles: &mut Vec<Effect>,
    debris: &mut Vec<Effect>,
) {
    // Unit picture for collision and homing, in stable id order.
    let mut units: Vec<UnitInfo> = Vec::new();
    for (entity, (tag, pos, hull, pilot)) in
        world.query::<(&UnitTag, &Position, &Hull, &Pilot)>().iter()
    {
        if !pilot.alive {
            continue;
        }
        units.push(UnitInfo {
            entity,
            id: tag.id,
            side: tag.side,
            kind: tag.kind,
            position: *pos,
            has_weapon: hull.has_live_weapon(),
            cells: hull
                .cells
                .iter()
                .filter(|c| !c.destroyed)
                .map(|c| (c.id, structure::cell_rect(pos, c)))
                .collect(),
        });
    }
    units.sort_by_key(|u| u.id);

    let player_defended = units
        .iter()
        .any(|u| u.side == Side::Player && u.has_weapon);
    let enemy_defended = units.iter().any(|u| u.side == Side::Enemy && u.has_weapon);

    let mut rounds: Vec<(Entity, u32)> = world
        .query::<&Projectile>()
        .iter()
        .map(|(entity, p)| (entity, p.id))
        .collect();
    rounds.sort_by_key(|(_, id)| *id);

    for (entity, _) in rounds {
        let Ok((p, pos_ref, vel_ref)) =
            world.query_one_mut::<(&Projectile, &Position, &Velocity)>(entity)
        else {
            continue;
        };
        let mut proj = p.clone();
        let mut pos = *pos_ref;
        let mut vel = *vel_ref;

        // Homing re-steer toward the sticky target, or the nearest live
        // enemy to the original aim point when the lock is gone.
        if let Some(homing) = proj.homing.as_mut() {
            let target = homing
                .locked
                .and_then(|id| units.iter().find(|u| u.id == id && u.side != proj.side))
                .or_else(|| {
                    units
                        .iter()
                        .filter(|u| u.side != proj.side)
                        .min_by(|a, b| {
                            let da = a.position.distance_sq_to(&proj.aim_point);
                            let db = b.position.distance_sq_to(&proj.aim_point);
                            da.total_cmp(&db)
                        })
                });
            if let Some(target) = target {
                homing.locked = Some(target.id);
                let speed = vel.speed().max(1.0);
                let current = vel.y.atan2(vel.x);
                let desired = pos.angle_to(&target.position);
                let diff = arena_ai::targeting::angle_difference(desired, current);
                let max_turn = homing.turn_rate * dt;
                let turned = current + diff.clamp(-max_turn, max_turn);
                vel = Velocity::new(turned.cos() * speed, turned.sin() * speed);
            }
        }

        vel.y += proj.gravity * dt;
        let prev = pos;
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        proj.prev = prev;
        proj.traveled += vel.speed() * dt;
        proj.ttl_secs -= dt;

        // Sweep against every opposing unit's live cells; nearest impact
        // first. Air-piercing rounds punch through air targets.
        let mut candidates: Vec<ImpactCandidate> = Vec::new();
        for (index, info) in units.iter().enumerate() {
            if info.side == proj.side {
                continue;
            }
            if info.kind == UnitKind::Air {
                let offset = (pos.y - info.position.y)
                    .abs()
                    .min((prev.y - info.position.y).abs());
                if offset > AIR_HIT_Y_TOLERANCE {
                    continue;
                }
            }
            for (cell_id, rect) in &info.cells {
                // Entered-this-tick gate: keeps piercing rounds from
                // re-damaging a cell they are still passing through.
                let entered = (rect.contains(&pos) || rect.intersects_segment(&prev, &pos))
                    && !rect.contains(&prev);
                if entered {
                    candidates.push(ImpactCandidate {
                        unit_index: index,
                        cell: *cell_id,
                        distance_sq: rect.center().distance_sq_to(&prev),
                    });
                }
            }
        }
        candidates.sort_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq));

        let mut stopped = false;
        let mut impact_unit: Option<u32> = None;
        for candidate in candidates {
            let info = &units[candidate.unit_index];
            events.push(BattleEvent::ProjectileHit {
                projectile: proj.id,
                unit: info.id,
                cell: candidate.cell,
            });
            if proj.intended_target == Some(info.id) {
                proj.hit_intended = true;
            }

            if let Ok((tag, hull, pilot)) =
                world.query_one_mut::<(&UnitTag, &mut Hull, &mut Pilot)>(info.entity)
            {
                let broke =
                    structure::apply_hit(tag, hull, pilot, candidate.cell, proj.damage, events);
                if broke {
                    effects::debris_burst(rng, pos, debris);
                }
            }

            if info.kind == UnitKind::Air && proj.pierce_air {
                continue;
            }
            impact_unit = Some(info.id);
            stopped = true;
            break;
        }

        // Impact-fuse payload detonates where the round stopped.
        if stopped {
            if let Some(blast) = proj.blast.filter(|b| b.fuse == FuseMode::Impact) {
                detonate(
                    world, &units, pos, blast, proj.damage, proj.side, impact_unit, rng, events,
                    particles,
                );
            }
        }

        // Sieging: rounds only reach a base once its defenders with
        // weapons are gone.
        if !stopped {
            let (base, defended, base_side) = match proj.side {
                Side::Player => (&mut *enemy_base, enemy_defended, Side::Enemy),
                Side::Enemy => (&mut *player_base, player_defended, Side::Player),
            };
            if !defended
                && base.hp > 0.0
                && (base.rect.contains(&pos) || base.rect.intersects_segment(&prev, &pos))
            {
                base.hp = (base.hp - proj.damage).max(0.0);
                events.push(BattleEvent::BaseDamaged {
                    side: base_side,
                    amount: proj.damage,
                    hp: base.hp,
                });
                stopped = true;
            }
        }

        let out_of_bounds = pos.x < -60.0
            || pos.x > BATTLEFIELD_WIDTH + 60.0
            || pos.y < -240.0
            || pos.y > BATTLEFIELD_HEIGHT + 60.0;
        let expired = !stopped
            && (proj.ttl_secs <= EXPIRY_EPS
                || proj.traveled + EXPIRY_EPS >= proj.max_distance
                || out_of_bounds);

        if expired {
            // Timed fuses burst wherever the clock ran out.
            if proj.ttl_secs <= EXPIRY_EPS {
                if let Some(blast) = proj.blast.filter(|b| b.fuse == FuseMode::Timed) {
                    detonate(
                        world, &units, pos, blast, proj.damage, proj.side, None, rng, events,
                        particles,
                    );
                }
            }

            // Online aim correction: an AI shot that died without touching
            // its intended target nudges the shooter's vertical bias a
            // fixed step against the observed miss.
            if !proj.hit_intended {
                if let Some(target) = proj
                    .intended_target
                    .and_then(|id| units.iter().find(|u| u.id == id))
                {
                    let miss = pos.y - target.position.y;
                    if let Some(shooter) = units
                        .iter()
                        .find(|u| u.id == proj.source_unit)
                        .filter(|u| controlled_unit != Some(u.id))
                    {
                        if let Ok(pilot) = world.query_one_mut::<&mut Pilot>(shooter.entity) {
                            pilot.aim_bias_y = (pilot.aim_bias_y - AIM_BIAS_STEP * miss.signum())
                                .clamp(-AIM_BIAS_LIMIT, AIM_BIAS_LIMIT);
                        }
                    }
                }
            }
        }

        if stopped || expired {
            despawn_buffer.push(entity);
        } else if let Ok((p, pos_ref, vel_ref)) =
            world.query_one_mut::<(&mut Projectile, &mut Position, &mut Velocity)>(entity)
        {
            *p = proj;
            *pos_ref = pos;
            *vel_ref = vel;
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Blast propagation: every alive enemy unit inside the radius, except
/// the directly-hit one, takes falloff damage through its nearest live
/// cell.
#[allow(clippy::too_many_arguments)]
fn detonate(
    world: &mut World,
    units: &[UnitInfo],
    center: Position,
    blast: BlastSpec,
    damage: f64,
    side: Side,
    exclude_unit: Option<u32>,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<BattleEvent>,
    particles: &mut Vec<Effect>,
) {
    events.push(BattleEvent::Detonation {
        x: center.x,
        y: center.y,
        radius: blast.radius,
    });
    effects::blast_burst(rng, center, blast.radius, particles);

    for info in units {
        if info.side == side || Some(info.id) == exclude_unit {
            continue;
        }
        if info.position.distance_to(&center) > blast.radius + CELL_SIZE * 4.0 {
            continue;
        }
        let Ok((tag, pos, hull, pilot)) =
            world.query_one_mut::<(&UnitTag, &Position, &mut Hull, &mut Pilot)>(info.entity)
        else {
            continue;
        };
        let Some(cell_id) = structure::nearest_live_cell(pos, hull, &center) else {
            continue;
        };
        let cell_center = hull
            .cell(cell_id)
            .map(|c| structure::cell_rect(pos, c).center())
            .unwrap_or(*pos);
        let distance = cell_center.distance_to(&center);
        if distance > blast.radius {
            continue;
        }

        let falloff = (1.0 - distance / blast.radius).powf(blast.falloff_power);
        structure::apply_hit(tag, hull, pilot, cell_id, damage * falloff, events);
    }
}
