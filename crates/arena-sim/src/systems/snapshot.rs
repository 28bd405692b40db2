//! Snapshot assembly: flattens the world into a `BattleSnapshot`.

use hecs::World;

use arena_core::components::*;
use arena_core::events::BattleEvent;
use arena_core::state::*;
use arena_core::types::{Position, SimTime, Velocity};

use crate::economy::{BaseStatus, SpawnEconomy};
use crate::systems::effects::{self, Effect};
use crate::systems::spawner;

/// Build the tick's snapshot. Units and projectiles are emitted in id
/// order so serialized snapshots compare bytewise across replays.
#[allow(clippy::too_many_arguments)]
pub fn build(
    world: &mut World,
    time: &SimTime,
    active: bool,
    outcome: Option<Outcome>,
    player_base: &BaseStatus,
    enemy_base: &BaseStatus,
    economy: &SpawnEconomy,
    particles: &[Effect],
    debris: &[Effect],
    events: Vec<BattleEvent>,
) -> BattleSnapshot {
    let mut units: Vec<UnitView> = Vec::new();
    {
        let mut query =
            world.query::<(&UnitTag, &Position, &Velocity, &Hull, &WeaponBattery, &Pilot)>();
        for (_entity, (tag, pos, vel, hull, battery, pilot)) in query.iter() {
            units.push(UnitView {
                id: tag.id,
                side: tag.side,
                kind: tag.kind,
                position: *pos,
                velocity: *vel,
                facing: pilot.facing,
                integrity: hull.integrity(),
                alive: pilot.alive,
                air_dropping: pilot.air_drop.is_some(),
                cells: hull
                    .cells
                    .iter()
                    .map(|c| CellView {
                        id: c.id,
                        grid_x: c.grid_x,
                        grid_y: c.grid_y,
                        strain_ratio: if c.break_threshold > 0.0 {
                            (c.strain / c.break_threshold).clamp(0.0, 1.0)
                        } else {
                            1.0
                        },
                        destroyed: c.destroyed,
                    })
                    .collect(),
                weapons: battery
                    .slots
                    .iter()
                    .enumerate()
                    .map(|(index, slot)| WeaponSlotView {
                        slot: index,
                        class: hull
                            .attachment(slot.attachment)
                            .and_then(|a| match &a.spec {
                                AttachmentSpec::Weapon(w) => Some(w.class),
                                _ => None,
                            })
                            .unwrap_or_default(),
                        fire_timer: slot.fire_timer,
                        ready_charges: slot.ready_charges,
                        auto_fire: slot.auto_fire,
                    })
                    .collect(),
                decision_path: pilot.decision_path.clone(),
                block_reason: pilot.block_reason,
            });
        }
    }
    units.sort_by_key(|u| u.id);

    let mut projectiles: Vec<ProjectileView> = Vec::new();
    {
        let mut query = world.query::<(&Projectile, &Position, &Velocity)>();
        for (_entity, (p, pos, vel)) in query.iter() {
            projectiles.push(ProjectileView {
                id: p.id,
                side: p.side,
                class: p.class,
                position: *pos,
                velocity: *vel,
            });
        }
    }
    projectiles.sort_by_key(|p| p.id);

    let economy_view = EconomyView {
        player_gas: economy.player_gas,
        player_unit_count: spawner::alive_count(world, arena_core::enums::Side::Player),
        player_army_cap: economy.player_cap,
        enemy_gas: economy.enemy_gas,
        enemy_unit_count: spawner::alive_count(world, arena_core::enums::Side::Enemy),
        enemy_army_cap: economy.enemy_cap,
    };

    BattleSnapshot {
        time: *time,
        active,
        outcome,
        units,
        projectiles,
        player_base: BaseView {
            rect: player_base.rect,
            hp: player_base.hp,
            max_hp: player_base.max_hp,
        },
        enemy_base: BaseView {
            rect: enemy_base.rect,
            hp: enemy_base.hp,
            max_hp: enemy_base.max_hp,
        },
        economy: economy_view,
        particles: effects::views(particles),
        debris: effects::views(debris),
        events,
    }
}
