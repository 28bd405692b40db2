//! Enemy spawn economy: gas accrual, deploy clock, and roster choice.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::catalog::PartCatalog;
use arena_core::components::{Pilot, UnitTag};
use arena_core::constants::ENEMY_DEPLOY_INTERVAL_SECS;
use arena_core::enums::Side;
use arena_core::events::BattleEvent;

use crate::economy::SpawnEconomy;
use crate::unit_factory;

/// Accrue enemy gas and deploy a roster unit when the clock fires, the
/// cap allows, and something is affordable.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    catalog: &PartCatalog,
    economy: &mut SpawnEconomy,
    dt: f64,
    next_unit_id: &mut u32,
    events: &mut Vec<BattleEvent>,
) {
    economy.enemy_gas += economy.enemy_gas_rate * dt;
    economy.enemy_deploy_timer -= dt;
    if economy.enemy_deploy_timer > 0.0 {
        return;
    }
    economy.enemy_deploy_timer += ENEMY_DEPLOY_INTERVAL_SECS;

    if alive_count(world, Side::Enemy) >= economy.enemy_cap {
        return;
    }

    let affordable: Vec<&String> = catalog
        .enemy_roster
        .iter()
        .filter(|id| {
            catalog
                .templates
                .get(*id)
                .is_some_and(|t| t.gas_cost <= economy.enemy_gas)
        })
        .collect();
    if affordable.is_empty() {
        return;
    }

    let template_id = affordable[rng.gen_range(0..affordable.len())].clone();
    let Some(template) = catalog.templates.get(&template_id) else {
        return;
    };
    let cost = template.gas_cost;
    let kind = template.kind;

    let unit_id = *next_unit_id;
    let position = unit_factory::spawn_position(Side::Enemy, kind, rng);
    if unit_factory::instantiate(world, catalog, &template_id, Side::Enemy, unit_id, position)
        .is_some()
    {
        *next_unit_id += 1;
        economy.enemy_gas -= cost;
        events.push(BattleEvent::UnitDeployed {
            unit: unit_id,
            side: Side::Enemy,
        });
    }
}

/// Number of alive units on a side.
pub fn alive_count(world: &mut World, side: Side) -> u32 {
    let mut count = 0;
    for (_entity, (tag, pilot)) in world.query_mut::<(&UnitTag, &Pilot)>() {
        if tag.side == side && pilot.alive {
            count += 1;
        }
    }
    count
}
