//! Loader state machines: charging ammunition-limited weapon classes.

use hecs::World;

use arena_core::components::{
    AttachmentSpec, Hull, LoaderBank, Pilot, WeaponBattery, WeaponSpec,
};
use arena_core::constants::{LOADER_FAST_FACTOR, LOADER_SLOW_FACTOR};
use arena_core::enums::LoaderPhase;

use crate::unit_factory::loader_capacity_for_class;

/// Advance every loader one tick: finish loads, abandon dead targets,
/// and pick new slots to service.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (hull, battery, bank, pilot)) in
        world.query_mut::<(&Hull, &mut WeaponBattery, &mut LoaderBank, &Pilot)>()
    {
        if !pilot.alive {
            continue;
        }

        for li in 0..bank.loaders.len() {
            let loader_attachment = bank.loaders[li].attachment;
            let Some((loader_alive, loader_spec)) = hull
                .attachment(loader_attachment)
                .and_then(|a| match &a.spec {
                    AttachmentSpec::Loader(spec) => Some((a.alive, spec.clone())),
                    _ => None,
                })
            else {
                continue;
            };

            // A dead loader drops whatever it was doing.
            if !loader_alive {
                bank.loaders[li].phase = LoaderPhase::Idle;
                bank.loaders[li].target_slot = None;
                bank.loaders[li].remaining_secs = 0.0;
                continue;
            }

            match bank.loaders[li].phase {
                LoaderPhase::Loading => {
                    let still_valid = bank.loaders[li].target_slot.is_some_and(|si| {
                        battery.slots.get(si).is_some_and(|slot| {
                            slot_weapon(hull, slot.attachment).is_some_and(|(alive, weapon)| {
                                alive
                                    && slot.ready_charges
                                        < loader_capacity_for_class(hull, weapon.class)
                            })
                        })
                    });
                    if !still_valid {
                        bank.loaders[li].phase = LoaderPhase::Idle;
                        bank.loaders[li].target_slot = None;
                        bank.loaders[li].remaining_secs = 0.0;
                        continue;
                    }

                    bank.loaders[li].remaining_secs -= dt;
                    if bank.loaders[li].remaining_secs <= 0.0 {
                        if let Some(si) = bank.loaders[li].target_slot {
                            if let Some((_, weapon)) =
                                slot_weapon(hull, battery.slots[si].attachment)
                            {
                                let cap = loader_capacity_for_class(hull, weapon.class);
                                let slot = &mut battery.slots[si];
                                slot.ready_charges = (slot.ready_charges + 1).min(cap);
                            }
                        }
                        bank.loaders[li].phase = LoaderPhase::Idle;
                        bank.loaders[li].target_slot = None;
                        bank.loaders[li].remaining_secs = 0.0;
                    }
                }
                LoaderPhase::Idle => {
                    // Slots already claimed by other loaders this tick.
                    let claimed: Vec<usize> = bank
                        .loaders
                        .iter()
                        .filter_map(|l| l.target_slot)
                        .collect();

                    // Player-selected slot first, then slot order.
                    let mut order: Vec<usize> = Vec::with_capacity(battery.slots.len());
                    if let Some(sel) = battery.selected {
                        if sel < battery.slots.len() {
                            order.push(sel);
                        }
                    }
                    for si in 0..battery.slots.len() {
                        if !order.contains(&si) {
                            order.push(si);
                        }
                    }

                    for si in order {
                        if claimed.contains(&si) {
                            continue;
                        }
                        let slot = &battery.slots[si];
                        let Some((weapon_alive, weapon)) = slot_weapon(hull, slot.attachment)
                        else {
                            continue;
                        };
                        if !weapon_alive || !weapon.class.needs_loader() {
                            continue;
                        }
                        if !loader_spec.supports.contains(&weapon.class) {
                            continue;
                        }
                        if slot.ready_charges >= loader_capacity_for_class(hull, weapon.class) {
                            continue;
                        }

                        let pace = if loader_spec.fast_operation {
                            LOADER_FAST_FACTOR
                        } else {
                            LOADER_SLOW_FACTOR
                        };
                        let duration = (weapon.cooldown_secs
                            * loader_spec.load_multiplier
                            * pace)
                            .max(loader_spec.min_load_time_secs);

                        bank.loaders[li].phase = LoaderPhase::Loading;
                        bank.loaders[li].target_slot = Some(si);
                        bank.loaders[li].remaining_secs = duration;
                        break;
                    }
                }
            }
        }
    }
}

/// Resolve a slot's backing weapon attachment: (alive, spec).
fn slot_weapon(hull: &Hull, attachment_id: u16) -> Option<(bool, &WeaponSpec)> {
    hull.attachment(attachment_id).and_then(|a| match &a.spec {
        AttachmentSpec::Weapon(w) => Some((a.alive, w)),
        _ => None,
    })
}
