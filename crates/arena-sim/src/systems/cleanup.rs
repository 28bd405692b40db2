//! Cleanup system: removes units that died this tick.
//!
//! Projectile teardown happens inside the projectile pass, where expiry
//! and impact are decided; units linger until here so death events and
//! final state stay visible to every system in the same tick.

use hecs::{Entity, World};

use arena_core::components::Pilot;

/// Despawn every unit whose pilot flag dropped. Uses a pre-allocated
/// buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, pilot) in world.query_mut::<&Pilot>() {
        if !pilot.alive {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
