//! Short-lived visual effects: debris fragments and blast particles.
//!
//! Effects are cosmetic — they live in plain session-owned lists, not the
//! ECS world, and never influence combat.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::constants::*;
use arena_core::state::EffectView;
use arena_core::types::{Position, Velocity};

#[derive(Debug, Clone)]
pub struct Effect {
    pub position: Position,
    pub velocity: Velocity,
    pub ttl_secs: f64,
}

/// Age and advect all effects, dropping the expired ones.
pub fn update(effects: &mut Vec<Effect>, dt: f64) {
    for effect in effects.iter_mut() {
        effect.position.x += effect.velocity.x * dt;
        effect.position.y += effect.velocity.y * dt;
        effect.ttl_secs -= dt;
    }
    effects.retain(|e| e.ttl_secs > 0.0);
}

/// Scatter debris fragments from a broken cell.
pub fn debris_burst(rng: &mut ChaCha8Rng, at: Position, out: &mut Vec<Effect>) {
    for _ in 0..DEBRIS_PER_CELL {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let speed = rng.gen_range(30.0..120.0);
        out.push(Effect {
            position: at,
            velocity: Velocity::new(angle.cos() * speed, angle.sin() * speed - 40.0),
            ttl_secs: DEBRIS_TTL_SECS,
        });
    }
}

/// Emit a ring of particles for a detonation.
pub fn blast_burst(rng: &mut ChaCha8Rng, at: Position, radius: f64, out: &mut Vec<Effect>) {
    for i in 0..PARTICLES_PER_BLAST {
        let angle = i as f64 / PARTICLES_PER_BLAST as f64 * std::f64::consts::TAU;
        let speed = rng.gen_range(0.5..1.0) * radius / PARTICLE_TTL_SECS;
        out.push(Effect {
            position: at,
            velocity: Velocity::new(angle.cos() * speed, angle.sin() * speed),
            ttl_secs: PARTICLE_TTL_SECS,
        });
    }
}

pub fn views(effects: &[Effect]) -> Vec<EffectView> {
    effects
        .iter()
        .map(|e| EffectView {
            position: e.position,
            ttl_secs: e.ttl_secs,
        })
        .collect()
}
