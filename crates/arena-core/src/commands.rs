//! External control surface: per-tick input intent and battle start config.
//!
//! The session consumes an `InputIntent` each tick for the single
//! externally-controlled unit; everything else decides through an injected
//! controller.

use serde::{Deserialize, Serialize};

/// Directional key state for the controlled unit, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputIntent {
    /// Movement vector in [-1, 1]² derived from the key state.
    pub fn direction(&self) -> (f64, f64) {
        let x = (self.right as i8 - self.left as i8) as f64;
        let y = (self.down as i8 - self.up as i8) as f64;
        (x, y)
    }
}

/// Battle-node configuration applied by `start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Difficulty scalar; drives enemy gas rate and army cap.
    pub difficulty: f64,
    /// Override for both bases' max HP.
    pub base_hp_override: Option<f64>,
    /// Override for the derived enemy army cap.
    pub enemy_cap_override: Option<u32>,
    /// Starter unit template ids spawned for the player at battle start.
    pub player_starters: Vec<String>,
    /// Starter unit template ids spawned for the enemy at battle start.
    pub enemy_starters: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            difficulty: 1.0,
            base_hp_override: None,
            enemy_cap_override: None,
            player_starters: vec!["rover".to_string(), "gun-buggy".to_string()],
            enemy_starters: vec!["rover".to_string(), "gun-buggy".to_string()],
        }
    }
}

/// Engine construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// RNG seed for determinism. Same seed + same inputs = same battle.
    pub seed: u64,
    /// When false, `deploy_unit` skips the gas charge (test/replay mode).
    pub charge_gas: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            charge_gas: true,
        }
    }
}
