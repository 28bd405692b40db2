//! Base and spawn-economy data models.
//!
//! Stored on `BattleSession` directly, not as ECS entities.

use arena_core::commands::NodeConfig;
use arena_core::constants::*;
use arena_core::types::Rect;

/// One side's base: a rectangle with hit points.
#[derive(Debug, Clone)]
pub struct BaseStatus {
    pub rect: Rect,
    pub hp: f64,
    pub max_hp: f64,
}

impl BaseStatus {
    /// Player base flush against the left edge, enemy against the right.
    pub fn player(max_hp: f64) -> Self {
        Self {
            rect: Rect::new(0.0, BASE_TOP_Y, BASE_WIDTH, BATTLEFIELD_HEIGHT - BASE_TOP_Y),
            hp: max_hp,
            max_hp,
        }
    }

    pub fn enemy(max_hp: f64) -> Self {
        Self {
            rect: Rect::new(
                BATTLEFIELD_WIDTH - BASE_WIDTH,
                BASE_TOP_Y,
                BASE_WIDTH,
                BATTLEFIELD_HEIGHT - BASE_TOP_Y,
            ),
            hp: max_hp,
            max_hp,
        }
    }
}

/// Gas pools, army caps, and the enemy deploy clock.
#[derive(Debug, Clone)]
pub struct SpawnEconomy {
    pub player_gas: f64,
    pub player_cap: u32,
    pub enemy_gas: f64,
    pub enemy_gas_rate: f64,
    pub enemy_cap: u32,
    pub enemy_deploy_timer: f64,
}

impl SpawnEconomy {
    /// Derive the enemy economy from the node's difficulty.
    pub fn from_node(node: &NodeConfig) -> Self {
        let difficulty = node.difficulty.max(0.0);
        let derived_cap = ENEMY_CAP_BASE + (difficulty as u32) * ENEMY_CAP_PER_DIFFICULTY;
        Self {
            player_gas: PLAYER_STARTING_GAS,
            player_cap: PLAYER_ARMY_CAP,
            enemy_gas: 0.0,
            enemy_gas_rate: ENEMY_GAS_RATE_BASE + ENEMY_GAS_RATE_PER_DIFFICULTY * difficulty,
            enemy_cap: node.enemy_cap_override.unwrap_or(derived_cap),
            enemy_deploy_timer: ENEMY_DEPLOY_INTERVAL_SECS,
        }
    }
}

impl Default for SpawnEconomy {
    fn default() -> Self {
        Self::from_node(&NodeConfig::default())
    }
}
