//! Battle state snapshot — the complete visible state produced each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::BattleEvent;
use crate::types::{Position, Rect, SimTime, Velocity};

/// Complete battle state emitted after each tick.
///
/// Read-only for callers; the renderer and harness must never mutate it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    /// True between `start` and outcome.
    pub active: bool,
    pub outcome: Option<Outcome>,
    pub units: Vec<UnitView>,
    pub projectiles: Vec<ProjectileView>,
    pub player_base: BaseView,
    pub enemy_base: BaseView,
    pub economy: EconomyView,
    pub particles: Vec<EffectView>,
    pub debris: Vec<EffectView>,
    pub events: Vec<BattleEvent>,
}

/// Terminal battle result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub victory: bool,
    pub reason: String,
}

/// One unit as seen by the renderer and the harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: u32,
    pub side: Side,
    pub kind: UnitKind,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: i8,
    /// Alive-cell fraction in [0, 1].
    pub integrity: f64,
    pub alive: bool,
    pub air_dropping: bool,
    pub cells: Vec<CellView>,
    pub weapons: Vec<WeaponSlotView>,
    /// Behavior-tree node trace from the last decision (diagnostic).
    pub decision_path: String,
    pub block_reason: Option<BlockReason>,
}

/// One structure cell for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellView {
    pub id: u16,
    pub grid_x: i32,
    pub grid_y: i32,
    /// Strain as a fraction of the break threshold.
    pub strain_ratio: f64,
    pub destroyed: bool,
}

/// One weapon slot's firing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSlotView {
    pub slot: usize,
    pub class: WeaponClass,
    pub fire_timer: f64,
    pub ready_charges: u32,
    pub auto_fire: bool,
}

/// One in-flight projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub side: Side,
    pub class: WeaponClass,
    pub position: Position,
    pub velocity: Velocity,
}

/// A base's rectangle and remaining HP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseView {
    pub rect: Rect,
    pub hp: f64,
    pub max_hp: f64,
}

/// Spawn economy status for both sides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyView {
    pub player_gas: f64,
    pub player_unit_count: u32,
    pub player_army_cap: u32,
    pub enemy_gas: f64,
    pub enemy_unit_count: u32,
    pub enemy_army_cap: u32,
}

/// A short-lived visual effect (debris fragment or blast particle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub position: Position,
    pub ttl_secs: f64,
}
