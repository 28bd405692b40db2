//! Decision context and output types.
//!
//! The simulation flattens the relevant battle state into a
//! `DecisionContext` per AI-controlled unit per tick; controllers return a
//! `CombatDecision`. Keeping both as plain data lets every controller be
//! tested without a world.

use serde::{Deserialize, Serialize};

use arena_core::enums::{BlockReason, Side, UnitKind, WeaponClass};
use arena_core::types::{Position, Velocity};

/// One weapon slot as the AI sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotContext {
    pub index: usize,
    pub class: WeaponClass,
    pub damage: f64,
    pub range: f64,
    /// Muzzle speed.
    pub speed: f64,
    pub gravity: f64,
    pub shoot_angle_deg: f64,
    /// Fire timer elapsed and, for loader classes, a charge is banked.
    pub ready: bool,
}

/// The controlled unit's own state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfContext {
    pub id: u32,
    pub side: Side,
    pub kind: UnitKind,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: i8,
    pub integrity: f64,
    pub max_speed: f64,
    pub aim_bias_y: f64,
    pub slots: Vec<SlotContext>,
}

/// One visible enemy unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyContext {
    pub id: u32,
    pub kind: UnitKind,
    pub position: Position,
    pub velocity: Velocity,
    pub weapon_count: u32,
}

/// One in-flight projectile, reduced to what threat scoring needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileContext {
    pub side: Side,
    pub position: Position,
}

/// Everything a controller may consult for one decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionContext {
    pub unit: SelfContext,
    pub enemies: Vec<EnemyContext>,
    pub projectiles: Vec<ProjectileContext>,
    /// Enemy base center — the fallback attack point.
    pub base_target: Position,
    /// Own base center — the retreat anchor.
    pub own_base: Position,
    /// Session default engagement distance.
    pub desired_range: f64,
    pub dt: f64,
}

/// A firing order for one weapon slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireRequest {
    pub slot: usize,
    pub aim: Position,
    pub intended_target: Option<u32>,
}

/// Movement + fire intent produced by a controller each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatDecision {
    /// Movement intent in roughly [-1, 1] per axis.
    pub move_x: f64,
    pub move_y: f64,
    /// Air-unit descent permission.
    pub allow_descend: bool,
    /// Horizontal facing: +1 right, -1 left. 0 keeps the current facing.
    pub facing: i8,
    pub fire_requests: Vec<FireRequest>,
    /// Diagnostic node trace; not consulted by the engine.
    pub decision_path: String,
    pub block_reason: Option<BlockReason>,
}
