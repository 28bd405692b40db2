//! Events emitted by the simulation for UI, audio, and harness feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Battle events, drained into each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEvent {
    /// A unit entered the field.
    UnitDeployed { unit: u32, side: Side },
    /// A weapon slot fired.
    ShotFired {
        unit: u32,
        slot: usize,
        class: WeaponClass,
    },
    /// A projectile struck a structure cell.
    ProjectileHit { projectile: u32, unit: u32, cell: u16 },
    /// A structure cell broke (directly or by disconnection cascade).
    CellDestroyed { unit: u32, cell: u16 },
    /// An attachment went down with its anchor cell.
    AttachmentDisabled { unit: u32, attachment: u16 },
    /// A unit left the battle.
    UnitDestroyed {
        unit: u32,
        side: Side,
        reason: UnitLossReason,
    },
    /// A base took projectile damage.
    BaseDamaged { side: Side, amount: f64, hp: f64 },
    /// An explosive round detonated.
    Detonation { x: f64, y: f64, radius: f64 },
    /// The battle reached an outcome.
    BattleEnded { victory: bool, reason: String },
}
