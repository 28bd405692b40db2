//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which army a unit, projectile, or base belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Locomotion class of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    #[default]
    Ground,
    Air,
}

/// Functional category of an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    Control,
    Engine,
    Weapon,
    Loader,
    Fuel,
}

/// Weapon classes. Heavy-shot, explosive, and tracking rounds require a
/// dedicated loader to build up ready charges before they can fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    #[default]
    Light,
    HeavyShot,
    Explosive,
    Tracking,
}

impl WeaponClass {
    /// Whether rounds of this class are charged by loaders rather than
    /// cycling on the weapon's own cooldown.
    pub fn needs_loader(self) -> bool {
        !matches!(self, WeaponClass::Light)
    }
}

/// Detonation trigger for explosive rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuseMode {
    /// Detonate on first structural contact.
    #[default]
    Impact,
    /// Detonate when the fuse timer expires, wherever the round is.
    Timed,
}

/// Why the AI could not produce a shot plan this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// Target beyond every ready weapon's effective range.
    OutOfRange,
    /// Target reachable but outside every permitted firing cone.
    AngleLocked,
    /// No weapon slot is ready (cooldown or empty charges).
    NotReady,
    /// Ground shooter vs ground target outside the vertical band.
    AxisMisaligned,
}

/// Why a unit left the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitLossReason {
    /// Control attachment or its cell destroyed, or no cells remain.
    StructureFailure,
    /// Air unit crashed after losing lift.
    Crash,
}

/// Loader state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoaderPhase {
    #[default]
    Idle,
    Loading,
}
