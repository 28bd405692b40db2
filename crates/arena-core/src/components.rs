//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Cells and attachments cross-reference each other by small integer id
//! (arena + index), never by pointer.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Identity of a unit entity: stable id, army, and locomotion class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitTag {
    pub id: u32,
    pub side: Side,
    pub kind: UnitKind,
}

/// One destructible armor block in a unit's structure grid.
///
/// Material stats are resolved from the catalog at instantiation so the
/// hot damage path never does a table lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureCell {
    pub id: u16,
    /// Grid coordinate relative to the unit origin (integer cells).
    pub grid_x: i32,
    pub grid_y: i32,
    pub mass: f64,
    pub armor: f64,
    /// Accumulated strain at which the cell breaks.
    pub break_threshold: f64,
    /// Passive strain recovery per second.
    pub recovery: f64,
    pub strain: f64,
    pub destroyed: bool,
}

/// A functional module anchored to one structure cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u16,
    /// Id of the anchor cell.
    pub cell: u16,
    /// Quarter-turn rotation, 0..=3.
    pub rotation: u8,
    pub mass: f64,
    pub alive: bool,
    pub spec: AttachmentSpec,
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self.spec {
            AttachmentSpec::Control => AttachmentKind::Control,
            AttachmentSpec::Engine(_) => AttachmentKind::Engine,
            AttachmentSpec::Weapon(_) => AttachmentKind::Weapon,
            AttachmentSpec::Loader(_) => AttachmentKind::Loader,
            AttachmentSpec::Fuel => AttachmentKind::Fuel,
        }
    }
}

/// Kind-specific attachment stats, resolved from the part catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttachmentSpec {
    Control,
    Engine(EngineSpec),
    Weapon(WeaponSpec),
    Loader(LoaderSpec),
    Fuel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineSpec {
    /// Thrust contribution, divided by unit mass for raw speed.
    pub power: f64,
    /// Hard cap on the speed this engine can sustain.
    pub speed_cap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub class: WeaponClass,
    pub damage: f64,
    pub cooldown_secs: f64,
    pub range: f64,
    /// Muzzle speed (pixels/s).
    pub speed: f64,
    /// Gravity applied to the round (pixels/s², downward positive).
    pub gravity: f64,
    /// Uniform spread jitter half-width in degrees.
    pub spread_deg: f64,
    /// Permitted half-cone around the facing direction in degrees.
    pub shoot_angle_deg: f64,
    /// Ground shooters with this flag pass through air targets.
    pub pierce_air: bool,
    /// Lobbed delivery: halves muzzle speed, scales gravity.
    pub bomb_delivery: bool,
    pub blast: Option<BlastSpec>,
    /// Turn rate in rad/s for tracking rounds.
    pub homing_turn_rate: Option<f64>,
}

/// Explosive payload parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlastSpec {
    pub radius: f64,
    /// Exponent on `(1 - d/radius)` distance falloff.
    pub falloff_power: f64,
    pub fuse: FuseMode,
    /// Fuse delay for timed fuses (ignored for impact fuses).
    pub fuse_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSpec {
    /// Weapon classes this loader can charge.
    pub supports: Vec<WeaponClass>,
    pub min_load_time_secs: f64,
    /// Multiplier on the weapon cooldown when deriving load duration.
    pub load_multiplier: f64,
    pub fast_operation: bool,
    /// Extra charges this loader lets a serviced slot bank.
    pub store_capacity: u32,
    /// Cooldown applied to loader-fed weapons after firing.
    pub burst_interval_secs: f64,
}

/// Derived per-weapon firing state, one per weapon attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSlot {
    /// Id of the backing weapon attachment.
    pub attachment: u16,
    /// Cooldown remaining in seconds; can fire at <= 0.
    pub fire_timer: f64,
    pub auto_fire: bool,
    /// Loader-banked rounds for loader-managed classes.
    pub ready_charges: u32,
}

/// All weapon slots of a unit, in attachment order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponBattery {
    pub slots: Vec<WeaponSlot>,
    /// Player-prioritized slot; loaders service it first.
    pub selected: Option<usize>,
}

/// One loader's charge state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderState {
    /// Id of the backing loader attachment.
    pub attachment: u16,
    pub phase: LoaderPhase,
    /// Slot index currently being serviced.
    pub target_slot: Option<usize>,
    pub remaining_secs: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderBank {
    pub loaders: Vec<LoaderState>,
}

/// The full structural body of a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    pub cells: Vec<StructureCell>,
    pub attachments: Vec<Attachment>,
}

impl Hull {
    /// Alive-cell fraction in [0, 1]; the AI's health proxy.
    pub fn integrity(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let alive = self.cells.iter().filter(|c| !c.destroyed).count();
        alive as f64 / self.cells.len() as f64
    }

    pub fn cell(&self, id: u16) -> Option<&StructureCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn attachment(&self, id: u16) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.id == id)
    }

    /// The control attachment, if one is present (instantiation admits
    /// exactly one).
    pub fn control(&self) -> Option<&Attachment> {
        self.attachments
            .iter()
            .find(|a| matches!(a.spec, AttachmentSpec::Control))
    }

    /// Total mass of alive cells and attachments.
    pub fn total_mass(&self) -> f64 {
        let cells: f64 = self
            .cells
            .iter()
            .filter(|c| !c.destroyed)
            .map(|c| c.mass)
            .sum();
        let parts: f64 = self
            .attachments
            .iter()
            .filter(|a| a.alive)
            .map(|a| a.mass)
            .sum();
        (cells + parts).max(1.0)
    }

    /// Whether any alive attachment is a weapon.
    pub fn has_live_weapon(&self) -> bool {
        self.attachments
            .iter()
            .any(|a| a.alive && matches!(a.spec, AttachmentSpec::Weapon(_)))
    }
}

/// Per-tick mobility aggregate over the unit's alive engines.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Mobility {
    pub mass: f64,
    pub max_speed: f64,
    pub accel: f64,
    /// Per-second velocity retention factor (higher at speed).
    pub turn_drag: f64,
}

/// Forced-crash descent state for air units that lost lift.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirDrop {
    /// Ground-band y at which the unit is destroyed on arrival.
    pub landing_y: f64,
}

/// AI/control scratch state carried by every unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pilot {
    pub alive: bool,
    /// Horizontal facing: +1 right, -1 left.
    pub facing: i8,
    /// Persistent vertical aim correction from observed misses.
    pub aim_bias_y: f64,
    /// Diagnostic trace of behavior-tree nodes visited last tick.
    pub decision_path: String,
    /// Why the last tick produced no shot plan, if it didn't.
    pub block_reason: Option<BlockReason>,
    pub air_drop: Option<AirDrop>,
}

impl Default for Pilot {
    fn default() -> Self {
        Self {
            alive: true,
            facing: 1,
            aim_bias_y: 0.0,
            decision_path: String::new(),
            block_reason: None,
            air_drop: None,
        }
    }
}

/// An in-flight round. Position/Velocity live in their own components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub side: Side,
    /// Unit id of the shooter.
    pub source_unit: u32,
    /// Unit id the shooter intended to hit, for AI feedback.
    pub intended_target: Option<u32>,
    /// Original aim point, used by homing retargeting.
    pub aim_point: Position,
    pub class: WeaponClass,
    pub damage: f64,
    pub gravity: f64,
    pub traveled: f64,
    pub max_distance: f64,
    pub ttl_secs: f64,
    /// Position at the previous tick, for swept collision.
    pub prev: Position,
    pub pierce_air: bool,
    pub blast: Option<BlastSpec>,
    pub homing: Option<HomingState>,
    /// Set once the round has damaged its intended target.
    pub hit_intended: bool,
}

/// Homing guidance state for tracking rounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HomingState {
    /// Max steering rate in rad/s.
    pub turn_rate: f64,
    /// Sticky target; re-acquired near the aim point when absent.
    pub locked: Option<u32>,
}
