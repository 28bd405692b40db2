//! Static part catalog: materials, attachment parts, and unit templates.
//!
//! The catalog is read-only configuration supplied at session construction.
//! `PartCatalog::standard()` builds the stock roster; deployments and file
//! formats elsewhere can deserialize their own via serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::{BlastSpec, EngineSpec, LoaderSpec, WeaponSpec};
use crate::enums::{FuseMode, UnitKind, WeaponClass};

/// Armor material stats, keyed by material id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaterialDef {
    pub mass: f64,
    pub armor: f64,
    /// Strain at which a cell of this material breaks.
    pub break_threshold: f64,
    /// Passive strain recovery per second.
    pub recovery: f64,
}

/// One attachment part definition, keyed by part id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDef {
    pub mass: f64,
    pub spec: PartSpec,
}

/// Kind-specific part stats. Mirrors `AttachmentSpec` minus runtime state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PartSpec {
    Control,
    Engine(EngineSpec),
    Weapon(WeaponSpec),
    Loader(LoaderSpec),
    Fuel,
}

/// One cell of a template's structure grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCell {
    pub x: i32,
    pub y: i32,
    pub material: String,
}

/// One attachment placement in a template, anchored by grid coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateAttachment {
    pub x: i32,
    pub y: i32,
    pub part: String,
    #[serde(default)]
    pub rotation: u8,
}

/// A deployable unit design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub kind: UnitKind,
    pub gas_cost: f64,
    pub cells: Vec<TemplateCell>,
    pub attachments: Vec<TemplateAttachment>,
}

/// The full static configuration consumed by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartCatalog {
    pub materials: BTreeMap<String, MaterialDef>,
    pub parts: BTreeMap<String, PartDef>,
    pub templates: BTreeMap<String, UnitTemplate>,
    /// Template ids the enemy economy draws from.
    pub enemy_roster: Vec<String>,
}

impl PartCatalog {
    /// Stock catalog: three materials, a small part set, and five designs
    /// (three ground, two air).
    pub fn standard() -> Self {
        let mut materials = BTreeMap::new();
        materials.insert(
            "frame".to_string(),
            MaterialDef {
                mass: 1.0,
                armor: 4.0,
                break_threshold: 60.0,
                recovery: 1.5,
            },
        );
        materials.insert(
            "plate".to_string(),
            MaterialDef {
                mass: 1.8,
                armor: 12.0,
                break_threshold: 110.0,
                recovery: 2.0,
            },
        );
        materials.insert(
            "heavy-plate".to_string(),
            MaterialDef {
                mass: 3.2,
                armor: 26.0,
                break_threshold: 190.0,
                recovery: 1.0,
            },
        );

        let mut parts = BTreeMap::new();
        parts.insert(
            "control-core".to_string(),
            PartDef {
                mass: 1.2,
                spec: PartSpec::Control,
            },
        );
        parts.insert(
            "fuel-tank".to_string(),
            PartDef {
                mass: 0.8,
                spec: PartSpec::Fuel,
            },
        );
        parts.insert(
            "wheel-motor".to_string(),
            PartDef {
                mass: 1.5,
                spec: PartSpec::Engine(EngineSpec {
                    power: 9.0,
                    speed_cap: 120.0,
                }),
            },
        );
        parts.insert(
            "lift-rotor".to_string(),
            PartDef {
                mass: 1.1,
                spec: PartSpec::Engine(EngineSpec {
                    power: 11.0,
                    speed_cap: 160.0,
                }),
            },
        );
        parts.insert(
            "autogun".to_string(),
            PartDef {
                mass: 1.4,
                spec: PartSpec::Weapon(WeaponSpec {
                    class: WeaponClass::Light,
                    damage: 22.0,
                    cooldown_secs: 0.9,
                    range: 360.0,
                    speed: 420.0,
                    gravity: 70.0,
                    spread_deg: 2.5,
                    shoot_angle_deg: 55.0,
                    pierce_air: true,
                    bomb_delivery: false,
                    blast: None,
                    homing_turn_rate: None,
                }),
            },
        );
        parts.insert(
            "long-cannon".to_string(),
            PartDef {
                mass: 2.6,
                spec: PartSpec::Weapon(WeaponSpec {
                    class: WeaponClass::HeavyShot,
                    damage: 85.0,
                    cooldown_secs: 2.8,
                    range: 560.0,
                    speed: 520.0,
                    gravity: 110.0,
                    spread_deg: 1.2,
                    shoot_angle_deg: 40.0,
                    pierce_air: false,
                    bomb_delivery: false,
                    blast: None,
                    homing_turn_rate: None,
                }),
            },
        );
        parts.insert(
            "mortar".to_string(),
            PartDef {
                mass: 2.2,
                spec: PartSpec::Weapon(WeaponSpec {
                    class: WeaponClass::Explosive,
                    damage: 60.0,
                    cooldown_secs: 3.4,
                    range: 480.0,
                    speed: 360.0,
                    gravity: 140.0,
                    spread_deg: 4.0,
                    shoot_angle_deg: 65.0,
                    pierce_air: false,
                    bomb_delivery: true,
                    blast: Some(BlastSpec {
                        radius: 80.0,
                        falloff_power: 1.6,
                        fuse: FuseMode::Impact,
                        fuse_secs: 0.0,
                    }),
                    homing_turn_rate: None,
                }),
            },
        );
        parts.insert(
            "seeker-pod".to_string(),
            PartDef {
                mass: 1.9,
                spec: PartSpec::Weapon(WeaponSpec {
                    class: WeaponClass::Tracking,
                    damage: 48.0,
                    cooldown_secs: 3.0,
                    range: 520.0,
                    speed: 300.0,
                    gravity: 0.0,
                    spread_deg: 6.0,
                    shoot_angle_deg: 75.0,
                    pierce_air: false,
                    bomb_delivery: false,
                    blast: Some(BlastSpec {
                        radius: 48.0,
                        falloff_power: 1.3,
                        fuse: FuseMode::Impact,
                        fuse_secs: 0.0,
                    }),
                    homing_turn_rate: Some(2.4),
                }),
            },
        );
        parts.insert(
            "shell-loader".to_string(),
            PartDef {
                mass: 1.6,
                spec: PartSpec::Loader(LoaderSpec {
                    supports: vec![WeaponClass::HeavyShot, WeaponClass::Explosive],
                    min_load_time_secs: 1.2,
                    load_multiplier: 0.9,
                    fast_operation: false,
                    store_capacity: 1,
                    burst_interval_secs: 0.35,
                }),
            },
        );
        parts.insert(
            "auto-loader".to_string(),
            PartDef {
                mass: 2.0,
                spec: PartSpec::Loader(LoaderSpec {
                    supports: vec![
                        WeaponClass::HeavyShot,
                        WeaponClass::Explosive,
                        WeaponClass::Tracking,
                    ],
                    min_load_time_secs: 0.8,
                    load_multiplier: 0.7,
                    fast_operation: true,
                    store_capacity: 2,
                    burst_interval_secs: 0.25,
                }),
            },
        );

        let mut templates = BTreeMap::new();
        templates.insert("rover".to_string(), rover_template());
        templates.insert("gun-buggy".to_string(), gun_buggy_template());
        templates.insert("siege-crawler".to_string(), siege_crawler_template());
        templates.insert("gunship".to_string(), gunship_template());
        templates.insert("strike-drone".to_string(), strike_drone_template());

        Self {
            materials,
            parts,
            templates,
            enemy_roster: vec![
                "rover".to_string(),
                "gun-buggy".to_string(),
                "siege-crawler".to_string(),
                "strike-drone".to_string(),
            ],
        }
    }
}

fn cell(x: i32, y: i32, material: &str) -> TemplateCell {
    TemplateCell {
        x,
        y,
        material: material.to_string(),
    }
}

fn part(x: i32, y: i32, id: &str) -> TemplateAttachment {
    TemplateAttachment {
        x,
        y,
        part: id.to_string(),
        rotation: 0,
    }
}

/// Cheap 3-cell scout: core, one motor, one autogun.
fn rover_template() -> UnitTemplate {
    UnitTemplate {
        kind: UnitKind::Ground,
        gas_cost: 30.0,
        cells: vec![cell(0, 0, "frame"), cell(1, 0, "frame"), cell(2, 0, "frame")],
        attachments: vec![
            part(0, 0, "wheel-motor"),
            part(1, 0, "control-core"),
            part(2, 0, "autogun"),
        ],
    }
}

/// Mid-tier skirmisher with two guns and plated front.
fn gun_buggy_template() -> UnitTemplate {
    UnitTemplate {
        kind: UnitKind::Ground,
        gas_cost: 55.0,
        cells: vec![
            cell(0, 0, "plate"),
            cell(1, 0, "frame"),
            cell(2, 0, "frame"),
            cell(0, 1, "frame"),
            cell(1, 1, "frame"),
        ],
        attachments: vec![
            part(0, 0, "autogun"),
            part(1, 0, "control-core"),
            part(2, 0, "autogun"),
            part(0, 1, "wheel-motor"),
            part(1, 1, "wheel-motor"),
        ],
    }
}

/// Loader-fed artillery platform behind heavy plate.
fn siege_crawler_template() -> UnitTemplate {
    UnitTemplate {
        kind: UnitKind::Ground,
        gas_cost: 110.0,
        cells: vec![
            cell(0, 0, "heavy-plate"),
            cell(1, 0, "plate"),
            cell(2, 0, "plate"),
            cell(3, 0, "frame"),
            cell(0, 1, "heavy-plate"),
            cell(1, 1, "frame"),
            cell(2, 1, "frame"),
            cell(3, 1, "frame"),
        ],
        attachments: vec![
            part(1, 0, "long-cannon"),
            part(2, 0, "mortar"),
            part(3, 0, "control-core"),
            part(1, 1, "shell-loader"),
            part(2, 1, "wheel-motor"),
            part(3, 1, "wheel-motor"),
        ],
    }
}

/// Twin-rotor air gun platform.
fn gunship_template() -> UnitTemplate {
    UnitTemplate {
        kind: UnitKind::Air,
        gas_cost: 90.0,
        cells: vec![
            cell(0, 0, "frame"),
            cell(1, 0, "frame"),
            cell(2, 0, "frame"),
            cell(1, 1, "plate"),
        ],
        attachments: vec![
            part(0, 0, "lift-rotor"),
            part(1, 0, "control-core"),
            part(2, 0, "lift-rotor"),
            part(1, 1, "autogun"),
        ],
    }
}

/// Air unit carrying a loader-fed seeker pod.
fn strike_drone_template() -> UnitTemplate {
    UnitTemplate {
        kind: UnitKind::Air,
        gas_cost: 120.0,
        cells: vec![
            cell(0, 0, "frame"),
            cell(1, 0, "frame"),
            cell(2, 0, "frame"),
            cell(0, 1, "frame"),
            cell(2, 1, "frame"),
        ],
        attachments: vec![
            part(0, 0, "lift-rotor"),
            part(1, 0, "control-core"),
            part(2, 0, "lift-rotor"),
            part(0, 1, "auto-loader"),
            part(2, 1, "seeker-pod"),
        ],
    }
}
