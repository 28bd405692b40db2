//! Unit instantiation from catalog templates.
//!
//! Builds the full component bundle for a unit entity. Malformed
//! templates (unknown parts, zero or multiple control units, off-grid
//! anchors) are configuration errors and yield `None` — the caller
//! decides whether that aborts a deploy or a battle start.

use hecs::{Entity, World};

use arena_core::catalog::{PartCatalog, PartSpec};
use arena_core::components::*;
use arena_core::enums::{Side, UnitKind, WeaponClass};
use arena_core::types::{Position, Velocity};

/// Instantiate `template_id` for `side` at `position`.
///
/// Returns `None` on any configuration error without touching the world.
pub fn instantiate(
    world: &mut World,
    catalog: &PartCatalog,
    template_id: &str,
    side: Side,
    unit_id: u32,
    position: Position,
) -> Option<Entity> {
    let template = catalog.templates.get(template_id)?;

    let mut cells = Vec::with_capacity(template.cells.len());
    for (index, cell) in template.cells.iter().enumerate() {
        let material = catalog.materials.get(&cell.material)?;
        cells.push(StructureCell {
            id: index as u16,
            grid_x: cell.x,
            grid_y: cell.y,
            mass: material.mass,
            armor: material.armor,
            break_threshold: material.break_threshold,
            recovery: material.recovery,
            strain: 0.0,
            destroyed: false,
        });
    }
    if cells.is_empty() {
        return None;
    }

    let mut attachments = Vec::with_capacity(template.attachments.len());
    let mut control_count = 0;
    for (index, placement) in template.attachments.iter().enumerate() {
        let part = catalog.parts.get(&placement.part)?;
        let anchor = template
            .cells
            .iter()
            .position(|c| c.x == placement.x && c.y == placement.y)?;

        let spec = match &part.spec {
            PartSpec::Control => {
                control_count += 1;
                AttachmentSpec::Control
            }
            PartSpec::Engine(e) => AttachmentSpec::Engine(*e),
            PartSpec::Weapon(w) => AttachmentSpec::Weapon(w.clone()),
            PartSpec::Loader(l) => AttachmentSpec::Loader(l.clone()),
            PartSpec::Fuel => AttachmentSpec::Fuel,
        };
        attachments.push(Attachment {
            id: index as u16,
            cell: anchor as u16,
            rotation: placement.rotation % 4,
            mass: part.mass,
            alive: true,
            spec,
        });
    }

    // A unit is operable with exactly one control attachment.
    if control_count != 1 {
        return None;
    }

    let battery = WeaponBattery {
        slots: attachments
            .iter()
            .filter(|a| matches!(a.spec, AttachmentSpec::Weapon(_)))
            .map(|a| WeaponSlot {
                attachment: a.id,
                fire_timer: 0.0,
                auto_fire: true,
                ready_charges: 0,
            })
            .collect(),
        selected: None,
    };

    let loaders = LoaderBank {
        loaders: attachments
            .iter()
            .filter(|a| matches!(a.spec, AttachmentSpec::Loader(_)))
            .map(|a| LoaderState {
                attachment: a.id,
                phase: Default::default(),
                target_slot: None,
                remaining_secs: 0.0,
            })
            .collect(),
    };

    let hull = Hull { cells, attachments };

    let entity = world.spawn((
        UnitTag {
            id: unit_id,
            side,
            kind: template.kind,
        },
        position,
        Velocity::default(),
        hull,
        battery,
        loaders,
        Mobility::default(),
        Pilot::default(),
    ));
    Some(entity)
}

/// Weapon classes a loader bank can currently charge (for capacity math).
pub fn loader_capacity_for_class(hull: &Hull, class: WeaponClass) -> u32 {
    if !class.needs_loader() {
        return 0;
    }
    let mut capacity = 0;
    let mut any = false;
    for attachment in &hull.attachments {
        if !attachment.alive {
            continue;
        }
        if let AttachmentSpec::Loader(loader) = &attachment.spec {
            if loader.supports.contains(&class) {
                any = true;
                capacity += loader.store_capacity;
            }
        }
    }
    if any {
        1 + capacity
    } else {
        0
    }
}

/// Spawn position for a new unit of `side` and `kind`, with a little
/// lateral jitter so stacked deploys fan out.
pub fn spawn_position(
    side: Side,
    kind: UnitKind,
    rng: &mut rand_chacha::ChaCha8Rng,
) -> Position {
    use arena_core::constants::*;
    use rand::Rng;

    let x = match side {
        Side::Player => BASE_WIDTH + rng.gen_range(30.0..110.0),
        Side::Enemy => BATTLEFIELD_WIDTH - BASE_WIDTH - rng.gen_range(30.0..110.0),
    };
    let y = match kind {
        UnitKind::Ground => rng.gen_range(GROUND_BAND_MIN_Y..GROUND_BAND_MAX_Y),
        UnitKind::Air => AIR_SPAWN_Y + rng.gen_range(-60.0..60.0),
    };
    Position::new(x, y)
}
