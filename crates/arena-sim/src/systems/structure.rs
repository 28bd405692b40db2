//! Structural damage model: hit application, cell destruction, and the
//! connectivity rule.
//!
//! Connectivity loss *is* death: every alive cell must stay reachable
//! from the control attachment's cell over 4-neighbor adjacency, and the
//! scan destroys whatever gets cut off. There is no separate death state
//! machine.

use std::collections::{HashMap, HashSet, VecDeque};

use hecs::World;

use arena_core::components::{Hull, Pilot, StructureCell, UnitTag};
use arena_core::constants::{ARMOR_SOFTEN_SCALE, CELL_SIZE};
use arena_core::enums::UnitLossReason;
use arena_core::events::BattleEvent;
use arena_core::types::{Position, Rect};

/// World-space rectangle of a structure cell.
pub fn cell_rect(unit_pos: &Position, cell: &StructureCell) -> Rect {
    Rect::centered(
        unit_pos.x + cell.grid_x as f64 * CELL_SIZE,
        unit_pos.y + cell.grid_y as f64 * CELL_SIZE,
        CELL_SIZE,
        CELL_SIZE,
    )
}

/// Id of the live cell whose center is closest to `point`.
pub fn nearest_live_cell(unit_pos: &Position, hull: &Hull, point: &Position) -> Option<u16> {
    let mut best: Option<(u16, f64)> = None;
    for cell in &hull.cells {
        if cell.destroyed {
            continue;
        }
        let center = cell_rect(unit_pos, cell).center();
        let d2 = center.distance_sq_to(point);
        if best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((cell.id, d2));
        }
    }
    best.map(|(id, _)| id)
}

/// Apply weapon damage to one cell through the armor model.
///
/// Armor softens incoming damage nonlinearly: small hits are mostly
/// absorbed, heavy hits get through. Returns true when the hit broke the
/// cell. Missing or already-destroyed cells are a no-op.
pub fn apply_hit(
    tag: &UnitTag,
    hull: &mut Hull,
    pilot: &mut Pilot,
    cell_id: u16,
    damage: f64,
    events: &mut Vec<BattleEvent>,
) -> bool {
    let Some(cell) = hull.cells.iter_mut().find(|c| c.id == cell_id) else {
        return false;
    };
    if cell.destroyed || damage <= 0.0 {
        return false;
    }

    let effective = damage * damage / (damage + cell.armor * ARMOR_SOFTEN_SCALE);
    cell.strain += effective;

    if cell.strain >= cell.break_threshold {
        destroy_cell(tag, hull, pilot, cell_id, events);
        true
    } else {
        false
    }
}

/// Destroy a cell, detach whatever was anchored there, and re-check
/// connectivity from the control cell. Idempotent.
pub fn destroy_cell(
    tag: &UnitTag,
    hull: &mut Hull,
    pilot: &mut Pilot,
    cell_id: u16,
    events: &mut Vec<BattleEvent>,
) {
    let Some(cell) = hull.cells.iter_mut().find(|c| c.id == cell_id) else {
        return;
    };
    if cell.destroyed {
        return;
    }
    cell.destroyed = true;
    cell.strain = cell.break_threshold;
    events.push(BattleEvent::CellDestroyed {
        unit: tag.id,
        cell: cell_id,
    });
    detach_anchored(tag, hull, cell_id, events);

    rebuild_connectivity(tag, hull, pilot, events);
}

/// Mark every attachment anchored on `cell_id` dead.
fn detach_anchored(tag: &UnitTag, hull: &mut Hull, cell_id: u16, events: &mut Vec<BattleEvent>) {
    for attachment in &mut hull.attachments {
        if attachment.cell == cell_id && attachment.alive {
            attachment.alive = false;
            events.push(BattleEvent::AttachmentDisabled {
                unit: tag.id,
                attachment: attachment.id,
            });
        }
    }
}

/// Breadth-first reachability over alive cells from the control cell;
/// destroys everything unreachable and kills the unit when the control
/// itself is gone or nothing is left.
fn rebuild_connectivity(
    tag: &UnitTag,
    hull: &mut Hull,
    pilot: &mut Pilot,
    events: &mut Vec<BattleEvent>,
) {
    let control_cell = hull
        .control()
        .filter(|c| c.alive)
        .and_then(|c| hull.cell(c.cell))
        .filter(|cell| !cell.destroyed)
        .map(|cell| (cell.grid_x, cell.grid_y));

    let Some(root) = control_cell else {
        // Control is gone: no cell can be reachable.
        let orphans: Vec<u16> = hull
            .cells
            .iter()
            .filter(|c| !c.destroyed)
            .map(|c| c.id)
            .collect();
        for id in orphans {
            if let Some(cell) = hull.cells.iter_mut().find(|c| c.id == id) {
                cell.destroyed = true;
                cell.strain = cell.break_threshold;
            }
            events.push(BattleEvent::CellDestroyed { unit: tag.id, cell: id });
            detach_anchored(tag, hull, id, events);
        }
        kill_unit(tag, pilot, events);
        return;
    };

    // Coordinate lookup built per scan; cells break rarely relative to
    // ticks, so a persistent adjacency structure isn't worth carrying.
    let mut by_coord: HashMap<(i32, i32), u16> = HashMap::new();
    for cell in &hull.cells {
        if !cell.destroyed {
            by_coord.insert((cell.grid_x, cell.grid_y), cell.id);
        }
    }

    let mut reachable: Vec<u16> = Vec::with_capacity(by_coord.len());
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    queue.push_back(root);
    visited.insert(root);
    while let Some((x, y)) = queue.pop_front() {
        if let Some(&id) = by_coord.get(&(x, y)) {
            reachable.push(id);
        }
        for neighbor in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            if by_coord.contains_key(&neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    // Destroying an unreachable cell cannot disconnect a reachable one,
    // so a single sweep reaches the fixpoint.
    let orphans: Vec<u16> = hull
        .cells
        .iter()
        .filter(|c| !c.destroyed && !reachable.contains(&c.id))
        .map(|c| c.id)
        .collect();
    for id in orphans {
        if let Some(cell) = hull.cells.iter_mut().find(|c| c.id == id) {
            cell.destroyed = true;
            cell.strain = cell.break_threshold;
        }
        events.push(BattleEvent::CellDestroyed { unit: tag.id, cell: id });
        detach_anchored(tag, hull, id, events);
    }

    if hull.cells.iter().all(|c| c.destroyed) {
        kill_unit(tag, pilot, events);
    }
}

fn kill_unit(tag: &UnitTag, pilot: &mut Pilot, events: &mut Vec<BattleEvent>) {
    if pilot.alive {
        pilot.alive = false;
        events.push(BattleEvent::UnitDestroyed {
            unit: tag.id,
            side: tag.side,
            reason: UnitLossReason::StructureFailure,
        });
    }
}

/// Passive strain recovery on intact cells. Destroyed cells never heal.
pub fn recover(world: &mut World, dt: f64) {
    for (_entity, hull) in world.query_mut::<&mut Hull>() {
        for cell in &mut hull.cells {
            if !cell.destroyed && cell.strain > 0.0 {
                cell.strain = (cell.strain - cell.recovery * dt).max(0.0);
            }
        }
    }
}
