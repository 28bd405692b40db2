//! Tests for core geometry, hull accounting, and the stock catalog.

use crate::catalog::{PartCatalog, PartSpec};
use crate::components::{Attachment, AttachmentSpec, Hull, StructureCell};
use crate::types::{Position, Rect, Velocity};

fn plain_cell(id: u16, x: i32, y: i32) -> StructureCell {
    StructureCell {
        id,
        grid_x: x,
        grid_y: y,
        mass: 1.0,
        armor: 4.0,
        break_threshold: 60.0,
        recovery: 1.0,
        strain: 0.0,
        destroyed: false,
    }
}

#[test]
fn test_rect_contains_and_center() {
    let r = Rect::centered(10.0, 20.0, 4.0, 6.0);
    assert!(r.contains(&Position::new(10.0, 20.0)));
    assert!(r.contains(&Position::new(8.0, 17.0)));
    assert!(!r.contains(&Position::new(12.5, 20.0)));
    let c = r.center();
    assert!((c.x - 10.0).abs() < 1e-12 && (c.y - 20.0).abs() < 1e-12);
}

#[test]
fn test_segment_crosses_rect_without_endpoints_inside() {
    // Fast projectile passes straight through a 16px cell in one step.
    let r = Rect::centered(100.0, 100.0, 16.0, 16.0);
    let a = Position::new(0.0, 100.0);
    let b = Position::new(200.0, 100.0);
    assert!(r.intersects_segment(&a, &b));

    // Parallel segment above the cell misses.
    let a2 = Position::new(0.0, 80.0);
    let b2 = Position::new(200.0, 80.0);
    assert!(!r.intersects_segment(&a2, &b2));

    // Diagonal clip through a corner.
    let a3 = Position::new(90.0, 80.0);
    let b3 = Position::new(120.0, 110.0);
    assert!(r.intersects_segment(&a3, &b3));
}

#[test]
fn test_velocity_speed_clamp() {
    let mut v = Velocity::new(30.0, 40.0);
    assert!((v.speed() - 50.0).abs() < 1e-12);
    v.clamp_speed(25.0);
    assert!((v.speed() - 25.0).abs() < 1e-9);
    // Direction preserved.
    assert!((v.x / v.y - 0.75).abs() < 1e-9);

    let mut slow = Velocity::new(1.0, 0.0);
    slow.clamp_speed(25.0);
    assert!((slow.x - 1.0).abs() < 1e-12, "under-cap velocity untouched");
}

#[test]
fn test_hull_integrity_counts_alive_cells() {
    let mut hull = Hull {
        cells: vec![plain_cell(0, 0, 0), plain_cell(1, 1, 0), plain_cell(2, 2, 0)],
        attachments: vec![Attachment {
            id: 0,
            cell: 1,
            rotation: 0,
            mass: 1.2,
            alive: true,
            spec: AttachmentSpec::Control,
        }],
    };
    assert!((hull.integrity() - 1.0).abs() < 1e-12);

    hull.cells[0].destroyed = true;
    assert!((hull.integrity() - 2.0 / 3.0).abs() < 1e-12);

    hull.cells[1].destroyed = true;
    hull.cells[2].destroyed = true;
    assert!(hull.integrity().abs() < 1e-12);
}

#[test]
fn test_hull_mass_skips_destroyed_and_dead() {
    let mut hull = Hull {
        cells: vec![plain_cell(0, 0, 0), plain_cell(1, 1, 0)],
        attachments: vec![Attachment {
            id: 0,
            cell: 0,
            rotation: 0,
            mass: 2.0,
            alive: true,
            spec: AttachmentSpec::Control,
        }],
    };
    assert!((hull.total_mass() - 4.0).abs() < 1e-12);

    hull.cells[1].destroyed = true;
    hull.attachments[0].alive = false;
    assert!((hull.total_mass() - 1.0).abs() < 1e-12);
}

#[test]
fn test_standard_catalog_references_resolve() {
    let catalog = PartCatalog::standard();
    assert!(!catalog.templates.is_empty());

    for (name, template) in &catalog.templates {
        assert!(
            !template.cells.is_empty(),
            "template {name} must have cells"
        );
        for cell in &template.cells {
            assert!(
                catalog.materials.contains_key(&cell.material),
                "template {name} references unknown material {}",
                cell.material
            );
        }
        let mut controls = 0;
        for attachment in &template.attachments {
            let part = catalog
                .parts
                .get(&attachment.part)
                .unwrap_or_else(|| panic!("template {name} references unknown part"));
            if matches!(part.spec, PartSpec::Control) {
                controls += 1;
            }
            assert!(
                template
                    .cells
                    .iter()
                    .any(|c| c.x == attachment.x && c.y == attachment.y),
                "template {name} anchors a part off-grid"
            );
        }
        assert_eq!(controls, 1, "template {name} must have exactly one control");
    }

    for id in &catalog.enemy_roster {
        assert!(
            catalog.templates.contains_key(id),
            "enemy roster references unknown template {id}"
        );
    }
}

#[test]
fn test_catalog_round_trips_through_serde() {
    let catalog = PartCatalog::standard();
    let json = serde_json::to_string(&catalog).unwrap();
    let back: PartCatalog = serde_json::from_str(&json).unwrap();
    assert_eq!(back.templates.len(), catalog.templates.len());
    assert_eq!(back.parts.len(), catalog.parts.len());
    assert_eq!(back.enemy_roster, catalog.enemy_roster);
}
