//! Invariants that should hold for any map or pose.

use std::num::NonZeroU8;

use grid_raycaster::angle::to_radians;
use grid_raycaster::world::{SourceCell, default_layout, parse_text};
use grid_raycaster::{GridMap, Projection, RayCaster, Shading};

const T: f32 = 32.0;

#[test]
fn test_border_stays_solid_under_toggles() {
    let mut map = GridMap::load_from(&default_layout(), T).unwrap();
    let wall = NonZeroU8::new(3).unwrap();
    for y in 0..map.height() {
        for x in 0..map.width() {
            let _ = map.toggle_cell(x, y, wall);
        }
    }
    for y in 0..map.height() {
        for x in 0..map.width() {
            if map.is_border(x, y) {
                assert!(map.is_blocked_at_cell(x as i64, y as i64), "({x}, {y})");
            }
        }
    }
}

#[test]
fn test_load_reproduces_interior_verbatim() {
    let layout = parse_text("1.3\n.p.\n2.5\n..4\n").unwrap();
    let map = GridMap::load_from(&layout, T).unwrap();
    assert_eq!((map.width(), map.height()), (3 + 2, 4 + 2));

    for (y, row) in layout.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let expected = match cell {
                SourceCell::Wall(id) => id.get(),
                SourceCell::Empty | SourceCell::Spawn => 0,
            };
            assert_eq!(map.cell(x + 1, y + 1), Some(expected));
        }
    }
}

#[test]
fn test_corridor_length_matches_distance() {
    for len in 1..8 {
        let row: String = std::iter::once('p')
            .chain(std::iter::repeat_n('.', len - 1))
            .chain(std::iter::once('2'))
            .collect();
        let map = GridMap::load_from(&parse_text(&row).unwrap(), T).unwrap();
        let ray = grid_raycaster::cast_ray(map.spawn(), 0.0, &map);
        // From the spawn center to the near face of the wall.
        let expected = (len as f32 - 0.5) * T;
        assert!((ray.distance - expected).abs() < 1e-3, "len {len}");
    }
}

#[test]
fn test_default_layout_bundle_projects_centered_columns() {
    let map = GridMap::load_from(&default_layout(), T).unwrap();
    let (w, h) = (map.world_width() as usize, map.world_height() as usize);
    let fov = to_radians(60.0);
    let caster = RayCaster::new(fov, w);
    let projection = Projection::new(w, h, T, fov, Shading::Axis);

    for step in 0..36 {
        let facing = to_radians(step as f32 * 10.0);
        let rays = caster.cast(map.spawn(), facing, &map);
        assert_eq!(rays.len(), w);
        for r in &rays {
            let corrected = Projection::corrected_distance(r, facing);
            assert!(corrected <= r.distance);
        }
        for c in projection.columns(&rays, facing) {
            assert!(c.height.is_finite() && c.height > 0.0);
            assert!((c.y + 0.5 * c.height - 0.5 * h as f32).abs() < 1e-2);
            assert!(c.x >= 0.0 && c.x + c.width <= w as f32 + 1e-3);
        }
    }
}
