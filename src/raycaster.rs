use std::f32::consts::{FRAC_PI_2, PI};

use log::trace;

use crate::angle::{guarded_tan, normalize_angle};
use crate::world::GridMap;

/// Which family of grid lines stopped the ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOrientation {
    /// A line of constant y (the ray hit a north or south face).
    Horizontal,
    /// A line of constant x (the ray hit an east or west face).
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub point: [f32; 2],
    pub wall: u8,
    pub orientation: HitOrientation,
}

/// One cast ray. `hit` is `None` and `distance` is infinite when the search
/// left the map without meeting a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub angle: f32,
    pub distance: f32,
    pub hit: Option<WallHit>,
}

impl RayHit {
    fn miss(angle: f32) -> Self {
        Self {
            angle,
            distance: f32::INFINITY,
            hit: None,
        }
    }

    /// Cell code of the wall that was hit, 0 for a miss.
    #[inline]
    pub fn wall(&self) -> u8 {
        self.hit.map_or(0, |h| h.wall)
    }
}

// Quadrant of a normalized angle. y grows downwards, so angles in (0, π)
// point down. On the axes themselves 0 and π count as up, π/2 and 3π/2 count
// as left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Facing {
    down: bool,
    right: bool,
}

impl Facing {
    fn of(angle: f32) -> Self {
        Self {
            down: angle > 0.0 && angle < PI,
            right: angle < FRAC_PI_2 || angle > 3.0 * FRAC_PI_2,
        }
    }
}

/// Casts a fan of rays across a field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCaster {
    field_of_view: f32,
    ray_count: usize,
}

impl RayCaster {
    pub fn new(field_of_view: f32, ray_count: usize) -> Self {
        Self {
            field_of_view,
            ray_count: ray_count.max(1),
        }
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    #[inline]
    pub fn angle_step(&self) -> f32 {
        self.field_of_view / self.ray_count as f32
    }

    /// Rays ordered left to right, starting at `facing - fov / 2`.
    pub fn cast(&self, origin: [f32; 2], facing: f32, map: &GridMap) -> Vec<RayHit> {
        let first = facing - 0.5 * self.field_of_view;
        let step = self.angle_step();
        let rays: Vec<RayHit> = (0..self.ray_count)
            .map(|i| cast_ray(origin, first + i as f32 * step, map))
            .collect();

        if log::log_enabled!(log::Level::Trace) {
            let hits = rays.iter().filter(|r| r.hit.is_some()).count();
            let nearest = rays.iter().map(|r| r.distance).fold(f32::INFINITY, f32::min);
            trace!("cast {} rays, {hits} hits, nearest {nearest:.2}", rays.len());
        }
        rays
    }
}

/// Casts a single ray from `origin`. The nearer of the horizontal-line and
/// vertical-line hits wins; on an exact tie the vertical hit is kept.
pub fn cast_ray(origin: [f32; 2], angle: f32, map: &GridMap) -> RayHit {
    let angle = normalize_angle(angle);
    let facing = Facing::of(angle);
    let tan = guarded_tan(angle);

    let dist = |hit: Option<WallHit>| {
        hit.map_or(f32::INFINITY, |h| {
            (h.point[0] - origin[0]).hypot(h.point[1] - origin[1])
        })
    };
    let horizontal = horizontal_hit(origin, tan, facing, map);
    let vertical = vertical_hit(origin, tan, facing, map);
    let (h_dist, v_dist) = (dist(horizontal), dist(vertical));

    let (distance, hit) = if h_dist < v_dist {
        (h_dist, horizontal)
    } else {
        (v_dist, vertical)
    };
    match hit {
        Some(hit) => RayHit {
            angle,
            distance,
            hit: Some(hit),
        },
        None => RayHit::miss(angle),
    }
}

#[inline]
fn inside(map: &GridMap, x: f32, y: f32) -> bool {
    (0.0..=map.world_width()).contains(&x) && (0.0..=map.world_height()).contains(&y)
}

// Walks the rows of horizontal grid lines the ray crosses. Lines are tracked
// by index so the cell beyond a line is picked exactly: row `line` when going
// down, row `line - 1` when going up.
fn horizontal_hit(origin: [f32; 2], tan: f32, facing: Facing, map: &GridMap) -> Option<WallHit> {
    let t = map.tile_size();
    let [px, py] = origin;

    let row = (py / t).floor() as i64;
    let (mut line, dir) = if facing.down { (row + 1, 1) } else { (row, -1) };
    let mut x = px + (line as f32 * t - py) / tan;

    let mut step_x = t / tan;
    if (!facing.right && step_x > 0.0) || (facing.right && step_x < 0.0) {
        step_x = -step_x;
    }

    for _ in 0..=map.height() + 1 {
        let y = line as f32 * t;
        if !inside(map, x, y) {
            return None;
        }
        let cell_y = if facing.down { line } else { line - 1 };
        let wall = map.wall_at_cell((x / t).floor() as i64, cell_y);
        if wall != 0 {
            return Some(WallHit {
                point: [x, y],
                wall,
                orientation: HitOrientation::Horizontal,
            });
        }
        line += dir;
        x += step_x;
    }
    None
}

// Same walk over vertical grid lines: column `line` going right, `line - 1`
// going left.
fn vertical_hit(origin: [f32; 2], tan: f32, facing: Facing, map: &GridMap) -> Option<WallHit> {
    let t = map.tile_size();
    let [px, py] = origin;

    let col = (px / t).floor() as i64;
    let (mut line, dir) = if facing.right { (col + 1, 1) } else { (col, -1) };
    let mut y = py + (line as f32 * t - px) * tan;

    let mut step_y = t * tan;
    if (!facing.down && step_y > 0.0) || (facing.down && step_y < 0.0) {
        step_y = -step_y;
    }

    for _ in 0..=map.width() + 1 {
        let x = line as f32 * t;
        if !inside(map, x, y) {
            return None;
        }
        let cell_x = if facing.right { line } else { line - 1 };
        let wall = map.wall_at_cell(cell_x, (y / t).floor() as i64);
        if wall != 0 {
            return Some(WallHit {
                point: [x, y],
                wall,
                orientation: HitOrientation::Vertical,
            });
        }
        line += dir;
        y += step_y;
    }
    None
}
