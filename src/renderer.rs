use crate::draw::{Color, DrawSink};
use crate::raycaster::{HitOrientation, RayHit};
use crate::world::GridMap;

pub const CEILING: Color = Color::WHITE;
pub const FLOOR: Color = Color::rgb(0x77, 0x77, 0x77);

/// Drawn for solid cells whose id has no palette entry.
pub const FALLBACK_WALL: Color = Color::rgb(128, 128, 128);

// Extra darkening applied to faces hit on a horizontal grid line.
const HORIZONTAL_FACE_DIM: f32 = 1.1;

/// How wall columns are lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Distance falloff only.
    Flat,
    /// Distance falloff, with horizontal-line faces slightly darker so
    /// perpendicular walls read apart.
    #[default]
    Axis,
}

impl Shading {
    /// `rate` is `tile_size / corrected_distance`; brightness is
    /// `(1 + rate) / 2` of the base color, so it falls as the wall recedes.
    pub fn shade(self, base: Color, rate: f32, orientation: HitOrientation) -> Color {
        let dim = match (self, orientation) {
            (Shading::Axis, HitOrientation::Horizontal) => HORIZONTAL_FACE_DIM,
            _ => 1.0,
        };
        base.scaled((1.0 + rate) / (2.0 * dim))
    }
}

/// One wall strip, in viewport pixels. `height` is the raw projected height
/// and may exceed the viewport for near walls; sinks clip it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

/// Turns ray distances into wall strips for a `width` x `height` viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    width: f32,
    height: f32,
    tile_size: f32,
    field_of_view: f32,
    pub shading: Shading,
}

impl Projection {
    pub fn new(
        width: usize,
        height: usize,
        tile_size: f32,
        field_of_view: f32,
        shading: Shading,
    ) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            tile_size,
            field_of_view,
            shading,
        }
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Distance from the eye to the projection plane, in pixels.
    #[inline]
    pub fn plane_distance(&self) -> f32 {
        0.5 * self.width / (0.5 * self.field_of_view).tan()
    }

    /// Distance measured along the facing direction instead of along the ray.
    #[inline]
    pub fn corrected_distance(ray: &RayHit, facing: f32) -> f32 {
        if !ray.distance.is_finite() {
            return f32::INFINITY;
        }
        ray.distance * (ray.angle - facing).cos()
    }

    #[inline]
    pub fn column_height(&self, corrected: f32) -> f32 {
        self.tile_size / corrected * self.plane_distance()
    }

    /// One command per ray that hit something, left to right. Misses leave
    /// their column to the background.
    pub fn columns(&self, rays: &[RayHit], facing: f32) -> Vec<ColumnCommand> {
        if rays.is_empty() {
            return Vec::new();
        }
        let col_w = self.width / rays.len() as f32;
        let half_h = 0.5 * self.height;

        rays.iter()
            .enumerate()
            .filter_map(|(i, ray)| {
                let hit = ray.hit?;
                let corrected = Self::corrected_distance(ray, facing);
                // A wall at zero distance fills the whole column.
                let height = match self.column_height(corrected) {
                    h if h.is_finite() => h,
                    _ => self.height,
                };
                let base = GridMap::color_of(hit.wall).unwrap_or(FALLBACK_WALL);
                let rate = self.tile_size / corrected;
                Some(ColumnCommand {
                    x: i as f32 * col_w,
                    y: half_h - 0.5 * height,
                    width: col_w,
                    height,
                    color: self.shading.shade(base, rate, hit.orientation),
                })
            })
            .collect()
    }
}

/// Paints the ceiling and floor halves, then the wall strips.
pub fn render_world(sink: &mut impl DrawSink, columns: &[ColumnCommand]) {
    let (w, h) = sink.size();
    let (w, h) = (w as f32, h as f32);
    sink.clear();
    sink.rect(0.0, 0.0, w, h, CEILING);
    sink.rect(0.0, 0.5 * h, w, 0.5 * h, FLOOR);
    for c in columns {
        sink.rect(c.x, c.y, c.width, c.height, c.color);
    }
}
