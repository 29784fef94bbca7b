use crate::camera::Camera;
use crate::draw::{Color, DrawSink};
use crate::renderer::FALLBACK_WALL;
use crate::world::GridMap;

const GRID_LINE: Color = Color::BLACK;
const PLAYER: Color = Color::rgb(255, 0, 0);
const RAY: Color = Color::rgba(255, 255, 0, 51);
const FACING: Color = Color::rgb(255, 165, 0);

/// Top-down view of the grid and the camera's rays, drawn at `scale`
/// pixels per world unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimap {
    pub scale: f32,
}

impl Minimap {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Pixel size needed to show all of `map`.
    pub fn size(&self, map: &GridMap) -> (usize, usize) {
        (
            (map.world_width() * self.scale).ceil() as usize,
            (map.world_height() * self.scale).ceil() as usize,
        )
    }

    pub fn draw(&self, sink: &mut impl DrawSink, map: &GridMap, camera: &Camera) {
        let s = self.scale;
        let t = map.tile_size();
        let (w, h) = (map.world_width(), map.world_height());
        sink.clear();

        for x in 0..=map.width() {
            let px = x as f32 * t * s;
            sink.line(px, 0.0, px, h * s, GRID_LINE);
        }
        for y in 0..=map.height() {
            let py = y as f32 * t * s;
            sink.line(0.0, py, w * s, py, GRID_LINE);
        }

        for (y, row) in map.rows().enumerate() {
            for (x, &wall) in row.iter().enumerate() {
                if wall == 0 {
                    continue;
                }
                let color = GridMap::color_of(wall).unwrap_or(FALLBACK_WALL);
                sink.rect(
                    (x as f32 * t + 1.0) * s,
                    (y as f32 * t + 1.0) * s,
                    (t - 2.0) * s,
                    (t - 2.0) * s,
                    color,
                );
            }
        }

        let [cx, cy] = camera.pos;
        sink.circle(cx * s, cy * s, camera.radius * s, PLAYER);
        for ray in camera.rays() {
            if let Some(hit) = ray.hit {
                sink.line(cx * s, cy * s, hit.point[0] * s, hit.point[1] * s, RAY);
            }
        }
        let [fx, fy] = camera.forward();
        sink.line(cx * s, cy * s, (cx + fx * t) * s, (cy + fy * t) * s, FACING);
    }

    /// The cell under a minimap pixel, if any.
    pub fn pick(&self, map: &GridMap, px: f32, py: f32) -> Option<(usize, usize)> {
        if px < 0.0 || py < 0.0 {
            return None;
        }
        let (cx, cy) = map.world_to_cell(px / self.scale, py / self.scale);
        let (cx, cy) = (cx as usize, cy as usize);
        map.cell(cx, cy).map(|_| (cx, cy))
    }
}
