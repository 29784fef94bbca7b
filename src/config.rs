//! Session constants. These are fixed once a session starts.

use crate::angle::to_radians;
use crate::error::ConfigError;
use crate::renderer::Shading;

/// World units per grid cell.
pub const TILE_SIZE: f32 = 32.0;

/// Horizontal field of view, in degrees.
pub const FOV_DEGREES: f32 = 60.0;

/// Screen pixels per wall strip. Higher is faster and blockier.
pub const COLUMN_PIXEL_WIDTH: u32 = 1;

/// World units per movement step.
pub const MOVE_SPEED: f32 = 2.0;

/// Degrees per turn step.
pub const TURN_DEGREES: f32 = 2.0;

/// Player radius as a fraction of the tile size.
pub const RADIUS_TILES: f32 = 0.25;

/// Minimap pixels per world unit.
pub const MINIMAP_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub tile_size: f32,
    pub field_of_view: f32, // radians
    pub column_pixel_width: u32,
    pub move_speed: f32,
    pub turn_speed: f32, // radians per step
    pub shading: Shading,
    pub minimap_scale: f32,
    /// World view size in pixels; `None` sizes it to the map.
    pub viewport: Option<(u32, u32)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            field_of_view: to_radians(FOV_DEGREES),
            column_pixel_width: COLUMN_PIXEL_WIDTH,
            move_speed: MOVE_SPEED,
            turn_speed: to_radians(TURN_DEGREES),
            shading: Shading::default(),
            minimap_scale: MINIMAP_SCALE,
            viewport: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_size > 0.0 && self.tile_size.is_finite()) {
            return Err(ConfigError::TileSize(self.tile_size));
        }
        let fov = self.field_of_view;
        if !(fov > 0.0 && fov < std::f32::consts::PI) {
            return Err(ConfigError::FieldOfView(fov));
        }
        if self.column_pixel_width == 0 {
            return Err(ConfigError::ColumnWidth);
        }
        if !(self.minimap_scale > 0.0 && self.minimap_scale.is_finite()) {
            return Err(ConfigError::MinimapScale(self.minimap_scale));
        }
        if let Some((width, height)) = self.viewport {
            if width == 0 || height == 0 {
                return Err(ConfigError::Viewport { width, height });
            }
        }
        Ok(())
    }

    pub fn collision_radius(&self) -> f32 {
        RADIUS_TILES * self.tile_size
    }

    /// One ray per column, at least one.
    pub fn ray_count(&self, view_width: u32) -> usize {
        (view_width / self.column_pixel_width).max(1) as usize
    }
}
