use std::f32::consts::FRAC_PI_2;
use std::num::NonZeroU8;

use log::{debug, info, warn};
use rand::Rng;

use crate::camera::{Camera, Intent};
use crate::config::Config;
use crate::draw::FrameBuffer;
use crate::error::{ConfigError, EditError, MapError};
use crate::minimap::Minimap;
use crate::raycaster::{RayCaster, RayHit};
use crate::renderer::{ColumnCommand, Projection, render_world};
use crate::world::{GridMap, PALETTE_MAX, SourceCell};

/// Initial facing: straight down the y axis.
pub const SPAWN_ANGLE: f32 = FRAC_PI_2;

/// Read-only pose and rays after the latest recompute.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub pos: [f32; 2],
    pub angle: f32,
    pub rays: &'a [RayHit],
}

/// Owns the grid, the camera and the constants they run with. Every mutation
/// recasts the ray bundle before returning.
pub struct Session {
    config: Config,
    map: GridMap,
    camera: Camera,
    caster: RayCaster,
    projection: Projection,
    minimap: Minimap,
}

impl Session {
    pub fn new(config: Config, map: GridMap) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.tile_size != map.tile_size() {
            return Err(ConfigError::TileMismatch {
                config: config.tile_size,
                map: map.tile_size(),
            });
        }

        let (view_w, view_h) = config.viewport.unwrap_or((
            map.world_width().round() as u32,
            map.world_height().round() as u32,
        ));
        let caster = RayCaster::new(config.field_of_view, config.ray_count(view_w));
        let projection = Projection::new(
            view_w as usize,
            view_h as usize,
            map.tile_size(),
            config.field_of_view,
            config.shading,
        );
        let camera = Camera::new(
            map.spawn(),
            SPAWN_ANGLE,
            config.move_speed,
            config.turn_speed,
            config.collision_radius(),
        );

        let mut session = Self {
            config,
            map,
            camera,
            caster,
            projection,
            minimap: Minimap::new(config.minimap_scale),
        };
        session.refresh();

        info!(
            "session started: {}x{} view, {} rays, spawn ({:.1}, {:.1})",
            view_w,
            view_h,
            session.caster.ray_count(),
            session.camera.pos[0],
            session.camera.pos[1]
        );
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn view(&self) -> View<'_> {
        View {
            pos: self.camera.pos,
            angle: self.camera.angle,
            rays: self.camera.rays(),
        }
    }

    /// Applies a turn/walk intent. Returns `false` if the step was blocked.
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        self.camera.apply_intent(intent, &self.map, &self.caster)
    }

    /// Recasts rays from the current pose, e.g. after the grid changed.
    pub fn refresh(&mut self) {
        self.apply_intent(Intent::IDLE);
    }

    /// Flips an interior cell, using a random palette id for new walls.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> Result<u8, EditError> {
        let id = rand::rng().random_range(1..=PALETTE_MAX);
        let wall = NonZeroU8::new(id).unwrap_or(NonZeroU8::MIN);
        match self.map.toggle_cell(x, y, wall) {
            Ok(code) => {
                debug!("cell ({x}, {y}) is now {code}");
                self.refresh();
                Ok(code)
            }
            Err(e) => {
                warn!("edit rejected: {e}");
                Err(e)
            }
        }
    }

    /// Toggles the cell under a minimap pixel. `None` if the pixel is off
    /// the grid.
    pub fn click_minimap(&mut self, px: f32, py: f32) -> Option<Result<u8, EditError>> {
        let (x, y) = self.minimap.pick(&self.map, px, py)?;
        Some(self.toggle_cell(x, y))
    }

    /// Replaces the grid contents with a layout of the same size and moves
    /// the camera to its spawn.
    pub fn reload(&mut self, source: &[Vec<SourceCell>]) -> Result<(), MapError> {
        self.map.reload(source)?;
        self.camera.pos = self.map.spawn();
        self.refresh();
        Ok(())
    }

    pub fn columns(&self) -> Vec<ColumnCommand> {
        self.projection.columns(self.camera.rays(), self.camera.angle)
    }

    /// World view size in pixels.
    pub fn viewport(&self) -> (usize, usize) {
        let (w, h) = self.projection.viewport();
        (w as usize, h as usize)
    }

    /// Size of the composed frame: world view on the left, minimap on the
    /// right.
    pub fn frame_size(&self) -> (usize, usize) {
        let (vw, vh) = self.viewport();
        let (mw, mh) = self.minimap.size(&self.map);
        (vw + mw, vh.max(mh))
    }

    /// Left edge of the minimap inside the composed frame.
    pub fn minimap_origin(&self) -> (usize, usize) {
        (self.viewport().0, 0)
    }

    pub fn render(&self, fb: &mut FrameBuffer) {
        let (vw, vh) = self.viewport();
        render_world(&mut fb.region(0, 0, vw, vh), &self.columns());

        let (mx, my) = self.minimap_origin();
        let (mw, mh) = self.minimap.size(&self.map);
        self.minimap
            .draw(&mut fb.region(mx, my, mw, mh), &self.map, &self.camera);
    }
}
