use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use grid_raycaster::angle::to_radians;
use grid_raycaster::config;
use grid_raycaster::scaler::{self, ScaleLut};
use grid_raycaster::world::{self, GridMap};
use grid_raycaster::{
    Color, Config, Control, FrameBuffer, InputDispatcher, Session, Shading, Telemetry,
};

#[derive(Debug, Clone, Copy)]
struct Dims {
    cols: usize,
    rows: usize,
}

impl FromStr for Dims {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (c, r) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected COLSxROWS, got {s:?}"))?;
        let parse = |v: &str| v.trim().parse::<usize>().map_err(|e| e.to_string());
        Ok(Dims {
            cols: parse(c)?,
            rows: parse(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShadingArg {
    Flat,
    Axis,
}

impl From<ShadingArg> for Shading {
    fn from(s: ShadingArg) -> Self {
        match s {
            ShadingArg::Flat => Shading::Flat,
            ShadingArg::Axis => Shading::Axis,
        }
    }
}

/// Raycast a tile grid. Arrow keys or WASD move, clicking the minimap
/// toggles walls.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Map file: `.json` rows of wall ids with "p" for spawn, or one
    /// character per cell
    #[arg(long, conflicts_with = "blank")]
    map: Option<PathBuf>,

    /// Start in an empty room with this interior size, e.g. 16x11
    #[arg(long)]
    blank: Option<Dims>,

    #[arg(long, default_value_t = config::TILE_SIZE)]
    tile_size: f32,

    /// Field of view in degrees
    #[arg(long, default_value_t = config::FOV_DEGREES)]
    fov: f32,

    /// Pixels per wall strip
    #[arg(long, default_value_t = config::COLUMN_PIXEL_WIDTH)]
    column_width: u32,

    #[arg(long, default_value_t = config::MOVE_SPEED)]
    move_speed: f32,

    /// Degrees per turn step
    #[arg(long, default_value_t = config::TURN_DEGREES)]
    turn_speed: f32,

    #[arg(long, value_enum, default_value_t = ShadingArg::Axis)]
    shading: ShadingArg,

    /// World view width in pixels (defaults to the map size)
    #[arg(long, requires = "view_height")]
    view_width: Option<u32>,

    #[arg(long, requires = "view_width")]
    view_height: Option<u32>,

    /// Initial window scale
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            tile_size: self.tile_size,
            field_of_view: to_radians(self.fov),
            column_pixel_width: self.column_width,
            move_speed: self.move_speed,
            turn_speed: to_radians(self.turn_speed),
            shading: self.shading.into(),
            viewport: self.view_width.zip(self.view_height),
            ..Config::default()
        }
    }

    fn load_map(&self) -> Result<GridMap> {
        if let Some(dims) = self.blank {
            return Ok(GridMap::generate_blank(dims.cols, dims.rows, self.tile_size)?);
        }
        let Some(path) = &self.map else {
            return Ok(GridMap::load_from(&world::default_layout(), self.tile_size)?);
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading map {}", path.display()))?;
        let rows = if path.extension().is_some_and(|e| e == "json") {
            world::parse_json(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            world::parse_text(&text).with_context(|| format!("parsing {}", path.display()))?
        };
        GridMap::load_from(&rows, self.tile_size)
            .with_context(|| format!("loading {}", path.display()))
    }
}

fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(Control::Forward),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(Control::Backward),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(Control::TurnLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(Control::TurnRight),
        _ => None,
    }
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    session: Session,
    input: InputDispatcher,

    // Composed world view + minimap, stretched onto the window
    frame: FrameBuffer,
    scale_lut: ScaleLut,
    scale: f64,

    cursor: Option<(f64, f64)>,
}

impl App {
    fn new(session: Session, scale: f64) -> Self {
        let (w, h) = session.frame_size();
        Self {
            window: None,
            surface: None,
            session,
            input: InputDispatcher::new(),
            frame: FrameBuffer::new(w, h, Color::WHITE),
            scale_lut: ScaleLut::default(),
            scale,
            cursor: None,
        }
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.scale_lut =
            ScaleLut::build(dst_w, dst_h, self.frame.width(), self.frame.height());
    }

    // Pushes the latest telemetry to the title bar and asks for a repaint.
    fn invalidate(&self) {
        let telemetry = Telemetry::capture(&self.session);
        debug!("{telemetry}");
        if let Some(window) = &self.window {
            window.set_title(&format!("grid-raycaster | {telemetry}"));
            window.request_redraw();
        }
    }

    fn click(&mut self, x: f64, y: f64) {
        let (fx, fy) = self.scale_lut.to_source(x, y);
        let (mx, my) = self.session.minimap_origin();
        let (px, py) = (fx - mx as f32, fy - my as f32);
        if px < 0.0 || py < 0.0 {
            return;
        }
        // Rejections are logged by the session.
        if let Some(Ok(_)) = self.session.click_minimap(px, py) {
            self.invalidate();
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(surface)) = (&self.window, &mut self.surface) else {
            return;
        };
        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return; // Minimized window, skip drawing
        };
        let dst = (w.get() as usize, h.get() as usize);
        if self.scale_lut.dst_size() != dst {
            self.scale_lut =
                ScaleLut::build(dst.0, dst.1, self.frame.width(), self.frame.height());
        }

        self.session.render(&mut self.frame);

        if let Err(e) = surface.resize(w, h) {
            error!("resizing surface: {e}");
            return;
        }
        let mut buf = match surface.buffer_mut() {
            Ok(buf) => buf,
            Err(e) => {
                error!("acquiring surface buffer: {e}");
                return;
            }
        };
        scaler::stretch(&mut buf, self.frame.pixels(), &self.scale_lut);
        if let Err(e) = buf.present() {
            error!("presenting frame: {e}");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let (fw, fh) = (self.frame.width() as f64, self.frame.height() as f64);
        let attributes = Window::default_attributes()
            .with_title("grid-raycaster")
            .with_inner_size(LogicalSize::new(fw * self.scale, fh * self.scale));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                error!("creating window: {e}");
                event_loop.exit();
                return;
            }
        };
        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                error!("creating softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.rebuild_lut(size.width as usize, size.height as usize);
        info!("window {}x{}", size.width, size.height);

        self.surface = Some(surface);
        self.window = Some(window);
        self.invalidate();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_none_or(|w| w.id() != id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                let Some(control) = control_for(code) else {
                    return;
                };
                let intent = match state {
                    ElementState::Pressed => self.input.press(control),
                    ElementState::Released => self.input.release(control),
                };
                self.session.apply_intent(intent);
                self.invalidate();
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x, position.y));
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some((x, y)) = self.cursor {
                    self.click(x, y);
                }
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
                self.invalidate();
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => (),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if !(args.scale > 0.0) {
        bail!("--scale must be positive, got {}", args.scale);
    }
    let config = args.config();
    config.validate().context("invalid settings")?;

    let map = args.load_map()?;
    let session = Session::new(config, map).context("starting session")?;

    // Redraws only happen in response to input, so the loop can sleep
    // between events.
    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(session, args.scale);
    event_loop.run_app(&mut app).context("running event loop")?;
    info!("shutting down");
    Ok(())
}
