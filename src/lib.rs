//! First-person view of a 2D tile grid, built by casting one ray per screen
//! column and drawing the nearest wall hit as a vertical strip.

pub mod angle;
pub mod camera;
pub mod config;
pub mod draw;
pub mod error;
pub mod input;
pub mod minimap;
pub mod raycaster;
pub mod renderer;
pub mod scaler;
pub mod session;
pub mod telemetry;
pub mod world;

pub use camera::{Camera, Intent, Sign};
pub use config::Config;
pub use draw::{Color, DrawSink, FrameBuffer};
pub use error::{ConfigError, EditError, MalformedMap, MapError};
pub use input::{Control, InputDispatcher};
pub use raycaster::{HitOrientation, RayCaster, RayHit, WallHit, cast_ray};
pub use renderer::{ColumnCommand, Projection, Shading};
pub use session::{Session, View};
pub use telemetry::Telemetry;
pub use world::{GridMap, SourceCell};
