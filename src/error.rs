use std::fmt;

/// Why a source layout could not be turned into a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedMap {
    Empty,
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    MissingSpawn,
    DuplicateSpawn {
        first: (usize, usize),
        second: (usize, usize),
    },
    UnknownCell {
        row: usize,
        col: usize,
        token: String,
    },
}

impl fmt::Display for MalformedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map has no cells"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::MissingSpawn => write!(f, "map has no spawn marker"),
            Self::DuplicateSpawn { first, second } => write!(
                f,
                "map has more than one spawn marker (col {}, row {} and col {}, row {})",
                first.0, first.1, second.0, second.1
            ),
            Self::UnknownCell { row, col, token } => {
                write!(f, "unknown cell {token:?} at col {col}, row {row}")
            }
        }
    }
}

/// Errors raised while building a `GridMap`. Both are fatal to the call that
/// produced them; no partially built grid is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    Malformed(MalformedMap),
    InvalidDimensions { cols: usize, rows: usize },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "malformed map: {reason}"),
            Self::InvalidDimensions { cols, rows } => write!(
                f,
                "a {cols}x{rows} interior is too small, both sides need at least one cell"
            ),
        }
    }
}

impl std::error::Error for MapError {}

impl From<MalformedMap> for MapError {
    fn from(reason: MalformedMap) -> Self {
        Self::Malformed(reason)
    }
}

/// A rejected grid edit. The grid is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    Border { cell_x: usize, cell_y: usize },
    OutOfRange { cell_x: usize, cell_y: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Border { cell_x, cell_y } => {
                write!(f, "cell ({cell_x}, {cell_y}) is part of the solid border")
            }
            Self::OutOfRange { cell_x, cell_y } => {
                write!(f, "cell ({cell_x}, {cell_y}) is outside the grid")
            }
        }
    }
}

impl std::error::Error for EditError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    TileSize(f32),
    FieldOfView(f32),
    ColumnWidth,
    Viewport { width: u32, height: u32 },
    MinimapScale(f32),
    /// The map was built for a different tile size than the session.
    TileMismatch { config: f32, map: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileSize(t) => write!(f, "tile size must be positive, got {t}"),
            Self::FieldOfView(fov) => {
                write!(f, "field of view must lie strictly between 0 and pi, got {fov}")
            }
            Self::ColumnWidth => write!(f, "column pixel width must be at least 1"),
            Self::Viewport { width, height } => {
                write!(f, "viewport {width}x{height} has no pixels")
            }
            Self::MinimapScale(s) => write!(f, "minimap scale must be positive, got {s}"),
            Self::TileMismatch { config, map } => {
                write!(f, "tile size {config} does not match the map's tile size {map}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
