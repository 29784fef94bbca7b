use std::num::NonZeroU8;

use log::info;
use serde::Deserialize;

use crate::draw::Color;
use crate::error::{EditError, MalformedMap, MapError};

/// Cell code used for the solid ring around every grid.
pub const BORDER_WALL: u8 = 1;

/// Token marking the spawn cell in authored layouts.
pub const SPAWN_TOKEN: &str = "p";

/// Wall colors indexed by cell code. Index 0 is empty space.
const PALETTE: [Option<Color>; 6] = [
    None,
    Some(Color::rgb(200, 100, 200)),
    Some(Color::rgb(200, 100, 0)),
    Some(Color::rgb(100, 0, 200)),
    Some(Color::rgb(200, 100, 100)),
    Some(Color::rgb(200, 50, 100)),
];

/// Highest cell code with a palette entry.
pub const PALETTE_MAX: u8 = (PALETTE.len() - 1) as u8;

/// The reference room: 19x14 interior, spawn in the upper right quarter.
const DEFAULT_LAYOUT: &str = "\
...................
.2...............22
.2......1111111....
.2............1....
.2222.........11...
.2.....22222.p.....
.22................
...................
....333333.....2...
.2..3...3......2...
.2..3...3......2..2
.2..3..33..22222...
....3..............
...................
";

/// One cell of an authored layout, before the border is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCell")]
pub enum SourceCell {
    Empty,
    Wall(NonZeroU8),
    Spawn,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Code(u8),
    Token(String),
}

impl TryFrom<RawCell> for SourceCell {
    type Error = String;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        match raw {
            RawCell::Code(code) => Ok(SourceCell::from_code(code)),
            RawCell::Token(t) if t == SPAWN_TOKEN => Ok(SourceCell::Spawn),
            RawCell::Token(t) => Err(format!("unknown cell token {t:?}")),
        }
    }
}

impl SourceCell {
    pub fn from_code(code: u8) -> Self {
        match NonZeroU8::new(code) {
            Some(id) => SourceCell::Wall(id),
            None => SourceCell::Empty,
        }
    }

    #[inline]
    fn code(self) -> u8 {
        match self {
            SourceCell::Wall(id) => id.get(),
            SourceCell::Empty | SourceCell::Spawn => 0,
        }
    }
}

/// Parses a layout stored as a JSON array of rows, where each cell is a wall
/// id (`0` for empty) or the string `"p"`.
pub fn parse_json(text: &str) -> Result<Vec<Vec<SourceCell>>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Parses a layout with one character per cell: digits are wall ids, `.` or
/// space is empty, `p` is the spawn. Empty lines and `#` comments are
/// skipped; a line of spaces is a row of empty cells.
pub fn parse_text(text: &str) -> Result<Vec<Vec<SourceCell>>, MapError> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row_idx = rows.len();
        let row = line
            .chars()
            .enumerate()
            .map(|(col, ch)| match ch {
                '.' | ' ' => Ok(SourceCell::Empty),
                'p' => Ok(SourceCell::Spawn),
                d if d.is_ascii_digit() => Ok(SourceCell::from_code(d as u8 - b'0')),
                other => Err(MalformedMap::UnknownCell {
                    row: row_idx,
                    col,
                    token: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn default_layout() -> Vec<Vec<SourceCell>> {
    // The layout is a compile-time constant covered by tests.
    parse_text(DEFAULT_LAYOUT).unwrap_or_default()
}

/// The tile grid. Always at least 3x3 with a permanently solid outer ring.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    tile_size: f32,
    width: usize,
    height: usize,
    cells: Vec<u8>, // row-major
    spawn: [f32; 2],
}

impl GridMap {
    /// Wraps `source` in a one-cell solid border. The spawn marker becomes an
    /// empty cell and its center is kept as the spawn point.
    pub fn load_from(source: &[Vec<SourceCell>], tile_size: f32) -> Result<Self, MapError> {
        let rows = source.len();
        let cols = source.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(MalformedMap::Empty.into());
        }

        let mut spawn: Option<(usize, usize)> = None;
        for (y, row) in source.iter().enumerate() {
            if row.len() != cols {
                return Err(MalformedMap::RaggedRow {
                    row: y,
                    expected: cols,
                    found: row.len(),
                }
                .into());
            }
            for (x, cell) in row.iter().enumerate() {
                if *cell != SourceCell::Spawn {
                    continue;
                }
                if let Some(first) = spawn {
                    return Err(MalformedMap::DuplicateSpawn {
                        first,
                        second: (x, y),
                    }
                    .into());
                }
                spawn = Some((x, y));
            }
        }
        let (sx, sy) = spawn.ok_or(MalformedMap::MissingSpawn)?;

        let mut map = Self::walled(cols + 2, rows + 2, tile_size);
        for (y, row) in source.iter().enumerate() {
            let start = (y + 1) * map.width + 1;
            for (dst, cell) in map.cells[start..start + cols].iter_mut().zip(row) {
                *dst = cell.code();
            }
        }
        map.spawn = map.cell_center(sx + 1, sy + 1);

        info!(
            "loaded {}x{} map, spawn at ({:.1}, {:.1})",
            map.width, map.height, map.spawn[0], map.spawn[1]
        );
        Ok(map)
    }

    /// An empty `cols` x `rows` room inside the solid border, spawn at the
    /// middle of the interior.
    pub fn generate_blank(cols: usize, rows: usize, tile_size: f32) -> Result<Self, MapError> {
        if cols == 0 || rows == 0 {
            return Err(MapError::InvalidDimensions { cols, rows });
        }
        let mut map = Self::walled(cols + 2, rows + 2, tile_size);
        map.spawn = map.cell_center(1 + cols / 2, 1 + rows / 2);

        info!("generated blank {}x{} map", map.width, map.height);
        Ok(map)
    }

    /// Replaces every cell from `source`. The new layout must have the same
    /// interior size; on error the grid keeps its old contents.
    pub fn reload(&mut self, source: &[Vec<SourceCell>]) -> Result<(), MapError> {
        let next = Self::load_from(source, self.tile_size)?;
        if next.width != self.width || next.height != self.height {
            return Err(MapError::InvalidDimensions {
                cols: next.width - 2,
                rows: next.height - 2,
            });
        }
        *self = next;
        Ok(())
    }

    // Full grid with a solid ring and an empty interior.
    fn walled(width: usize, height: usize, tile_size: f32) -> Self {
        debug_assert!(tile_size > 0.0);
        let mut cells = vec![0; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    cells[y * width + x] = BORDER_WALL;
                }
            }
        }
        Self {
            tile_size,
            width,
            height,
            cells,
            spawn: [0.0, 0.0],
        }
    }

    #[inline]
    fn cell_center(&self, x: usize, y: usize) -> [f32; 2] {
        [
            (x as f32 + 0.5) * self.tile_size,
            (y as f32 + 0.5) * self.tile_size,
        ]
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of the grid in world units.
    #[inline]
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Height of the grid in world units.
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    pub fn spawn(&self) -> [f32; 2] {
        self.spawn
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Cell code at a possibly out-of-range index. Anything outside the grid
    /// reads as border wall.
    #[inline]
    pub fn wall_at_cell(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 {
            return BORDER_WALL;
        }
        self.cell(x as usize, y as usize).unwrap_or(BORDER_WALL)
    }

    #[inline]
    pub fn is_blocked_at_cell(&self, x: i64, y: i64) -> bool {
        self.wall_at_cell(x, y) != 0
    }

    /// Floors world coordinates to a cell and tests it.
    #[inline]
    pub fn is_blocked_at_world(&self, x: f32, y: f32) -> bool {
        let (cx, cy) = self.world_to_cell(x, y);
        self.is_blocked_at_cell(cx, cy)
    }

    #[inline]
    pub fn world_to_cell(&self, x: f32, y: f32) -> (i64, i64) {
        (
            (x / self.tile_size).floor() as i64,
            (y / self.tile_size).floor() as i64,
        )
    }

    /// Flips an interior cell: a wall becomes empty, an empty cell becomes
    /// `wall`. Returns the new cell code.
    pub fn toggle_cell(&mut self, x: usize, y: usize, wall: NonZeroU8) -> Result<u8, EditError> {
        if x >= self.width || y >= self.height {
            return Err(EditError::OutOfRange {
                cell_x: x,
                cell_y: y,
            });
        }
        if self.is_border(x, y) {
            return Err(EditError::Border {
                cell_x: x,
                cell_y: y,
            });
        }
        let cell = &mut self.cells[y * self.width + x];
        *cell = if *cell != 0 { 0 } else { wall.get() };
        Ok(*cell)
    }

    /// Rows of cell codes, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.width)
    }

    /// Palette color for a wall id. `0` and unknown ids have none.
    pub fn color_of(wall: u8) -> Option<Color> {
        PALETTE.get(wall as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(id: u8) -> NonZeroU8 {
        NonZeroU8::new(id).unwrap()
    }

    fn room_with_spawn() -> Vec<Vec<SourceCell>> {
        parse_text("...\n.p.\n..2\n").unwrap()
    }

    #[test]
    fn load_wraps_in_border() {
        let map = GridMap::load_from(&room_with_spawn(), 32.0).unwrap();
        assert_eq!((map.width(), map.height()), (5, 5));
        for y in 0..5 {
            for x in 0..5 {
                if map.is_border(x, y) {
                    assert_eq!(map.cell(x, y), Some(BORDER_WALL));
                }
            }
        }
        assert_eq!(map.cell(2, 2), Some(0));
        assert_eq!(map.cell(3, 3), Some(2));
        assert_eq!(map.spawn(), [2.5 * 32.0, 2.5 * 32.0]);
    }

    #[test]
    fn load_rejects_ragged_rows() {
        let mut src = room_with_spawn();
        src[1].push(SourceCell::Empty);
        assert_eq!(
            GridMap::load_from(&src, 32.0),
            Err(MapError::Malformed(MalformedMap::RaggedRow {
                row: 1,
                expected: 3,
                found: 4
            }))
        );
    }

    #[test]
    fn load_rejects_duplicate_spawn() {
        let src = parse_text("p.p\n").unwrap();
        assert_eq!(
            GridMap::load_from(&src, 32.0),
            Err(MapError::Malformed(MalformedMap::DuplicateSpawn {
                first: (0, 0),
                second: (2, 0)
            }))
        );
    }

    #[test]
    fn load_rejects_empty_source() {
        assert_eq!(
            GridMap::load_from(&[], 32.0),
            Err(MapError::Malformed(MalformedMap::Empty))
        );
    }

    #[test]
    fn blank_requires_interior() {
        assert_eq!(
            GridMap::generate_blank(0, 4, 32.0),
            Err(MapError::InvalidDimensions { cols: 0, rows: 4 })
        );
        let map = GridMap::generate_blank(1, 1, 32.0).unwrap();
        assert_eq!((map.width(), map.height()), (3, 3));
        assert!(!map.is_blocked_at_cell(1, 1));
        assert_eq!(map.spawn(), [48.0, 48.0]);
    }

    #[test]
    fn out_of_range_reads_as_blocked() {
        let map = GridMap::generate_blank(3, 3, 10.0).unwrap();
        assert!(map.is_blocked_at_cell(-1, 2));
        assert!(map.is_blocked_at_cell(2, 99));
        assert!(map.is_blocked_at_world(-0.5, 15.0));
        assert!(!map.is_blocked_at_world(15.0, 15.0));
        assert!(map.is_blocked_at_world(9.99, 15.0));
    }

    #[test]
    fn toggle_flips_interior_only() {
        let mut map = GridMap::generate_blank(3, 3, 10.0).unwrap();
        assert_eq!(map.toggle_cell(2, 2, wall(4)), Ok(4));
        assert!(map.is_blocked_at_cell(2, 2));
        assert_eq!(map.toggle_cell(2, 2, wall(4)), Ok(0));
        assert_eq!(
            map.toggle_cell(0, 2, wall(3)),
            Err(EditError::Border { cell_x: 0, cell_y: 2 })
        );
        assert_eq!(
            map.toggle_cell(9, 2, wall(3)),
            Err(EditError::OutOfRange { cell_x: 9, cell_y: 2 })
        );
        assert_eq!(map.cell(0, 2), Some(BORDER_WALL));
    }

    #[test]
    fn reload_keeps_dimensions() {
        let mut map = GridMap::load_from(&room_with_spawn(), 32.0).unwrap();
        let bigger = parse_text("....\n.p..\n").unwrap();
        assert!(matches!(
            map.reload(&bigger),
            Err(MapError::InvalidDimensions { cols: 4, rows: 2 })
        ));
        assert_eq!(map.cell(3, 3), Some(2));

        let same = parse_text("3..\n...\n.p.\n").unwrap();
        map.reload(&same).unwrap();
        assert_eq!(map.cell(1, 1), Some(3));
        assert_eq!(map.cell(3, 3), Some(0));
        assert_eq!(map.spawn(), [2.5 * 32.0, 3.5 * 32.0]);
    }

    #[test]
    fn default_layout_is_well_formed() {
        let layout = default_layout();
        assert_eq!(layout.len(), 14);
        let map = GridMap::load_from(&layout, 32.0).unwrap();
        assert_eq!((map.width(), map.height()), (21, 16));
        assert_eq!(map.spawn(), [14.5 * 32.0, 6.5 * 32.0]);
    }

    #[test]
    fn json_layout_parses_spawn_token() {
        let rows = parse_json(r#"[[0, 2], ["p", 0]]"#).unwrap();
        assert_eq!(rows[0][1], SourceCell::Wall(wall(2)));
        assert_eq!(rows[1][0], SourceCell::Spawn);
        assert!(parse_json(r#"[["x"]]"#).is_err());
    }

    #[test]
    fn text_layout_rejects_unknown_characters() {
        assert_eq!(
            parse_text("p.\n.x\n"),
            Err(MapError::Malformed(MalformedMap::UnknownCell {
                row: 1,
                col: 1,
                token: "x".into()
            }))
        );
    }

    #[test]
    fn text_row_of_spaces_is_empty_cells() {
        let rows = parse_text("p..\n   \n\n# note\n..2\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec![SourceCell::Empty; 3]);

        let map = GridMap::load_from(&rows, 32.0).unwrap();
        assert_eq!((map.width(), map.height()), (5, 5));
        assert_eq!(map.cell(3, 3), Some(2));
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(GridMap::color_of(0), None);
        assert_eq!(GridMap::color_of(2), Some(Color::rgb(200, 100, 0)));
        assert_eq!(GridMap::color_of(PALETTE_MAX + 1), None);
    }
}
