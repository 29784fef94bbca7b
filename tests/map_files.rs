//! The layouts shipped under `maps/` must load.

use std::path::Path;

use grid_raycaster::GridMap;
use grid_raycaster::world::{parse_json, parse_text};

fn read(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("maps").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[test]
fn test_text_map_loads() {
    let rows = parse_text(&read("arena.txt")).unwrap();
    let map = GridMap::load_from(&rows, 32.0).unwrap();
    assert_eq!((map.width(), map.height()), (18, 13));
    assert_eq!(map.spawn(), [6.5 * 32.0, 4.5 * 32.0]);
}

#[test]
fn test_json_map_loads() {
    let rows = parse_json(&read("corridor.json")).unwrap();
    let map = GridMap::load_from(&rows, 16.0).unwrap();
    assert_eq!((map.width(), map.height()), (12, 7));
    assert_eq!(map.spawn(), [1.5 * 16.0, 2.5 * 16.0]);
    assert_eq!(map.cell(2, 5), Some(4));
}
