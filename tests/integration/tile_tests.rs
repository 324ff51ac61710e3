//! Tile addressing tests against concrete grids.
//!
//! Tests verify:
//! - Zoom bounds and extent limits of an XYZ grid
//! - Keys are safe map keys where hashes collide
//! - Coordinates can be reused in place

use std::collections::HashMap;

use tile_label_core::tile::{
    create_or_update, from_key, hash, key, quad_key, within_extent_and_z, Extent, TileCoord,
    XyzTileGrid, WEB_MERCATOR_HALF_SIZE,
};

#[test]
fn test_web_mercator_zoom_bounds() {
    let grid = XyzTileGrid::web_mercator(2, 10);

    assert!(!within_extent_and_z(&TileCoord::new(1, 0, 0), &grid));
    assert!(!within_extent_and_z(&TileCoord::new(11, 0, 0), &grid));
    assert!(within_extent_and_z(&TileCoord::new(2, 3, 3), &grid));
    assert!(!within_extent_and_z(&TileCoord::new(2, 4, 0), &grid));
    assert!(!within_extent_and_z(&TileCoord::new(2, -1, 0), &grid));
}

#[test]
fn test_extent_limits_valid_tiles() {
    // North-east quadrant of the world.
    let extent = Extent::new(0.0, 0.0, WEB_MERCATOR_HALF_SIZE, WEB_MERCATOR_HALF_SIZE);
    let grid = XyzTileGrid::web_mercator(0, 18).with_extent(extent);

    assert!(within_extent_and_z(&TileCoord::new(0, 0, 0), &grid));

    // At z=1 only the top-right tile intersects.
    assert!(within_extent_and_z(&TileCoord::new(1, 1, 0), &grid));
    assert!(!within_extent_and_z(&TileCoord::new(1, 0, 0), &grid));
    assert!(!within_extent_and_z(&TileCoord::new(1, 1, 1), &grid));

    // At z=2 columns 2..=3 and rows 0..=1.
    assert!(within_extent_and_z(&TileCoord::new(2, 2, 1), &grid));
    assert!(!within_extent_and_z(&TileCoord::new(2, 1, 1), &grid));
    assert!(!within_extent_and_z(&TileCoord::new(2, 2, 2), &grid));
}

#[test]
fn test_string_keys_disambiguate_hash_collisions() {
    let a = TileCoord::new(1, 1, 0);
    let b = TileCoord::new(0, 0, 2);
    assert_eq!(hash(&a), hash(&b));

    let mut tiles: HashMap<String, &str> = HashMap::new();
    tiles.insert(key(&a), "a");
    tiles.insert(key(&b), "b");

    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[&key(&a)], "a");
    assert_eq!(from_key("0/0/2").unwrap(), b);
}

#[test]
fn test_reuse_coordinate_in_place() {
    let mut scratch = TileCoord::default();

    let mut keys = Vec::new();
    for x in 0..4 {
        create_or_update(2, x, 1, Some(&mut scratch));
        keys.push(quad_key(&scratch));
    }

    assert_eq!(scratch, TileCoord::new(2, 3, 1));
    assert_eq!(keys, vec!["02", "03", "12", "13"]);
}
