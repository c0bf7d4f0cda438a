//! Bing-style quadkey tiling.
//!
//! A quadkey encodes a recursive quadrant subdivision of the web-mercator
//! map: one base-4 digit per zoom level, most significant quadrant first.
//! The key of any tile is prefixed by the key of its parent tile.

use std::f64::consts::PI;

/// Latitude clip bound; the mercator projection is singular at the poles.
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Zoom level used by the Data for Good population tiles.
pub const DEFAULT_LEVEL: u8 = 14;

/// Highest supported zoom level (Bing tile system maximum).
pub const MAX_LEVEL: u8 = 23;

/// Tile XY coordinates for a (lat, lon) pair at `level`.
///
/// Latitude is clipped to ±[`MAX_LATITUDE`] and tile indices are clamped to
/// the valid range, so every finite coordinate maps to some tile.
pub fn tile_xy(lat: f64, lon: f64, level: u8) -> (u32, u32) {
    assert!((1..=MAX_LEVEL).contains(&level), "zoom level out of range: {level}");
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin_lat = (lat * PI / 180.0).sin();

    let map_tiles = f64::from(1u32 << level);
    let x = (lon + 180.0) / 360.0 * map_tiles;
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * map_tiles;

    let max_tile = i64::from((1u32 << level) - 1);
    let tile_x = (x.floor() as i64).clamp(0, max_tile) as u32;
    let tile_y = (y.floor() as i64).clamp(0, max_tile) as u32;
    (tile_x, tile_y)
}

/// Quadkey string for tile XY coordinates, interleaving the Y and X bits
/// most significant first (digit = 2·y_bit + x_bit).
pub fn quadkey_from_tile(tile_x: u32, tile_y: u32, level: u8) -> String {
    let mut key = String::with_capacity(level as usize);
    for i in (1..=level).rev() {
        let mask = 1u32 << (i - 1);
        let mut digit = 0u8;
        if tile_x & mask != 0 {
            digit += 1;
        }
        if tile_y & mask != 0 {
            digit += 2;
        }
        key.push(char::from(b'0' + digit));
    }
    key
}

/// Quadkey for a single (lat, lon) pair at `level`.
pub fn quadkey(lat: f64, lon: f64, level: u8) -> String {
    let (x, y) = tile_xy(lat, lon, level);
    quadkey_from_tile(x, y, level)
}

/// Quadkeys for a sequence of (lat, lon) pairs, order preserving:
/// `result[i]` is the key of `points[i]`.
pub fn quadkeys(points: &[(f64, f64)], level: u8) -> Vec<String> {
    points.iter().map(|&(lat, lon)| quadkey(lat, lon, level)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadkey_matches_documented_tile_example() {
        // Tile (3, 5) at level 3 is the worked example in the Bing tile docs.
        assert_eq!(quadkey_from_tile(3, 5, 3), "213");
    }

    #[test]
    fn quadkey_for_known_coordinates() {
        // Chicago, the reference point from the Bing tile system docs.
        assert_eq!(tile_xy(41.850, -87.650, 3), (2, 2));
        assert_eq!(quadkey(41.850, -87.650, 3), "030");
    }

    #[test]
    fn quadkey_is_deterministic_and_fixed_length() {
        let a = quadkey(4.964664, -73.916862, DEFAULT_LEVEL);
        let b = quadkey(4.964664, -73.916862, DEFAULT_LEVEL);
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_LEVEL as usize);
        assert!(a.bytes().all(|c| (b'0'..=b'3').contains(&c)));
    }

    #[test]
    fn child_key_starts_with_parent_key() {
        let parent = quadkey(4.964664, -73.916862, 5);
        let child = quadkey(4.964664, -73.916862, DEFAULT_LEVEL);
        assert!(child.starts_with(&parent));
    }

    #[test]
    fn polar_latitudes_clip_to_mercator_bound() {
        assert_eq!(quadkey(90.0, 10.0, 10), quadkey(MAX_LATITUDE, 10.0, 10));
        assert_eq!(quadkey(-90.0, 10.0, 10), quadkey(-MAX_LATITUDE, 10.0, 10));
    }

    #[test]
    fn batch_keys_preserve_input_order() {
        let points = [(41.850, -87.650), (4.964664, -73.916862), (41.850, -87.650)];
        let keys = quadkeys(&points, 8);
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], keys[2]);
        assert_eq!(keys[0], quadkey(41.850, -87.650, 8));
        assert_eq!(keys[1], quadkey(4.964664, -73.916862, 8));
    }
}
