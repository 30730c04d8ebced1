//! Web Mercator slippy-map math.
//!
//! The world at zoom `z` is a square of `TILE_SIZE * 2^z` pixels, addressed
//! from the top-left corner (lng -180, lat +85.05).
//! Tiles are `TILE_SIZE` squares addressed by `(z, x, y)`.

use crate::models::Coords;

pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit where the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A point in world pixel space at some zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Side length of the world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(i32::from(zoom))
}

/// Number of tiles along one axis at `zoom`.
pub fn tile_count(zoom: u8) -> u32 {
    1u32 << zoom.min(31)
}

/// Coordinates to world pixels.
pub fn project(coords: Coords, zoom: u8) -> WorldPoint {
    let size = world_size(zoom);
    let lat = coords.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (coords.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * size;
    WorldPoint { x, y }
}

/// World pixels back to coordinates. Longitude wraps into [-180, 180).
pub fn unproject(point: WorldPoint, zoom: u8) -> Coords {
    let size = world_size(zoom);
    let lng = point.x / size * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * point.y / size);
    let lat = n.sinh().atan().to_degrees();
    Coords {
        lat: lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        lng: wrap_lng(lng),
    }
}

fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Convert a point inside the map container (origin top-left) to
/// coordinates, given the coordinates at the container's centre.
pub fn container_to_coords(
    container_x: f64,
    container_y: f64,
    width: f64,
    height: f64,
    center: Coords,
    zoom: u8,
) -> Coords {
    let c = project(center, zoom);
    let point = WorldPoint {
        x: c.x + (container_x - width / 2.0),
        y: c.y + (container_y - height / 2.0),
    };
    unproject(point, zoom)
}

/// Tiles covering a `width` x `height` viewport centred on `center`, plus
/// one tile of margin on each side. Rows outside the world are dropped;
/// columns wrap around the antimeridian.
pub fn visible_tiles(center: Coords, zoom: u8, width: f64, height: f64) -> Vec<(Tile, WorldPoint)> {
    let c = project(center, zoom);
    let first_col = ((c.x - width / 2.0) / TILE_SIZE).floor() as i64 - 1;
    let last_col = ((c.x + width / 2.0) / TILE_SIZE).floor() as i64 + 1;
    let first_row = ((c.y - height / 2.0) / TILE_SIZE).floor() as i64 - 1;
    let last_row = ((c.y + height / 2.0) / TILE_SIZE).floor() as i64 + 1;
    let count = i64::from(tile_count(zoom));

    let mut tiles = Vec::new();
    for row in first_row.max(0)..=last_row.min(count - 1) {
        for col in first_col..=last_col {
            let tile = Tile {
                z: zoom,
                x: col.rem_euclid(count) as u32,
                y: row as u32,
            };
            let origin = WorldPoint {
                x: col as f64 * TILE_SIZE,
                y: row as f64 * TILE_SIZE,
            };
            tiles.push((tile, origin));
        }
    }
    tiles
}

/// Fill a `{z}/{x}/{y}` URL template. `{s}` picks a subdomain from a-c.
pub fn tile_url(template: &str, tile: Tile) -> String {
    let subdomain = ["a", "b", "c"][((tile.x + tile.y) % 3) as usize];
    template
        .replace("{s}", subdomain)
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
}
