//! The fixed geographic tile grid.
//!
//! The globe is cut into 0.5° × 0.5° cells, numbered row-major from the
//! south-west corner (-180°, -90°):
//!
//! ```text
//! tile = lat_index * TILES_PER_ROW + lon_index
//! lon_index = floor((lon + 180) / 0.5)     0 ..= 719
//! lat_index = floor((lat +  90) / 0.5)     0 ..= 359
//! ```
//!
//! A tile is the unit of incremental map loading; its file on disk is named
//! `<tile>.bin`.

use std::path::{Path, PathBuf};

use crate::{CoreError, CoreResult, GeoPoint, GeoRect, TileId};

/// Edge length of a tile in degrees.
pub const DEGREE_PER_TILE: f64 = 0.5;
/// Tiles per latitude row (360° / 0.5°).
pub const TILES_PER_ROW: u32 = 720;
/// Number of latitude rows (180° / 0.5°).
pub const TILE_ROWS: u32 = 360;

const LON_OFFSET: f64 = 180.0;
const LAT_OFFSET: f64 = 90.0;

impl TileId {
    /// Total number of tiles in the grid.
    pub const COUNT: u32 = TILES_PER_ROW * TILE_ROWS;

    /// Validate a raw tile number.
    pub fn checked(raw: u32) -> CoreResult<TileId> {
        if raw >= Self::COUNT {
            return Err(CoreError::InvalidTile(raw));
        }
        Ok(TileId(raw))
    }

    /// Tile containing `p`.
    ///
    /// Points on the east/north edge of the world (lon = 180 or lat = 90)
    /// are clamped into the last column/row instead of spilling into the
    /// next row.
    pub fn of(p: GeoPoint) -> TileId {
        let (lon_idx, lat_idx) = grid_indices(p);
        TileId(lat_idx * TILES_PER_ROW + lon_idx)
    }

    /// `(lon_index, lat_index)` of this tile.
    #[inline]
    pub fn indices(self) -> (u32, u32) {
        (self.0 % TILES_PER_ROW, self.0 / TILES_PER_ROW)
    }

    /// The rectangle covered by this tile (south-west inclusive).
    pub fn bounds(self) -> GeoRect {
        let (lon_idx, lat_idx) = self.indices();
        let min_lon = lon_idx as f64 * DEGREE_PER_TILE - LON_OFFSET;
        let min_lat = lat_idx as f64 * DEGREE_PER_TILE - LAT_OFFSET;
        GeoRect::new(
            min_lon as f32,
            min_lat as f32,
            (min_lon + DEGREE_PER_TILE) as f32,
            (min_lat + DEGREE_PER_TILE) as f32,
        )
    }

    /// All tiles intersecting `rect`, in ascending order.  Empty for an
    /// empty rectangle.
    pub fn covering(rect: &GeoRect) -> Vec<TileId> {
        if rect.is_empty() {
            return Vec::new();
        }
        let (lon_lo, lat_lo) = grid_indices(rect.min());
        let (lon_hi, lat_hi) = grid_indices(rect.max());
        let mut tiles = Vec::with_capacity(
            ((lon_hi - lon_lo + 1) * (lat_hi - lat_lo + 1)) as usize,
        );
        for lat_idx in lat_lo..=lat_hi {
            for lon_idx in lon_lo..=lon_hi {
                tiles.push(TileId(lat_idx * TILES_PER_ROW + lon_idx));
            }
        }
        tiles
    }

    /// File name of this tile inside a tile directory: `<tile>.bin`.
    pub fn file_name(self) -> String {
        format!("{}.bin", self.0)
    }

    /// Full path of this tile's file: `<dir>/<tile>.bin`.
    pub fn path_in(self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

fn grid_indices(p: GeoPoint) -> (u32, u32) {
    let lon = ((p.lon as f64 + LON_OFFSET) / DEGREE_PER_TILE).floor();
    let lat = ((p.lat as f64 + LAT_OFFSET) / DEGREE_PER_TILE).floor();
    (
        lon.clamp(0.0, (TILES_PER_ROW - 1) as f64) as u32,
        lat.clamp(0.0, (TILE_ROWS - 1) as f64) as u32,
    )
}
