// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Selection of map tiles covering a viewport.
//!
//! A [TileSet] is a quadtree of square images: depth 0 is a single tile covering
//! the whole root [BoundingBox], and every following depth splits each tile into 4.
//! [rasterize] picks the shallowest depth with enough resolution for the viewport,
//! and returns the grid of tiles intersecting the query box.

/// An axis-aligned box in degrees. `west < east` and `south < north` for non-degenerate boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub north: f64,
    pub east: f64,
    pub south: f64,
}

impl BoundingBox {
    pub fn is_degenerate(&self) -> bool {
        !(self.west < self.east && self.south < self.north)
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.west < other.east
            && self.east > other.west
            && self.south < other.north
            && self.north > other.south
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.west <= other.west
            && self.east >= other.east
            && self.south <= other.south
            && self.north >= other.north
    }
}

/// Describes a static set of map tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSet {
    /// Area covered by the single tile at depth 0.
    pub root: BoundingBox,

    /// Width (and height) of every tile, in pixels.
    pub tile_size: u32,

    /// Deepest available level of tiles. Depths of 32 and above can't be rastered.
    pub max_depth: u8,
}

/// Tiles of the Berkeley area, 256 px wide, with depths 0 through 7.
pub const BERKELEY_TILES: TileSet = TileSet {
    root: BoundingBox {
        west: -122.2998046875,
        north: 37.892195547244356,
        east: -122.2119140625,
        south: 37.82280243352756,
    },
    tile_size: 256,
    max_depth: 7,
};

impl TileSet {
    /// Returns the longitudinal distance per pixel (LonDPP) of tiles at the given depth.
    pub fn lon_dpp(&self, depth: u8) -> f64 {
        (self.root.east - self.root.west) / self.tile_size as f64 / 2.0_f64.powi(depth as i32)
    }

    /// Returns the shallowest depth whose LonDPP doesn't exceed `lon_dpp`,
    /// or [TileSet::max_depth] if no depth has enough resolution.
    pub fn depth_for(&self, lon_dpp: f64) -> u8 {
        (0..=self.max_depth)
            .find(|&depth| self.lon_dpp(depth) <= lon_dpp)
            .unwrap_or(self.max_depth)
    }
}

/// Identifies a single tile image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub depth: u8,
    /// Column, counted from the west edge of the root box.
    pub x: u32,
    /// Row, counted from the north edge of the root box.
    pub y: u32,
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}_x{}_y{}.png", self.depth, self.x, self.y)
    }
}

/// A viewport to display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterQuery {
    pub bbox: BoundingBox,

    /// Width of the viewport, in pixels.
    pub width: f64,
}

/// Grid of tiles covering a [RasterQuery].
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Tiles in row-major order: rows go north to south, columns go west to east.
    pub grid: Vec<Vec<TileId>>,

    /// Area covered by the whole grid. Contains the intersection of the
    /// query box with the root box.
    pub bbox: BoundingBox,

    pub depth: u8,
}

/// Reasons for rejecting a [RasterQuery].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RasterError {
    #[error("query box is empty or inverted")]
    Degenerate,

    #[error("query box doesn't intersect the tile set")]
    OutsideRoot,

    #[error("invalid viewport width: {0}")]
    InvalidWidth(f64),

    /// The selected depth has more tiles per axis than can be addressed.
    #[error("depth {0} is too deep to address its tiles")]
    DepthTooLarge(u8),
}

/// Clamps a fractional tile coordinate into a valid tile index.
fn tile_index(position: f64, tiles: u32) -> u32 {
    (position.floor().max(0.0) as u32).min(tiles - 1)
}

/// Finds the grid of tiles to display for the provided query.
///
/// The selected depth is the shallowest one whose tiles have at most the LonDPP
/// of the query, or the deepest available one. The grid contains every tile
/// of that depth which intersects the query box.
pub fn rasterize(tiles: &TileSet, query: &RasterQuery) -> Result<Raster, RasterError> {
    let q = &query.bbox;
    let root = &tiles.root;

    if !(query.width.is_finite() && query.width > 0.0) {
        log::warn!("rejecting raster query {:?}: invalid width", query);
        return Err(RasterError::InvalidWidth(query.width));
    }
    if q.is_degenerate() {
        log::warn!("rejecting raster query {:?}: degenerate box", query);
        return Err(RasterError::Degenerate);
    }
    if !q.intersects(root) {
        log::warn!("rejecting raster query {:?}: outside of root box", query);
        return Err(RasterError::OutsideRoot);
    }

    let depth = tiles.depth_for((q.east - q.west) / query.width);
    let Some(count) = 1_u32.checked_shl(depth as u32) else {
        log::warn!("rejecting raster query {:?}: depth {} is too deep", query, depth);
        return Err(RasterError::DepthTooLarge(depth));
    };
    let lon_per_tile = (root.east - root.west) / count as f64;
    let lat_per_tile = (root.north - root.south) / count as f64;

    let x_start = tile_index((q.west - root.west) / lon_per_tile, count);
    let x_end = tile_index((q.east - root.west) / lon_per_tile, count);
    let y_start = tile_index((root.north - q.north) / lat_per_tile, count);
    let y_end = tile_index((root.north - q.south) / lat_per_tile, count);

    let grid = (y_start..=y_end)
        .map(|y| (x_start..=x_end).map(|x| TileId { depth, x, y }).collect())
        .collect();

    let bbox = BoundingBox {
        west: root.west + x_start as f64 * lon_per_tile,
        north: root.north - y_start as f64 * lat_per_tile,
        east: root.west + (x_end + 1) as f64 * lon_per_tile,
        south: root.north - (y_end + 1) as f64 * lat_per_tile,
    };

    log::debug!(
        "rastered {:?} at depth {} into {}x{} tiles",
        query,
        depth,
        y_end - y_start + 1,
        x_end - x_start + 1
    );

    Ok(Raster { grid, bbox, depth })
}
