//! Tile layout of the source image and rotation coordinate remapping
//!
//! Tiles are cut from the source image in row-major order, so a tile's
//! identity doubles as its home position in the source. Rotation is never
//! applied to pixel data; instead, view-space coordinates are remapped to
//! source-space coordinates through `rotated_local`.

/// Layout of square tiles over the (cropped) source image
#[derive(Clone, Copy, Debug)]
pub struct TileGeometry {
    cols: usize,
    rows: usize,
    tile_px: usize,
}

impl TileGeometry {
    /// Create a layout of `cols x rows` tiles of `tile_px` pixels a side
    pub const fn new(cols: usize, rows: usize, tile_px: usize) -> Self {
        Self {
            cols,
            rows,
            tile_px,
        }
    }

    /// Number of tile columns
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of tile rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Tile side length in pixels
    pub const fn tile_px(&self) -> usize {
        self.tile_px
    }

    /// Total tile count
    pub const fn tile_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Width of the tiled source region in pixels
    pub const fn source_width(&self) -> usize {
        self.cols * self.tile_px
    }

    /// Height of the tiled source region in pixels
    pub const fn source_height(&self) -> usize {
        self.rows * self.tile_px
    }

    /// Top-left pixel coordinate of a tile's source sub-image
    pub const fn tile_origin(&self, tile: usize) -> (usize, usize) {
        (
            (tile % self.cols) * self.tile_px,
            (tile / self.cols) * self.tile_px,
        )
    }
}

/// Map a view-space local coordinate of a rotated tile to the source-space
/// local coordinate holding its pixel
///
/// `rotation` counts quarter turns clockwise. Both signature sampling and
/// board rendering go through this mapping so the two always agree.
pub const fn rotated_local(x: usize, y: usize, rotation: u8, side: usize) -> (usize, usize) {
    match rotation & 3 {
        1 => (side - 1 - y, x),
        2 => (side - 1 - x, side - 1 - y),
        3 => (y, side - 1 - x),
        _ => (x, y),
    }
}

/// Rotate a direction delta by the given number of quarter turns clockwise
pub const fn rotated_delta(dx: f32, dy: f32, rotation: u8) -> (f32, f32) {
    match rotation & 3 {
        1 => (-dy, dx),
        2 => (-dx, -dy),
        3 => (dy, -dx),
        _ => (dx, dy),
    }
}
