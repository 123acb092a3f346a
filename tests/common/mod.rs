//! Shared fixtures for integration tests
#![allow(dead_code)]

use seamtile::analysis::field::PixelField;
use seamtile::io::configuration::SolverConfig;
use seamtile::spatial::tiles::TileGeometry;

/// Side length of fixture tiles in pixels
pub const SIDE: usize = 8;

/// A field whose tiles are flat gray except for their left and right pixel
/// columns, which carry a per-tile lightness from `h`
///
/// Vertical seams between tiles `s` and `t` then cost roughly
/// `(h[s] - h[t])^2` per sample while horizontal seams cost almost nothing,
/// which makes improving swaps easy to construct by hand.
pub fn edge_coded_field(cols: usize, rows: usize, h: &[f32]) -> PixelField {
    PixelField::from_oklab_fn(cols * SIDE, rows * SIDE, |x, y| {
        let tile = (y / SIDE) * cols + (x / SIDE);
        let local_x = x % SIDE;
        let lightness = if local_x == 0 || local_x == SIDE - 1 {
            h.get(tile).copied().unwrap_or(0.5)
        } else {
            0.5
        };
        [lightness, 0.0, 0.0]
    })
}

/// Geometry matching `edge_coded_field`
pub fn edge_coded_geometry(cols: usize, rows: usize) -> TileGeometry {
    TileGeometry::new(cols, rows, SIDE)
}

/// A deterministic configuration: color term only, no rotation, no escape
/// moves, no tabu, both axes wrapping
pub fn color_only_config() -> SolverConfig {
    SolverConfig {
        w_blob: 0.0,
        use_vector: false,
        allow_rotation: false,
        escape_move_chance: 0.0,
        tabu_steps: 0,
        ..SolverConfig::default()
    }
}
