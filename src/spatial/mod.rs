//! Spatial data structures for the board and the source image
//!
//! This module contains the grid geometry (toroidal or bounded axes,
//! four-direction neighbor lookup) and the tile layout of the source image.

/// Board grid geometry with per-axis wrap control
pub mod grid;
/// Tile layout of the source image and rotation coordinate remapping
pub mod tiles;

pub use grid::{Direction, Grid};
pub use tiles::TileGeometry;
