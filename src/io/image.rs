//! Board rendering and PNG export
//!
//! Renders the current arrangement by copying tile pixels straight from
//! the source image, remapping coordinates for rotated tiles. Empty
//! positions (growth in progress) stay transparent.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::algorithm::board::{BoardState, Placement};
use crate::io::error::{Result, SolverError};
use crate::spatial::tiles::{TileGeometry, rotated_local};

/// Render the arrangement into a fresh RGBA image
pub fn render_board(board: &BoardState, geometry: &TileGeometry, source: &RgbaImage) -> RgbaImage {
    let side = geometry.tile_px();
    let mut output: RgbaImage = ImageBuffer::from_pixel(
        geometry.source_width() as u32,
        geometry.source_height() as u32,
        Rgba([0, 0, 0, 0]),
    );

    for pos in 0..board.len() {
        let Placement::Occupied { tile, rotation } = board.placement(pos) else {
            continue;
        };
        let (col, row) = board.grid().xy_of(pos);
        let (src_x, src_y) = geometry.tile_origin(tile);
        let dest_x = col * side;
        let dest_y = row * side;

        for view_y in 0..side {
            for view_x in 0..side {
                let (local_x, local_y) = rotated_local(view_x, view_y, rotation, side);
                let pixel = *source.get_pixel((src_x + local_x) as u32, (src_y + local_y) as u32);
                output.put_pixel((dest_x + view_x) as u32, (dest_y + view_y) as u32, pixel);
            }
        }
    }
    output
}

/// Render the arrangement and save it as a PNG
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be written.
pub fn export_board_png(
    board: &BoardState,
    geometry: &TileGeometry,
    source: &RgbaImage,
    output_path: &Path,
) -> Result<()> {
    let rendered = render_board(board, geometry, source);

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SolverError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    rendered.save(output_path).map_err(|e| SolverError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::render_board;
    use crate::algorithm::board::{BoardState, Placement};
    use crate::spatial::grid::Grid;
    use crate::spatial::tiles::TileGeometry;
    use image::{Rgba, RgbaImage};

    #[test]
    fn identity_arrangement_reproduces_the_source() {
        let geometry = TileGeometry::new(2, 2, 4);
        let mut source = RgbaImage::new(8, 8);
        for (x, y, pixel) in source.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8 * 16, y as u8 * 16, 7, 255]);
        }
        let mut board = BoardState::empty(Grid::new(2, 2, true, true));
        for pos in 0..4 {
            board.set_placement(pos, Placement::Occupied { tile: pos, rotation: 0 });
        }
        let rendered = render_board(&board, &geometry, &source);
        assert_eq!(rendered.as_raw(), source.as_raw());
    }

    #[test]
    fn empty_positions_render_transparent() {
        let geometry = TileGeometry::new(2, 2, 4);
        let source = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let mut board = BoardState::empty(Grid::new(2, 2, true, true));
        board.set_placement(0, Placement::Occupied { tile: 3, rotation: 0 });
        let rendered = render_board(&board, &geometry, &source);
        assert_eq!(rendered.get_pixel(0, 0).0[3], 255);
        assert_eq!(rendered.get_pixel(7, 7).0[3], 0);
    }

    #[test]
    fn rotation_remaps_pixels_within_the_tile() {
        let geometry = TileGeometry::new(2, 2, 2);
        let mut source = RgbaImage::new(4, 4);
        for (x, y, pixel) in source.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8, y as u8, 0, 255]);
        }
        let mut board = BoardState::empty(Grid::new(2, 2, true, true));
        // a half-turned tile 0 at position 0
        board.set_placement(0, Placement::Occupied { tile: 0, rotation: 2 });
        let rendered = render_board(&board, &geometry, &source);
        // view (0,0) reads source-local (1,1)
        assert_eq!(rendered.get_pixel(0, 0).0, [1, 1, 0, 255]);
        assert_eq!(rendered.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }
}
