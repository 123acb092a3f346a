//! Perceptual pixel field extraction from source images
//!
//! Converts every pixel of the (cropped) source image to `OKLab` once and
//! caches the result as three channel planes. All downstream distance
//! computations index into this field; no other code touches raw `sRGB`.

use std::path::Path;

use image::RgbaImage;
use ndarray::Array2;

use crate::io::error::{Result, SolverError, invalid_parameter, invalid_source};
use crate::math::oklab;
use crate::spatial::tiles::TileGeometry;

/// Per-pixel `OKLab` buffer for the tiled source region
#[derive(Clone, Debug)]
pub struct PixelField {
    width: usize,
    height: usize,
    l: Array2<f32>,
    a: Array2<f32>,
    b: Array2<f32>,
}

impl PixelField {
    /// Build a field directly from `OKLab` values, one triple per pixel
    ///
    /// Mostly useful for tests and benchmarks that want exact control over
    /// perceptual values without round-tripping through `sRGB`.
    pub fn from_oklab_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> [f32; 3],
    {
        let mut l = Array2::zeros((height, width));
        let mut a = Array2::zeros((height, width));
        let mut b = Array2::zeros((height, width));
        for y in 0..height {
            for x in 0..width {
                let lab = f(x, y);
                if let Some(v) = l.get_mut((y, x)) {
                    *v = lab[0];
                }
                if let Some(v) = a.get_mut((y, x)) {
                    *v = lab[1];
                }
                if let Some(v) = b.get_mut((y, x)) {
                    *v = lab[2];
                }
            }
        }
        Self {
            width,
            height,
            l,
            a,
            b,
        }
    }

    /// Convert a decoded RGBA image into a perceptual field
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_oklab_fn(width as usize, height as usize, |x, y| {
            let pixel = image.get_pixel(x as u32, y as u32);
            oklab::oklab_from_srgb(pixel.0[0], pixel.0[1], pixel.0[2])
        })
    }

    /// Field width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Field height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// `OKLab` triple at a pixel coordinate; out-of-range reads return black
    pub fn sample(&self, x: usize, y: usize) -> [f32; 3] {
        [
            self.l.get((y, x)).copied().unwrap_or(0.0),
            self.a.get((y, x)).copied().unwrap_or(0.0),
            self.b.get((y, x)).copied().unwrap_or(0.0),
        ]
    }

    /// Squared perceptual distance between two pixel coordinates
    pub fn distance_sq(&self, p: (usize, usize), q: (usize, usize)) -> f32 {
        oklab::distance_sq(self.sample(p.0, p.1), self.sample(q.0, q.1))
    }
}

/// A loaded source image together with its perceptual field and tile layout
pub struct SourceImage {
    /// Cropped RGBA pixels, kept for rendering the final board
    pub pixels: RgbaImage,
    /// Perceptual field over the cropped pixels
    pub field: PixelField,
    /// Tile layout of the cropped region
    pub geometry: TileGeometry,
}

/// Load a source PNG and cut it into a whole number of square tiles
///
/// The image is cropped to the largest multiple of `tile_px` on each axis;
/// trailing partial tiles are discarded, matching how the board is laid out.
///
/// # Errors
///
/// Returns an error if:
/// - `tile_px` is smaller than 2 pixels
/// - The file cannot be decoded
/// - The image holds fewer than 2x2 whole tiles
pub fn load_source(path: &Path, tile_px: usize) -> Result<SourceImage> {
    if tile_px < 2 {
        return Err(invalid_parameter(
            "tile_size",
            &tile_px,
            &"tile side must be at least 2 pixels",
        ));
    }

    let decoded = image::open(path).map_err(|e| SolverError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rgba = decoded.to_rgba8();

    let cols = rgba.width() as usize / tile_px;
    let rows = rgba.height() as usize / tile_px;
    if cols < 2 || rows < 2 {
        return Err(invalid_source(format!(
            "image {}x{} holds fewer than 2x2 tiles of {tile_px} pixels",
            rgba.width(),
            rgba.height()
        )));
    }

    let geometry = TileGeometry::new(cols, rows, tile_px);
    let cropped = image::imageops::crop_imm(
        &rgba,
        0,
        0,
        geometry.source_width() as u32,
        geometry.source_height() as u32,
    )
    .to_image();

    let field = PixelField::from_rgba_image(&cropped);

    Ok(SourceImage {
        pixels: cropped,
        field,
        geometry,
    })
}
