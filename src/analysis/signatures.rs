//! Per-tile edge and ray signature extraction
//!
//! Every tile gets, for each of its four edges under each of the four
//! rotations, a fixed set of border sample points, an inward "ray" per
//! border point along the most color-coherent of a few candidate angles,
//! and a quantized mean-color key for bucket lookup. Signatures store
//! source-space pixel coordinates, so seam scoring never remaps anything
//! at attempt time.

use crate::analysis::field::PixelField;
use crate::io::configuration::{
    EDGE_SAMPLES, KEY_BITS, KEY_LEVELS, RAY_ANGLES_DEG, RAY_DEPTH, SIGNATURE_TILES_PER_CHUNK,
};
use crate::spatial::grid::Direction;
use crate::spatial::tiles::{TileGeometry, rotated_delta, rotated_local};

/// A tile identity paired with a quarter-turn rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileOrientation {
    /// Tile index in source row-major order
    pub tile: usize,
    /// Quarter turns clockwise, 0..4
    pub rotation: u8,
}

/// Signature of one tile edge under one rotation
#[derive(Clone, Debug)]
pub struct EdgeSignature {
    edge_points: Vec<(usize, usize)>,
    ray_points: Vec<(usize, usize)>,
    ray_angles: Vec<u8>,
    key: u32,
}

impl EdgeSignature {
    /// Source-space pixel coordinates of the border samples, outer to outer
    /// in view-space scan order
    pub fn edge_points(&self) -> &[(usize, usize)] {
        &self.edge_points
    }

    /// Source-space ray pixels, `RAY_DEPTH` consecutive entries per border
    /// sample
    pub fn ray_points(&self) -> &[(usize, usize)] {
        &self.ray_points
    }

    /// Winning candidate-angle index per border sample
    pub fn ray_angles(&self) -> &[u8] {
        &self.ray_angles
    }

    /// Quantized mean-color bucket key of this edge
    pub const fn key(&self) -> u32 {
        self.key
    }
}

/// Flat index of an edge signature within the set
const fn signature_index(tile: usize, rotation: u8, edge: Direction) -> usize {
    (tile * 4 + (rotation & 3) as usize) * 4 + edge.index()
}

/// All edge signatures of a source image, for every tile and rotation
#[derive(Clone, Debug)]
pub struct SignatureSet {
    signatures: Vec<EdgeSignature>,
    tile_means: Vec<[f32; 3]>,
    tile_count: usize,
}

impl SignatureSet {
    /// Extract signatures for every tile in one pass
    pub fn build(field: &PixelField, geometry: TileGeometry) -> Self {
        let mut builder = SignatureBuilder::new(field, geometry);
        while !builder.process_chunk(SIGNATURE_TILES_PER_CHUNK) {}
        builder.finish()
    }

    /// Signature of one tile edge under a rotation
    pub fn get(&self, tile: usize, rotation: u8, edge: Direction) -> Option<&EdgeSignature> {
        self.signatures.get(signature_index(tile, rotation, edge))
    }

    /// Mean `OKLab` color over a tile's full pixel area
    pub fn tile_mean(&self, tile: usize) -> [f32; 3] {
        self.tile_means.get(tile).copied().unwrap_or([0.0; 3])
    }

    /// Number of tiles covered by this set
    pub const fn tile_count(&self) -> usize {
        self.tile_count
    }
}

/// Precomputed local sample layout shared by every tile
///
/// Indexed by `rotation * 4 + edge`, so extraction per tile is pure table
/// walking plus pixel reads.
struct SampleTables {
    edge_locals: Vec<Vec<(usize, usize)>>,
    ray_dirs: Vec<Vec<(f32, f32)>>,
}

impl SampleTables {
    fn new(side: usize) -> Self {
        let mut edge_locals = Vec::with_capacity(16);
        let mut ray_dirs = Vec::with_capacity(16);
        for rotation in 0..4u8 {
            for edge in Direction::ALL {
                let mut locals = Vec::with_capacity(EDGE_SAMPLES);
                for i in 0..EDGE_SAMPLES {
                    let (x, y) = edge_sample_local(i, edge, side);
                    locals.push(rotated_local(x, y, rotation, side));
                }
                edge_locals.push(locals);

                let (nx, ny) = inward_normal(edge);
                let base = ny.atan2(nx);
                let mut dirs = Vec::with_capacity(RAY_ANGLES_DEG.len());
                for &deg in &RAY_ANGLES_DEG {
                    let angle = base + deg.to_radians();
                    dirs.push(rotated_delta(angle.cos(), angle.sin(), rotation));
                }
                ray_dirs.push(dirs);
            }
        }
        Self {
            edge_locals,
            ray_dirs,
        }
    }
}

/// View-space local coordinate of border sample `i` on an unrotated edge
const fn edge_sample_local(i: usize, edge: Direction, side: usize) -> (usize, usize) {
    let u = if EDGE_SAMPLES < 2 {
        (side - 1) / 2
    } else {
        i * (side - 1) / (EDGE_SAMPLES - 1)
    };
    match edge {
        Direction::North => (u, 0),
        Direction::East => (side - 1, u),
        Direction::South => (u, side - 1),
        Direction::West => (0, u),
    }
}

/// Unit delta pointing from an edge into the tile interior
const fn inward_normal(edge: Direction) -> (f32, f32) {
    match edge {
        Direction::North => (0.0, 1.0),
        Direction::East => (-1.0, 0.0),
        Direction::South => (0.0, -1.0),
        Direction::West => (1.0, 0.0),
    }
}

/// Sum of squared color steps between consecutive ray pixels; lower means
/// the ray follows a smoother color gradient
fn ray_coherence(field: &PixelField, ray: &[(usize, usize)]) -> f32 {
    ray.windows(2)
        .map(|pair| match (pair.first(), pair.get(1)) {
            (Some(&p), Some(&q)) => field.distance_sq(p, q),
            _ => 0.0,
        })
        .sum()
}

/// Quantize a mean `OKLab` color into a packed bucket key
fn edge_key(mean: [f32; 3]) -> u32 {
    let max = (KEY_LEVELS - 1) as f32;
    let quantize = |v: f32| -> u32 { (v * max).clamp(0.0, max) as u32 };
    let ql = quantize(mean[0]);
    let qa = quantize(mean[1] + 0.5);
    let qb = quantize(mean[2] + 0.5);
    (ql << (2 * KEY_BITS)) | (qa << KEY_BITS) | qb
}

/// Incremental signature extractor, one or more tiles at a time
///
/// Extraction is the most expensive preprocessing step, so the shell
/// interleaves it with progress updates instead of blocking on one call.
pub struct SignatureBuilder<'a> {
    field: &'a PixelField,
    geometry: TileGeometry,
    tables: SampleTables,
    signatures: Vec<EdgeSignature>,
    tile_means: Vec<[f32; 3]>,
    next_tile: usize,
}

impl<'a> SignatureBuilder<'a> {
    /// Start extraction over all tiles of the layout
    pub fn new(field: &'a PixelField, geometry: TileGeometry) -> Self {
        let tile_count = geometry.tile_count();
        Self {
            field,
            geometry,
            tables: SampleTables::new(geometry.tile_px()),
            signatures: Vec::with_capacity(tile_count * 16),
            tile_means: Vec::with_capacity(tile_count),
            next_tile: 0,
        }
    }

    /// Number of tiles not yet processed
    pub const fn remaining(&self) -> usize {
        self.geometry.tile_count() - self.next_tile
    }

    /// Process up to `budget` tiles; returns true once all tiles are done
    pub fn process_chunk(&mut self, budget: usize) -> bool {
        for _ in 0..budget {
            if self.next_tile >= self.geometry.tile_count() {
                break;
            }
            self.process_tile(self.next_tile);
            self.next_tile += 1;
        }
        self.next_tile >= self.geometry.tile_count()
    }

    /// Finish extraction (processing any leftover tiles) and build the set
    pub fn finish(mut self) -> SignatureSet {
        while !self.process_chunk(SIGNATURE_TILES_PER_CHUNK) {}
        SignatureSet {
            signatures: self.signatures,
            tile_means: self.tile_means,
            tile_count: self.geometry.tile_count(),
        }
    }

    fn process_tile(&mut self, tile: usize) {
        let side = self.geometry.tile_px();
        let (tx, ty) = self.geometry.tile_origin(tile);

        let mut mean = [0.0f32; 3];
        for ly in 0..side {
            for lx in 0..side {
                let c = self.field.sample(tx + lx, ty + ly);
                mean[0] += c[0];
                mean[1] += c[1];
                mean[2] += c[2];
            }
        }
        let area = (side * side) as f32;
        mean[0] /= area;
        mean[1] /= area;
        mean[2] /= area;
        self.tile_means.push(mean);

        for rotation in 0..4u8 {
            for edge in Direction::ALL {
                let signature = self.extract_edge(tile, rotation, edge);
                self.signatures.push(signature);
            }
        }
    }

    fn extract_edge(&self, tile: usize, rotation: u8, edge: Direction) -> EdgeSignature {
        let side = self.geometry.tile_px();
        let (tx, ty) = self.geometry.tile_origin(tile);
        let table = rotation as usize * 4 + edge.index();
        let empty_locals: &[(usize, usize)] = &[];
        let empty_dirs: &[(f32, f32)] = &[];
        let locals = self
            .tables
            .edge_locals
            .get(table)
            .map_or(empty_locals, Vec::as_slice);
        let dirs = self
            .tables
            .ray_dirs
            .get(table)
            .map_or(empty_dirs, Vec::as_slice);

        let mut edge_points = Vec::with_capacity(EDGE_SAMPLES);
        let mut ray_points = Vec::with_capacity(EDGE_SAMPLES * RAY_DEPTH);
        let mut ray_angles = Vec::with_capacity(EDGE_SAMPLES);
        let mut mean = [0.0f32; 3];

        for &(lx, ly) in locals {
            let gx = tx + lx;
            let gy = ty + ly;
            edge_points.push((gx, gy));

            let c = self.field.sample(gx, gy);
            mean[0] += c[0];
            mean[1] += c[1];
            mean[2] += c[2];

            let mut best_ray = Vec::new();
            let mut best_angle = 0u8;
            let mut best_score = f32::INFINITY;
            for (angle_index, &(dx, dy)) in dirs.iter().enumerate() {
                let ray = trace_ray(gx, gy, dx, dy, tx, ty, side);
                let score = ray_coherence(self.field, &ray);
                // strict comparison keeps the first (most negative) angle
                // on ties
                if score < best_score {
                    best_score = score;
                    best_angle = angle_index as u8;
                    best_ray = ray;
                }
            }
            ray_angles.push(best_angle);
            ray_points.extend_from_slice(&best_ray);
        }

        let samples = edge_points.len().max(1) as f32;
        mean[0] /= samples;
        mean[1] /= samples;
        mean[2] /= samples;

        EdgeSignature {
            edge_points,
            ray_points,
            ray_angles,
            key: edge_key(mean),
        }
    }

}

/// Walk `RAY_DEPTH` pixels from a border sample along a direction, clamped
/// to the tile's pixel box
fn trace_ray(
    gx: usize,
    gy: usize,
    dx: f32,
    dy: f32,
    tx: usize,
    ty: usize,
    side: usize,
) -> Vec<(usize, usize)> {
    let mut ray = Vec::with_capacity(RAY_DEPTH);
    for depth in 0..RAY_DEPTH {
        let px = dx.mul_add(depth as f32, gx as f32) as i64;
        let py = dy.mul_add(depth as f32, gy as f32) as i64;
        let cx = px.clamp(tx as i64, (tx + side - 1) as i64) as usize;
        let cy = py.clamp(ty as i64, (ty + side - 1) as i64) as usize;
        ray.push((cx, cy));
    }
    ray
}

#[cfg(test)]
mod tests {
    use super::{SignatureBuilder, SignatureSet, edge_sample_local};
    use crate::analysis::field::PixelField;
    use crate::io::configuration::{EDGE_SAMPLES, RAY_DEPTH};
    use crate::spatial::grid::Direction;
    use crate::spatial::tiles::TileGeometry;

    fn gradient_field(geometry: TileGeometry) -> PixelField {
        PixelField::from_oklab_fn(geometry.source_width(), geometry.source_height(), |x, y| {
            [
                x as f32 / geometry.source_width() as f32,
                y as f32 / geometry.source_height() as f32 - 0.5,
                0.0,
            ]
        })
    }

    #[test]
    fn every_tile_gets_sixteen_edge_signatures() {
        let geometry = TileGeometry::new(3, 2, 8);
        let set = SignatureSet::build(&gradient_field(geometry), geometry);
        assert_eq!(set.tile_count(), 6);
        for tile in 0..set.tile_count() {
            for rotation in 0..4 {
                for edge in Direction::ALL {
                    let sig = set.get(tile, rotation, edge).unwrap();
                    assert_eq!(sig.edge_points().len(), EDGE_SAMPLES);
                    assert_eq!(sig.ray_points().len(), EDGE_SAMPLES * RAY_DEPTH);
                    assert_eq!(sig.ray_angles().len(), EDGE_SAMPLES);
                }
            }
        }
    }

    #[test]
    fn edge_samples_span_the_full_edge() {
        let side = 16;
        assert_eq!(edge_sample_local(0, Direction::North, side), (0, 0));
        assert_eq!(
            edge_sample_local(EDGE_SAMPLES - 1, Direction::North, side),
            (side - 1, 0)
        );
        assert_eq!(edge_sample_local(0, Direction::East, side), (side - 1, 0));
        assert_eq!(
            edge_sample_local(EDGE_SAMPLES - 1, Direction::West, side),
            (0, side - 1)
        );
    }

    #[test]
    fn rotated_north_edge_reads_the_unrotated_east_edge() {
        // Under one quarter turn the view's top edge reads the source's
        // east edge pixels, in the same sample order
        let geometry = TileGeometry::new(2, 2, 8);
        let set = SignatureSet::build(&gradient_field(geometry), geometry);
        let rotated = set.get(0, 1, Direction::North).unwrap();
        let east = set.get(0, 0, Direction::East).unwrap();
        assert_eq!(rotated.edge_points(), east.edge_points());
    }

    #[test]
    fn ray_pixels_stay_inside_the_tile() {
        let geometry = TileGeometry::new(2, 2, 8);
        let field = gradient_field(geometry);
        let set = SignatureBuilder::new(&field, geometry).finish();
        let (tx, ty) = geometry.tile_origin(3);
        let side = geometry.tile_px();
        let sig = set.get(3, 2, Direction::South).unwrap();
        for &(x, y) in sig.ray_points() {
            assert!(x >= tx && x < tx + side);
            assert!(y >= ty && y < ty + side);
        }
    }

    #[test]
    fn incremental_chunks_match_one_shot_extraction() {
        let geometry = TileGeometry::new(3, 3, 8);
        let field = gradient_field(geometry);
        let one_shot = SignatureSet::build(&field, geometry);

        let mut builder = SignatureBuilder::new(&field, geometry);
        assert_eq!(builder.remaining(), 9);
        while !builder.process_chunk(2) {}
        let chunked = builder.finish();

        for tile in 0..geometry.tile_count() {
            for rotation in 0..4 {
                for edge in Direction::ALL {
                    let a = one_shot.get(tile, rotation, edge).unwrap();
                    let b = chunked.get(tile, rotation, edge).unwrap();
                    assert_eq!(a.key(), b.key());
                    assert_eq!(a.edge_points(), b.edge_points());
                }
            }
        }
    }
}
