//! Seam, blob, and local score functions
//!
//! Scores are pure reads over the pixel field, the signature set, and the
//! current placements. Lower is better everywhere; a perfect seam costs
//! zero and absent seams (bounded boundaries, empty neighbors) contribute
//! nothing.

use crate::algorithm::board::{BoardState, Placement};
use crate::analysis::buckets::EdgeBucketIndex;
use crate::analysis::field::PixelField;
use crate::analysis::signatures::{EdgeSignature, SignatureSet, TileOrientation};
use crate::io::configuration::{ANGLE_PENALTY_WEIGHT, SolverConfig};
use crate::math::oklab;
use crate::spatial::grid::Direction;

/// Term weights snapshot used by one scoring call
#[derive(Clone, Copy, Debug)]
pub struct ScoreWeights {
    /// Border color mismatch weight
    pub color: f64,
    /// Inward ray mismatch weight
    pub vector: f64,
    /// Region-cohesion weight
    pub blob: f64,
    /// Whether the vector term participates at all
    pub use_vector: bool,
}

impl ScoreWeights {
    /// Snapshot the weights currently configured on the solver
    pub const fn from_config(config: &SolverConfig) -> Self {
        Self {
            color: config.w_color,
            vector: config.w_vector,
            blob: config.w_blob,
            use_vector: config.use_vector,
        }
    }
}

/// Cost of butting edge `edge_a` of oriented tile `a` against edge
/// `edge_b` of oriented tile `b`
///
/// Both edges sample their border in the same view-space order, so sample
/// `i` of one edge faces sample `i` of the other across the seam.
pub fn seam_cost(
    field: &PixelField,
    signatures: &SignatureSet,
    a: TileOrientation,
    edge_a: Direction,
    b: TileOrientation,
    edge_b: Direction,
    weights: ScoreWeights,
) -> f64 {
    let (Some(sig_a), Some(sig_b)) = (
        signatures.get(a.tile, a.rotation, edge_a),
        signatures.get(b.tile, b.rotation, edge_b),
    ) else {
        return 0.0;
    };

    let samples = sig_a.edge_points().len().min(sig_b.edge_points().len());
    if samples == 0 {
        return 0.0;
    }

    let mut color = 0.0f64;
    for (&p, &q) in sig_a.edge_points().iter().zip(sig_b.edge_points()) {
        color += f64::from(field.distance_sq(p, q));
    }
    color /= samples as f64;

    let mut cost = weights.color * color;
    if weights.use_vector {
        cost = weights.vector.mul_add(vector_cost(field, sig_a, sig_b), cost);
    }
    cost
}

/// Mean ray color mismatch plus a penalty for diverging winning angles
fn vector_cost(field: &PixelField, sig_a: &EdgeSignature, sig_b: &EdgeSignature) -> f64 {
    let depth = sig_a.ray_points().len().min(sig_b.ray_points().len());
    if depth == 0 {
        return 0.0;
    }

    let mut ray = 0.0f64;
    for (&p, &q) in sig_a.ray_points().iter().zip(sig_b.ray_points()) {
        ray += f64::from(field.distance_sq(p, q));
    }
    ray /= depth as f64;

    let angle_samples = sig_a.ray_angles().len().min(sig_b.ray_angles().len());
    let mut angle = 0.0f64;
    if angle_samples > 0 {
        for (&ai, &bi) in sig_a.ray_angles().iter().zip(sig_b.ray_angles()) {
            angle += f64::from(ai.abs_diff(bi));
        }
        angle /= angle_samples as f64;
    }

    ANGLE_PENALTY_WEIGHT.mul_add(angle, ray)
}

/// Seam cost from a position toward one neighbor
///
/// Absent neighbors (bounded boundary) and empty positions on either side
/// cost zero: the seam does not exist.
pub fn seam_toward(
    field: &PixelField,
    signatures: &SignatureSet,
    board: &BoardState,
    pos: usize,
    direction: Direction,
    weights: ScoreWeights,
) -> f64 {
    let Placement::Occupied { tile, rotation } = board.placement(pos) else {
        return 0.0;
    };
    let Some(neighbor) = board.grid().neighbor(pos, direction) else {
        return 0.0;
    };
    let Placement::Occupied {
        tile: n_tile,
        rotation: n_rotation,
    } = board.placement(neighbor)
    else {
        return 0.0;
    };

    seam_cost(
        field,
        signatures,
        TileOrientation { tile, rotation },
        direction,
        TileOrientation {
            tile: n_tile,
            rotation: n_rotation,
        },
        direction.opposite(),
        weights,
    )
}

/// Cohesion cost: squared perceptual distance between a tile's mean color
/// and the average of its present occupied neighbors' mean colors
///
/// Missing and empty neighbors are excluded from the average; with no
/// occupied neighbors the cost is zero.
pub fn blob_cost(signatures: &SignatureSet, board: &BoardState, pos: usize) -> f64 {
    let Some(tile) = board.placement(pos).tile() else {
        return 0.0;
    };
    let own_mean = signatures.tile_mean(tile);

    let mut sum = [0.0f32; 3];
    let mut count = 0usize;
    for neighbor in board.grid().neighbors(pos).into_iter().flatten() {
        if let Some(n_tile) = board.placement(neighbor).tile() {
            let mean = signatures.tile_mean(n_tile);
            sum[0] += mean[0];
            sum[1] += mean[1];
            sum[2] += mean[2];
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    let n = count as f32;
    let neighborhood = [sum[0] / n, sum[1] / n, sum[2] / n];
    f64::from(oklab::distance_sq(own_mean, neighborhood))
}

/// Full local score of a position: its four seams plus weighted cohesion
pub fn local_score(
    field: &PixelField,
    signatures: &SignatureSet,
    board: &BoardState,
    pos: usize,
    weights: ScoreWeights,
) -> f64 {
    if board.placement(pos).is_empty() {
        return 0.0;
    }
    let mut score = 0.0f64;
    for direction in Direction::ALL {
        score += seam_toward(field, signatures, board, pos, direction, weights);
    }
    if weights.blob > 0.0 {
        score = weights.blob.mul_add(blob_cost(signatures, board, pos), score);
    }
    score
}

/// Direction of the costliest seam at a position
///
/// Ties keep the first direction in N, E, S, W scan order. On a position
/// with no seams at all (isolated or fully bounded) this degrades to North.
pub fn worst_edge_dir(
    field: &PixelField,
    signatures: &SignatureSet,
    board: &BoardState,
    pos: usize,
    weights: ScoreWeights,
) -> Direction {
    let mut worst = Direction::North;
    let mut worst_cost = f64::NEG_INFINITY;
    for direction in Direction::ALL {
        let cost = seam_toward(field, signatures, board, pos, direction, weights);
        if cost > worst_cost {
            worst_cost = cost;
            worst = direction;
        }
    }
    worst
}

/// Bucket key of the seam-facing edge of a candidate partner
///
/// Looks up the focus tile's worst edge key, then asks which oriented
/// tiles present a matching edge across that seam.
pub fn matching_candidates<'a>(
    signatures: &SignatureSet,
    buckets: &'a EdgeBucketIndex,
    focus: TileOrientation,
    worst: Direction,
) -> &'a [TileOrientation] {
    signatures
        .get(focus.tile, focus.rotation, worst)
        .map_or(&[], |sig| buckets.candidates(worst.opposite(), sig.key()))
}
