//! Candidate generation and exact swap-delta evaluation
//!
//! An attempt considers swapping the focus tile with a bounded set of
//! partners: tiles whose matching edge falls in the same quantized bucket
//! as the focus's worst seam, plus a handful of uniformly random ones.
//! Each candidate swap is costed exactly over the affected neighborhood
//! by speculatively applying it and restoring afterwards.

use rand::Rng;

use crate::algorithm::board::{BoardState, Placement};
use crate::algorithm::scoring::{self, ScoreWeights};
use crate::analysis::buckets::EdgeBucketIndex;
use crate::analysis::field::PixelField;
use crate::analysis::signatures::{SignatureSet, TileOrientation};
use crate::io::configuration::SolverConfig;

/// A fully specified swap and its exact score delta
#[derive(Clone, Copy, Debug)]
pub struct SwapProposal {
    /// Partner position whose tile trades places with the focus tile
    pub pos_b: usize,
    /// Placement to write at the focus position
    pub new_a: Placement,
    /// Placement to write at the partner position
    pub new_b: Placement,
    /// Exact change in summed local scores; negative improves the board
    pub delta: f64,
}

/// Exact local-score delta of writing `new_a`/`new_b` at two positions
///
/// Only the two positions and their neighbors can change score, so the
/// delta is the difference of sums over that set, computed by applying the
/// swap speculatively and restoring it. The board is returned unchanged.
pub fn delta_for_swap(
    field: &PixelField,
    signatures: &SignatureSet,
    board: &mut BoardState,
    pos_a: usize,
    pos_b: usize,
    new_a: Placement,
    new_b: Placement,
    weights: ScoreWeights,
) -> f64 {
    let mut affected: Vec<usize> = Vec::with_capacity(10);
    for pos in [pos_a, pos_b] {
        if !affected.contains(&pos) {
            affected.push(pos);
        }
        for neighbor in board.grid().neighbors(pos).into_iter().flatten() {
            if !affected.contains(&neighbor) {
                affected.push(neighbor);
            }
        }
    }

    let before: f64 = affected
        .iter()
        .map(|&pos| scoring::local_score(field, signatures, board, pos, weights))
        .sum();

    let old_a = board.placement(pos_a);
    let old_b = board.placement(pos_b);
    board.set_placement(pos_a, new_a);
    board.set_placement(pos_b, new_b);

    let after: f64 = affected
        .iter()
        .map(|&pos| scoring::local_score(field, signatures, board, pos, weights))
        .sum();

    board.set_placement(pos_a, old_a);
    board.set_placement(pos_b, old_b);

    after - before
}

/// Find the best swap for the focus position over one attempt's candidates
///
/// Candidates are `k_bucket` draws (with replacement) from the edge bucket
/// matching the focus's worst seam, plus `k_random` uniform draws. For each
/// usable partner the rotation neighborhood is searched: the candidate
/// enters the focus position at its bucket rotation or one quarter turn
/// either way, while the departing tile tries all four. With rotation
/// disabled both tiles keep their current rotations.
pub fn best_swap<R: Rng>(
    field: &PixelField,
    signatures: &SignatureSet,
    buckets: &EdgeBucketIndex,
    board: &mut BoardState,
    pos_a: usize,
    config: &SolverConfig,
    rng: &mut R,
) -> Option<SwapProposal> {
    let Placement::Occupied {
        tile: tile_a,
        rotation: rot_a,
    } = board.placement(pos_a)
    else {
        return None;
    };

    let weights = ScoreWeights::from_config(config);
    let worst = scoring::worst_edge_dir(field, signatures, board, pos_a, weights);
    let focus = TileOrientation {
        tile: tile_a,
        rotation: rot_a,
    };

    let bucket = scoring::matching_candidates(signatures, buckets, focus, worst);
    let tile_count = signatures.tile_count();
    let mut candidates = Vec::with_capacity(config.k_bucket + config.k_random);
    if !bucket.is_empty() {
        for _ in 0..config.k_bucket {
            let pick = rng.random_range(0..bucket.len());
            if let Some(&candidate) = bucket.get(pick) {
                candidates.push(candidate);
            }
        }
    }
    for _ in 0..config.k_random {
        candidates.push(TileOrientation {
            tile: rng.random_range(0..tile_count),
            rotation: if config.allow_rotation {
                rng.random_range(0..4u8)
            } else {
                0
            },
        });
    }

    let mut best: Option<SwapProposal> = None;
    for candidate in candidates {
        if candidate.tile == tile_a {
            continue;
        }
        let Some(pos_b) = board.position_of_tile(candidate.tile, rng) else {
            continue;
        };
        if pos_b == pos_a {
            continue;
        }
        let Placement::Occupied {
            tile: tile_b,
            rotation: rot_b,
        } = board.placement(pos_b)
        else {
            continue;
        };

        let (incoming_rotations, outgoing_rotations): (Vec<u8>, Vec<u8>) =
            if config.allow_rotation {
                (
                    vec![
                        candidate.rotation,
                        (candidate.rotation + 1) & 3,
                        (candidate.rotation + 3) & 3,
                    ],
                    vec![0, 1, 2, 3],
                )
            } else {
                (vec![rot_b], vec![rot_a])
            };

        for &incoming in &incoming_rotations {
            for &outgoing in &outgoing_rotations {
                let new_a = Placement::Occupied {
                    tile: tile_b,
                    rotation: incoming,
                };
                let new_b = Placement::Occupied {
                    tile: tile_a,
                    rotation: outgoing,
                };
                let delta = delta_for_swap(
                    field, signatures, board, pos_a, pos_b, new_a, new_b, weights,
                );
                if best.is_none_or(|b| delta < b.delta) {
                    best = Some(SwapProposal {
                        pos_b,
                        new_a,
                        new_b,
                        delta,
                    });
                }
            }
        }
    }
    best
}
