//! Growth-from-seed board constructor
//!
//! Instead of improving a shuffled arrangement, growth starts from a
//! single seed tile at the board center and accretes outward: each step
//! either places the best-matching unused tile at the most-constrained
//! frontier position, or relaxes the acceptance threshold when nothing
//! matches well enough. The result is a full board built once, not an
//! anytime process.

use std::collections::HashSet;

use bitvec::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::algorithm::board::{BoardState, Placement};
use crate::algorithm::scoring::{self, ScoreWeights};
use crate::analysis::field::PixelField;
use crate::analysis::signatures::{SignatureSet, TileOrientation};
use crate::io::configuration::SolverConfig;
use crate::spatial::grid::{Direction, Grid};
use crate::spatial::tiles::TileGeometry;

/// Outcome of one growth step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthStep {
    /// A tile was placed at a frontier position
    Placed {
        /// Position that received the tile
        pos: usize,
        /// Tile placed there
        tile: usize,
    },
    /// No frontier position matched; the threshold was relaxed
    Relaxed,
    /// Every tile is placed
    Complete,
}

/// Incremental growth state over an initially empty board
pub struct GrowthBuilder {
    field: PixelField,
    geometry: TileGeometry,
    signatures: SignatureSet,
    board: BoardState,
    unused: BitVec,
    frontier: HashSet<usize>,
    threshold: f64,
    config: SolverConfig,
    rng: StdRng,
    seeded: bool,
}

impl GrowthBuilder {
    /// Start growth over an empty board; the seed is placed by the first
    /// `step` call
    pub fn new(
        field: PixelField,
        geometry: TileGeometry,
        signatures: SignatureSet,
        config: SolverConfig,
        seed: u64,
    ) -> Self {
        let grid = Grid::new(
            geometry.cols(),
            geometry.rows(),
            config.toroidal_x,
            config.toroidal_y,
        );
        Self {
            field,
            geometry,
            signatures,
            board: BoardState::empty(grid),
            unused: bitvec![1; geometry.tile_count()],
            frontier: HashSet::new(),
            threshold: config.grow_match_threshold,
            config,
            rng: StdRng::seed_from_u64(seed),
            seeded: false,
        }
    }

    /// The partially (or fully) grown arrangement
    pub const fn board(&self) -> &BoardState {
        &self.board
    }

    /// Tiles not yet placed
    pub fn unused_count(&self) -> usize {
        self.unused.count_ones()
    }

    /// Current acceptance threshold
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether a tile is still waiting to be placed
    pub fn is_unused(&self, tile: usize) -> bool {
        self.unused.get(tile).is_some_and(|bit| *bit)
    }

    /// Run one growth step
    pub fn step(&mut self) -> GrowthStep {
        if !self.seeded {
            return self.place_seed();
        }
        if self.unused.not_any() || self.frontier.is_empty() {
            return GrowthStep::Complete;
        }

        // Most-constrained first: frontier positions with more occupied
        // neighbors are scanned earlier; position index breaks ties so the
        // scan is deterministic for a given seed
        let mut ordered: Vec<usize> = self.frontier.iter().copied().collect();
        ordered.sort_unstable_by_key(|&pos| {
            (std::cmp::Reverse(self.occupied_neighbor_count(pos)), pos)
        });

        for pos in ordered {
            if let Some((candidate, cost)) = self.best_fit(pos)
                && cost < self.threshold
            {
                self.place(pos, candidate);
                return GrowthStep::Placed {
                    pos,
                    tile: candidate.tile,
                };
            }
        }

        self.threshold *= self.config.grow_relax_factor;
        GrowthStep::Relaxed
    }

    fn place_seed(&mut self) -> GrowthStep {
        self.seeded = true;
        let grid = *self.board.grid();
        let center = grid.pos_of(grid.cols() / 2, grid.rows() / 2);
        let pick = self.rng.random_range(0..self.geometry.tile_count().max(1));
        let rotation = if self.config.allow_rotation {
            self.rng.random_range(0..4u8)
        } else {
            0
        };
        self.place(
            center,
            TileOrientation {
                tile: pick,
                rotation,
            },
        );
        GrowthStep::Placed {
            pos: center,
            tile: pick,
        }
    }

    fn place(&mut self, pos: usize, candidate: TileOrientation) {
        self.board.set_placement(
            pos,
            Placement::Occupied {
                tile: candidate.tile,
                rotation: candidate.rotation,
            },
        );
        if let Some(mut bit) = self.unused.get_mut(candidate.tile) {
            *bit = false;
        }
        self.frontier.remove(&pos);
        for neighbor in self.board.grid().neighbors(pos).into_iter().flatten() {
            if self.board.placement(neighbor).is_empty() {
                self.frontier.insert(neighbor);
            }
        }
    }

    fn occupied_neighbor_count(&self, pos: usize) -> usize {
        self.board
            .grid()
            .neighbors(pos)
            .into_iter()
            .flatten()
            .filter(|&n| !self.board.placement(n).is_empty())
            .count()
    }

    /// Best unused (tile, rotation) for a frontier position: lowest mean
    /// seam cost against the occupied neighbors; ties keep the first
    /// candidate scanned
    fn best_fit(&self, pos: usize) -> Option<(TileOrientation, f64)> {
        let weights = ScoreWeights::from_config(&self.config);
        let seams: Vec<(Direction, TileOrientation)> = Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let neighbor = self.board.grid().neighbor(pos, direction)?;
                match self.board.placement(neighbor) {
                    Placement::Occupied { tile, rotation } => {
                        Some((direction, TileOrientation { tile, rotation }))
                    }
                    Placement::Empty => None,
                }
            })
            .collect();
        if seams.is_empty() {
            return None;
        }

        let rotations: &[u8] = if self.config.allow_rotation {
            &[0, 1, 2, 3]
        } else {
            &[0]
        };

        let mut best: Option<(TileOrientation, f64)> = None;
        for tile in self.unused.iter_ones() {
            for &rotation in rotations {
                let candidate = TileOrientation { tile, rotation };
                let total: f64 = seams
                    .iter()
                    .map(|&(direction, neighbor)| {
                        scoring::seam_cost(
                            &self.field,
                            &self.signatures,
                            candidate,
                            direction,
                            neighbor,
                            direction.opposite(),
                            weights,
                        )
                    })
                    .sum();
                let cost = total / seams.len() as f64;
                if best.is_none_or(|(_, b)| cost < b) {
                    best = Some((candidate, cost));
                }
            }
        }
        best
    }
}
