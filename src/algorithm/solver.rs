//! Attempt loop, acceptance policy, and solver context
//!
//! One `attempt_improve_once` call is the unit of work: bounded, exact,
//! and safe to interleave with rendering or shutdown at any point. The
//! board is always a valid arrangement between calls.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::algorithm::board::BoardState;
use crate::algorithm::cursor::CursorState;
use crate::algorithm::moves::{self, SwapProposal};
use crate::algorithm::scoring::{self, ScoreWeights};
use crate::analysis::buckets::EdgeBucketIndex;
use crate::analysis::field::PixelField;
use crate::analysis::signatures::SignatureSet;
use crate::io::configuration::{ESCAPE_TABU_FACTOR, SolverConfig};
use crate::io::error::{Result, invalid_source};
use crate::spatial::grid::Grid;
use crate::spatial::tiles::TileGeometry;

/// Last-moved step per tile, for the tabu window
///
/// The step counter advances once per accepted move, so the window is
/// measured in committed swaps, not attempts.
#[derive(Clone, Debug)]
struct TabuTable {
    last_moved: Vec<i64>,
    step: i64,
}

impl TabuTable {
    fn new(tile_count: usize) -> Self {
        Self {
            last_moved: vec![-1_000_000; tile_count],
            step: 0,
        }
    }

    fn is_tabu(&self, tile: usize, window: u32) -> bool {
        self.last_moved
            .get(tile)
            .is_some_and(|&moved| self.step - moved < i64::from(window))
    }

    fn record(&mut self, tile: usize) {
        if let Some(slot) = self.last_moved.get_mut(tile) {
            *slot = self.step;
        }
    }

    const fn advance(&mut self) {
        self.step += 1;
    }
}

/// Running counters of one optimization session
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    /// Attempts evaluated, accepted or not
    pub attempts: u64,
    /// Attempts whose swap was committed
    pub accepted: u64,
    /// Delta of the most recently accepted swap
    pub last_delta: f64,
}

/// The anytime tile-arrangement optimizer
///
/// Owns the perceptual field, the immutable signature data, and the
/// mutable board. Every public operation leaves the board consistent.
pub struct SeamSolver {
    field: PixelField,
    geometry: TileGeometry,
    signatures: SignatureSet,
    buckets: EdgeBucketIndex,
    board: BoardState,
    tabu: TabuTable,
    cursor: CursorState,
    rng: StdRng,
    config: SolverConfig,
    stats: Stats,
    highlight: (Option<usize>, Option<usize>),
}

impl SeamSolver {
    /// Build a solver over a perceptual field, extracting signatures in one
    /// pass
    ///
    /// # Errors
    ///
    /// Returns an error when the layout holds fewer than 2x2 tiles.
    pub fn new(
        field: PixelField,
        geometry: TileGeometry,
        config: SolverConfig,
        seed: u64,
    ) -> Result<Self> {
        if geometry.cols() < 2 || geometry.rows() < 2 {
            return Err(invalid_source(format!(
                "board of {}x{} tiles is below the 2x2 minimum",
                geometry.cols(),
                geometry.rows()
            )));
        }
        let signatures = SignatureSet::build(&field, geometry);
        Ok(Self::with_signatures(field, geometry, signatures, config, seed))
    }

    /// Build a solver around signatures extracted elsewhere (the shell
    /// interleaves extraction with progress display)
    pub fn with_signatures(
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
        let mut rng = StdRng::seed_from_u64(seed);
        let board = BoardState::shuffled(grid, geometry.tile_count(), config.allow_rotation, &mut rng);
        let tabu = TabuTable::new(geometry.tile_count());
        let buckets = EdgeBucketIndex::build(&signatures);
        let mut solver = Self {
            field,
            geometry,
            signatures,
            buckets,
            board,
            tabu,
            cursor: CursorState::new(),
            rng,
            config,
            stats: Stats::default(),
            highlight: (None, None),
        };
        solver.recompute_all_scores();
        solver
    }

    /// Run one bounded optimization attempt; returns whether a swap was
    /// committed
    pub fn attempt_improve_once(&mut self) -> bool {
        self.stats.attempts += 1;

        let pos_a = self.cursor.select_focus(
            &self.field,
            &self.signatures,
            &mut self.board,
            &self.config,
            &mut self.rng,
        );
        self.highlight = (Some(pos_a), None);

        let Some(proposal) = moves::best_swap(
            &self.field,
            &self.signatures,
            &self.buckets,
            &mut self.board,
            pos_a,
            &self.config,
            &mut self.rng,
        ) else {
            self.cursor.on_fail();
            return false;
        };
        self.highlight = (Some(pos_a), Some(proposal.pos_b));

        if self.accepts(pos_a, &proposal) {
            self.commit(pos_a, proposal);
            true
        } else {
            self.cursor.on_fail();
            false
        }
    }

    /// Acceptance policy: improving moves pass, tabu moves need a strongly
    /// improving override, and a small escape chance admits anything
    fn accepts(&mut self, pos_a: usize, proposal: &SwapProposal) -> bool {
        let window = self.config.tabu_steps;
        let tabu = self
            .board
            .placement(pos_a)
            .tile()
            .is_some_and(|t| self.tabu.is_tabu(t, window))
            || self
                .board
                .placement(proposal.pos_b)
                .tile()
                .is_some_and(|t| self.tabu.is_tabu(t, window));

        if tabu {
            proposal.delta < self.config.tabu_override
                || self.rng.random::<f64>()
                    < self.config.escape_move_chance * ESCAPE_TABU_FACTOR
        } else {
            proposal.delta < 0.0 || self.rng.random::<f64>() < self.config.escape_move_chance
        }
    }

    fn commit(&mut self, pos_a: usize, proposal: SwapProposal) {
        if let Some(tile) = self.board.placement(pos_a).tile() {
            self.tabu.record(tile);
        }
        if let Some(tile) = self.board.placement(proposal.pos_b).tile() {
            self.tabu.record(tile);
        }
        self.tabu.advance();

        self.board.set_placement(pos_a, proposal.new_a);
        self.board.set_placement(proposal.pos_b, proposal.new_b);
        self.refresh_around(pos_a);
        self.refresh_around(proposal.pos_b);

        self.cursor
            .on_accept(&self.board, pos_a, proposal.pos_b, proposal.delta);
        self.stats.accepted += 1;
        self.stats.last_delta = proposal.delta;
    }

    /// Replace the arrangement with a fresh uniform shuffle
    pub fn reshuffle(&mut self) {
        self.board = BoardState::shuffled(
            *self.board.grid(),
            self.geometry.tile_count(),
            self.config.allow_rotation,
            &mut self.rng,
        );
        self.tabu = TabuTable::new(self.geometry.tile_count());
        self.cursor.invalidate();
        self.highlight = (None, None);
        self.recompute_all_scores();
    }

    /// Toggle the vector term; every cached score depends on it
    pub fn set_use_vector(&mut self, use_vector: bool) {
        if self.config.use_vector != use_vector {
            self.config.use_vector = use_vector;
            self.recompute_all_scores();
        }
    }

    /// Toggle horizontal wrap; seams appear or vanish along the side edges
    pub fn set_toroidal_x(&mut self, toroidal: bool) {
        if self.board.grid().toroidal_x() != toroidal {
            self.config.toroidal_x = toroidal;
            self.board.grid_mut().set_toroidal_x(toroidal);
            self.recompute_all_scores();
        }
    }

    /// Toggle vertical wrap; seams appear or vanish along the top and
    /// bottom edges
    pub fn set_toroidal_y(&mut self, toroidal: bool) {
        if self.board.grid().toroidal_y() != toroidal {
            self.config.toroidal_y = toroidal;
            self.board.grid_mut().set_toroidal_y(toroidal);
            self.recompute_all_scores();
        }
    }

    /// Toggle rotation moves; existing rotations stay as they are
    pub fn set_allow_rotation(&mut self, allow: bool) {
        if self.config.allow_rotation != allow {
            self.config.allow_rotation = allow;
            self.recompute_all_scores();
        }
    }

    /// Current arrangement
    pub const fn board(&self) -> &BoardState {
        &self.board
    }

    /// Tile layout of the source image
    pub const fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Active configuration
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Focus and partner positions of the most recent attempt, accepted or
    /// not; the partner is absent when no candidate produced a proposal
    pub const fn highlights(&self) -> (Option<usize>, Option<usize>) {
        self.highlight
    }

    /// Session counters
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Take the counters for one reporting interval, resetting them
    ///
    /// The last accepted delta is preserved across intervals.
    pub const fn drain_stats(&mut self) -> Stats {
        let drained = self.stats;
        self.stats.attempts = 0;
        self.stats.accepted = 0;
        drained
    }

    /// Delta of the most recently accepted swap
    pub const fn last_delta(&self) -> f64 {
        self.stats.last_delta
    }

    /// Sum of live local scores over the whole board
    pub fn total_score(&self) -> f64 {
        let weights = ScoreWeights::from_config(&self.config);
        (0..self.board.len())
            .map(|pos| scoring::local_score(&self.field, &self.signatures, &self.board, pos, weights))
            .sum()
    }

    fn recompute_all_scores(&mut self) {
        self.board.clear_frontier();
        let weights = ScoreWeights::from_config(&self.config);
        for pos in 0..self.board.len() {
            let score =
                scoring::local_score(&self.field, &self.signatures, &self.board, pos, weights);
            self.board.store_score(pos, score);
        }
    }

    /// Recompute cached scores at a position and its neighbors
    fn refresh_around(&mut self, pos: usize) {
        let weights = ScoreWeights::from_config(&self.config);
        let neighbors = self.board.grid().neighbors(pos);
        for target in [Some(pos)].into_iter().chain(neighbors).flatten() {
            let score =
                scoring::local_score(&self.field, &self.signatures, &self.board, target, weights);
            self.board.store_score(target, score);
        }
    }
}
