//! Board placements with cached local scores and the invalidation frontier
//!
//! The board is the only mutable state of the optimizer: one placement per
//! grid position, a cached local score per position, and a stamp counter
//! that invalidates frontier entries when a score is rewritten.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::algorithm::frontier::FrontierHeap;
use crate::io::configuration::PROBE_TRIES;
use crate::spatial::grid::Grid;

/// Contents of one board position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// No tile placed (growth mode only; optimization boards are full)
    Empty,
    /// An oriented tile
    Occupied {
        /// Tile index in source row-major order
        tile: usize,
        /// Quarter turns clockwise, 0..4
        rotation: u8,
    },
}

impl Placement {
    /// Tile index if occupied
    pub const fn tile(self) -> Option<usize> {
        match self {
            Self::Occupied { tile, .. } => Some(tile),
            Self::Empty => None,
        }
    }

    /// Whether the position holds no tile
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Grid placements plus cached per-position local scores
#[derive(Clone, Debug)]
pub struct BoardState {
    grid: Grid,
    placements: Vec<Placement>,
    local_scores: Vec<f64>,
    stamps: Vec<u32>,
    frontier: FrontierHeap,
}

impl BoardState {
    /// Create a fully empty board over the grid
    pub fn empty(grid: Grid) -> Self {
        Self {
            grid,
            placements: vec![Placement::Empty; grid.len()],
            local_scores: vec![0.0; grid.len()],
            stamps: vec![0; grid.len()],
            frontier: FrontierHeap::new(),
        }
    }

    /// Create a board holding a uniformly random permutation of all tiles
    ///
    /// Rotations are uniform over the four quarter turns when rotation is
    /// allowed, otherwise zero. Local scores start unset; callers recompute
    /// them before the first attempt.
    pub fn shuffled<R: Rng>(
        grid: Grid,
        tile_count: usize,
        allow_rotation: bool,
        rng: &mut R,
    ) -> Self {
        let mut tiles: Vec<usize> = (0..tile_count).collect();
        tiles.shuffle(rng);
        let placements = tiles
            .into_iter()
            .map(|tile| Placement::Occupied {
                tile,
                rotation: if allow_rotation {
                    rng.random_range(0..4u8)
                } else {
                    0
                },
            })
            .collect();
        Self {
            grid,
            placements,
            local_scores: vec![0.0; grid.len()],
            stamps: vec![0; grid.len()],
            frontier: FrontierHeap::new(),
        }
    }

    /// Board geometry
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable board geometry, for wrap-flag toggles
    pub const fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Number of positions
    pub const fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether the board has no positions
    pub const fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placement at a position; out-of-range reads as empty
    pub fn placement(&self, pos: usize) -> Placement {
        self.placements.get(pos).copied().unwrap_or(Placement::Empty)
    }

    /// Overwrite the placement at a position
    ///
    /// Cached scores are NOT touched; callers refresh the affected
    /// neighborhood afterwards.
    pub fn set_placement(&mut self, pos: usize, placement: Placement) {
        if let Some(slot) = self.placements.get_mut(pos) {
            *slot = placement;
        }
    }

    /// Cached local score of a position
    pub fn local_score(&self, pos: usize) -> f64 {
        self.local_scores.get(pos).copied().unwrap_or(0.0)
    }

    /// Write a position's local score, bump its stamp, and push a fresh
    /// frontier entry
    pub fn store_score(&mut self, pos: usize, score: f64) {
        if let Some(slot) = self.local_scores.get_mut(pos) {
            *slot = score;
        }
        let Some(stamp) = self.stamps.get_mut(pos) else {
            return;
        };
        *stamp = stamp.wrapping_add(1);
        let stamp = *stamp;
        self.frontier.push(pos, stamp, score);
    }

    /// Pop the live frontier position with the highest cached score
    pub fn pop_frontier(&mut self) -> Option<usize> {
        self.frontier.pop_valid(&self.stamps)
    }

    /// Drop all frontier entries
    pub fn clear_frontier(&mut self) {
        self.frontier.clear();
    }

    /// Position currently holding a tile
    ///
    /// Tries a few random probes first; full boards hold a permutation, so
    /// probes usually hit quickly and the exhaustive scan is the rare path.
    pub fn position_of_tile<R: Rng>(&self, tile: usize, rng: &mut R) -> Option<usize> {
        let len = self.placements.len();
        if len == 0 {
            return None;
        }
        for _ in 0..PROBE_TRIES {
            let pos = rng.random_range(0..len);
            if self.placement(pos).tile() == Some(tile) {
                return Some(pos);
            }
        }
        self.placements
            .iter()
            .position(|p| p.tile() == Some(tile))
    }

    /// Whether the board holds each of `tile_count` tiles exactly once
    pub fn is_full_permutation(&self, tile_count: usize) -> bool {
        if self.placements.len() != tile_count {
            return false;
        }
        let mut seen = vec![false; tile_count];
        for placement in &self.placements {
            match placement.tile().and_then(|t| seen.get_mut(t)) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardState, Placement};
    use crate::spatial::grid::Grid;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn shuffled_board_is_a_permutation() {
        let grid = Grid::new(4, 3, true, true);
        let mut rng = StdRng::seed_from_u64(7);
        let board = BoardState::shuffled(grid, grid.len(), true, &mut rng);
        assert!(board.is_full_permutation(grid.len()));
    }

    #[test]
    fn rotation_disabled_boards_start_unrotated() {
        let grid = Grid::new(3, 3, true, true);
        let mut rng = StdRng::seed_from_u64(11);
        let board = BoardState::shuffled(grid, grid.len(), false, &mut rng);
        for pos in 0..board.len() {
            match board.placement(pos) {
                Placement::Occupied { rotation, .. } => assert_eq!(rotation, 0),
                Placement::Empty => unreachable!("shuffled boards are full"),
            }
        }
    }

    #[test]
    fn score_writes_invalidate_older_frontier_entries() {
        let grid = Grid::new(2, 2, true, true);
        let mut board = BoardState::empty(grid);
        board.store_score(0, 0.9);
        board.store_score(1, 0.5);
        board.store_score(0, 0.1);

        assert_eq!(board.pop_frontier(), Some(1));
        assert_eq!(board.pop_frontier(), Some(0));
        assert_eq!(board.pop_frontier(), None);
    }

    #[test]
    fn tile_lookup_finds_every_tile() {
        let grid = Grid::new(3, 3, true, true);
        let mut rng = StdRng::seed_from_u64(3);
        let board = BoardState::shuffled(grid, grid.len(), true, &mut rng);
        for tile in 0..grid.len() {
            let pos = board.position_of_tile(tile, &mut rng).unwrap();
            assert_eq!(board.placement(pos).tile(), Some(tile));
        }
    }

    #[test]
    fn duplicate_tiles_fail_the_permutation_check() {
        let grid = Grid::new(2, 1, true, true);
        let mut board = BoardState::empty(grid);
        board.set_placement(0, Placement::Occupied { tile: 0, rotation: 0 });
        board.set_placement(1, Placement::Occupied { tile: 0, rotation: 0 });
        assert!(!board.is_full_permutation(2));
    }
}
