//! Grid geometry with independently toroidal axes
//!
//! Positions are flat indices in row-major order. Each axis either wraps
//! (toroidal) or is bounded, in which case neighbor lookup across that edge
//! returns `None` and the caller treats the seam as absent.

/// Cardinal direction of an edge or neighbor, in fixed N, E, S, W scan order
///
/// The scan order is load-bearing: ties in worst-edge selection are broken
/// by whichever direction is scanned first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing y
    North,
    /// Toward increasing x
    East,
    /// Toward increasing y
    South,
    /// Toward decreasing x
    West,
}

impl Direction {
    /// All directions in scan order
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Index into per-direction tables
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Direction from a numeric index, wrapping modulo four
    pub const fn from_index(index: usize) -> Self {
        match index & 3 {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    /// The direction facing back across the same seam
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Lateral direction counterclockwise of this one
    pub const fn left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Lateral direction clockwise of this one
    pub const fn right(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Rectangular board geometry with per-axis wrap flags
#[derive(Clone, Copy, Debug)]
pub struct Grid {
    cols: usize,
    rows: usize,
    toroidal_x: bool,
    toroidal_y: bool,
}

impl Grid {
    /// Create a grid with the given dimensions and wrap behavior
    pub const fn new(cols: usize, rows: usize, toroidal_x: bool, toroidal_y: bool) -> Self {
        Self {
            cols,
            rows,
            toroidal_x,
            toroidal_y,
        }
    }

    /// Number of columns
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total position count
    pub const fn len(&self) -> usize {
        self.cols * self.rows
    }

    /// Whether the grid has no positions
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the horizontal axis wraps
    pub const fn toroidal_x(&self) -> bool {
        self.toroidal_x
    }

    /// Whether the vertical axis wraps
    pub const fn toroidal_y(&self) -> bool {
        self.toroidal_y
    }

    /// Change horizontal wrap behavior
    ///
    /// Every cached local score depends on seam presence, so callers must
    /// recompute all local scores after flipping this.
    pub const fn set_toroidal_x(&mut self, toroidal: bool) {
        self.toroidal_x = toroidal;
    }

    /// Change vertical wrap behavior (same recompute obligation as x)
    pub const fn set_toroidal_y(&mut self, toroidal: bool) {
        self.toroidal_y = toroidal;
    }

    /// Flat position of grid coordinates
    pub const fn pos_of(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Grid coordinates of a flat position
    pub const fn xy_of(&self, pos: usize) -> (usize, usize) {
        (pos % self.cols, pos / self.cols)
    }

    /// Neighboring position in the given direction, or `None` at a
    /// non-toroidal boundary
    pub const fn neighbor(&self, pos: usize, direction: Direction) -> Option<usize> {
        let x = pos % self.cols;
        let y = pos / self.cols;
        match direction {
            Direction::North => {
                if y == 0 && !self.toroidal_y {
                    None
                } else {
                    Some(self.pos_of(x, (y + self.rows - 1) % self.rows))
                }
            }
            Direction::South => {
                if y + 1 == self.rows && !self.toroidal_y {
                    None
                } else {
                    Some(self.pos_of(x, (y + 1) % self.rows))
                }
            }
            Direction::West => {
                if x == 0 && !self.toroidal_x {
                    None
                } else {
                    Some(self.pos_of((x + self.cols - 1) % self.cols, y))
                }
            }
            Direction::East => {
                if x + 1 == self.cols && !self.toroidal_x {
                    None
                } else {
                    Some(self.pos_of((x + 1) % self.cols, y))
                }
            }
        }
    }

    /// Neighbors in scan order, `None` where the boundary has no neighbor
    pub const fn neighbors(&self, pos: usize) -> [Option<usize>; 4] {
        [
            self.neighbor(pos, Direction::North),
            self.neighbor(pos, Direction::East),
            self.neighbor(pos, Direction::South),
            self.neighbor(pos, Direction::West),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Grid};

    #[test]
    fn opposite_and_laterals_cycle() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.left().right(), dir);
            assert_eq!(dir.right().opposite(), dir.left());
        }
    }

    #[test]
    fn toroidal_neighbors_wrap() {
        let grid = Grid::new(3, 2, true, true);
        let origin = grid.pos_of(0, 0);
        assert_eq!(grid.neighbor(origin, Direction::West), Some(grid.pos_of(2, 0)));
        assert_eq!(grid.neighbor(origin, Direction::North), Some(grid.pos_of(0, 1)));
    }

    #[test]
    fn bounded_axes_have_no_neighbor_across_the_edge() {
        let grid = Grid::new(3, 2, false, false);
        let origin = grid.pos_of(0, 0);
        assert_eq!(grid.neighbor(origin, Direction::West), None);
        assert_eq!(grid.neighbor(origin, Direction::North), None);
        assert_eq!(grid.neighbor(origin, Direction::East), Some(grid.pos_of(1, 0)));
        let corner = grid.pos_of(2, 1);
        assert_eq!(grid.neighbor(corner, Direction::East), None);
        assert_eq!(grid.neighbor(corner, Direction::South), None);
    }

    #[test]
    fn position_coordinate_round_trip() {
        let grid = Grid::new(5, 4, true, false);
        for pos in 0..grid.len() {
            let (x, y) = grid.xy_of(pos);
            assert_eq!(grid.pos_of(x, y), pos);
        }
    }
}
