//! Anytime local-search optimizer over tile arrangements
//!
//! The optimizer runs one bounded `attempt` at a time: pick a focus
//! position, gather candidate partners, evaluate exact seam-cost deltas
//! for swaps, and accept or reject under a tabu-with-escape policy. A
//! separate growth constructor builds boards outward from a seed instead
//! of improving a shuffled start.

/// Board placements with cached local scores and the invalidation frontier
pub mod board;
/// Stochastic focus cursor steering optimizer attention
pub mod cursor;
/// Stamped lazy-invalidation max-heap of high-cost positions
pub mod frontier;
/// Growth-from-seed board constructor
pub mod growth;
/// Candidate generation and exact swap-delta evaluation
pub mod moves;
/// Seam, blob, and local score functions
pub mod scoring;
/// Attempt loop, acceptance policy, and solver context
pub mod solver;

pub use board::{BoardState, Placement};
pub use growth::{GrowthBuilder, GrowthStep};
pub use solver::SeamSolver;
