//! Anytime local-search optimizer that rearranges a fixed set of square image
//! tiles on a grid so that adjacent tile edges visually match
//!
//! The system extracts per-edge color and ray signatures from source tiles,
//! indexes them by quantized edge color, and then improves a shuffled board
//! one bounded attempt at a time using seam-only delta evaluation, tabu
//! bookkeeping, and a stochastic cursor that steers attention toward badly
//! matched regions. An alternative growth constructor builds the board
//! outward from a seed tile instead.

#![forbid(unsafe_code)]

/// Core optimizer implementation including scoring, move generation, tabu
/// acceptance, the cursor controller, and the growth constructor
pub mod algorithm;
/// One-time preprocessing of source images into signatures and bucket indices
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Mathematical utilities for perceptual color conversion
pub mod math;
/// Grid geometry and tile layout utilities
pub mod spatial;

pub use io::error::{Result, SolverError};
