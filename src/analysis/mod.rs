//! One-time preprocessing of source images for the optimizer
//!
//! Runs once per loaded image: pixel conversion into a perceptual field,
//! per-tile edge/ray signature extraction, and the quantized edge bucket
//! index used for candidate retrieval.

/// Quantized edge-color bucket index for candidate lookup
pub mod buckets;
/// Perceptual pixel field extraction from source images
pub mod field;
/// Per-tile edge and ray signature extraction
pub mod signatures;

pub use buckets::EdgeBucketIndex;
pub use field::PixelField;
pub use signatures::{SignatureSet, TileOrientation};
