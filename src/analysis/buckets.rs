//! Quantized edge bucket index for candidate lookup
//!
//! Groups every (tile, rotation) by the quantized mean color of each edge.
//! At attempt time the optimizer asks "which oriented tiles present an edge
//! colored like this" and gets an O(1) bucket instead of a scan.

use std::collections::HashMap;

use crate::analysis::signatures::{SignatureSet, TileOrientation};
use crate::spatial::grid::Direction;

/// Per-edge-direction hash buckets over quantized edge keys
#[derive(Clone, Debug)]
pub struct EdgeBucketIndex {
    buckets: [HashMap<u32, Vec<TileOrientation>>; 4],
}

impl EdgeBucketIndex {
    /// Index every (tile, rotation, edge) of a signature set
    pub fn build(signatures: &SignatureSet) -> Self {
        let mut buckets: [HashMap<u32, Vec<TileOrientation>>; 4] =
            std::array::from_fn(|_| HashMap::new());
        for tile in 0..signatures.tile_count() {
            for rotation in 0..4u8 {
                for edge in Direction::ALL {
                    if let Some(signature) = signatures.get(tile, rotation, edge)
                        && let Some(map) = buckets.get_mut(edge.index())
                    {
                        map.entry(signature.key())
                            .or_default()
                            .push(TileOrientation { tile, rotation });
                    }
                }
            }
        }
        Self { buckets }
    }

    /// Oriented tiles whose `edge` carries the given key; empty when none do
    pub fn candidates(&self, edge: Direction, key: u32) -> &[TileOrientation] {
        self.buckets
            .get(edge.index())
            .and_then(|map| map.get(&key))
            .map_or(&[], Vec::as_slice)
    }
}
