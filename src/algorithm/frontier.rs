//! Stamped lazy-invalidation max-heap of high-cost positions
//!
//! Every local-score write pushes a fresh entry carrying the position's
//! current stamp; older entries for the same position are left in place
//! and discarded lazily when popped with a stale stamp. This keeps score
//! updates O(log n) with no decrease-key machinery.

/// One heap entry: a position, the stamp current when it was pushed, and
/// the local score used for ordering
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    pos: usize,
    stamp: u32,
    score: f64,
}

/// Max-heap over local scores with stale-entry discard on pop
#[derive(Clone, Debug, Default)]
pub struct FrontierHeap {
    entries: Vec<FrontierEntry>,
}

impl FrontierHeap {
    /// Create an empty frontier
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, live and stale
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap holds no entries at all
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Push an entry for a position at its current stamp
    pub fn push(&mut self, pos: usize, stamp: u32, score: f64) {
        self.entries.push(FrontierEntry { pos, stamp, score });
        self.sift_up(self.entries.len().saturating_sub(1));
    }

    /// Pop the highest-scoring live entry
    ///
    /// Entries whose stamp no longer matches `stamps` at their position are
    /// stale and silently discarded. Returns `None` once only stale entries
    /// (or none) remain.
    pub fn pop_valid(&mut self, stamps: &[u32]) -> Option<usize> {
        while let Some(entry) = self.pop_root() {
            let current = stamps.get(entry.pos).copied();
            if current == Some(entry.stamp) {
                return Some(entry.pos);
            }
        }
        None
    }

    fn pop_root(&mut self) -> Option<FrontierEntry> {
        let last = self.entries.len().checked_sub(1)?;
        self.entries.swap(0, last);
        let root = self.entries.pop();
        self.sift_down(0);
        root
    }

    fn score_at(&self, index: usize) -> f64 {
        self.entries
            .get(index)
            .map_or(f64::NEG_INFINITY, |e| e.score)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.score_at(index) <= self.score_at(parent) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut largest = index;
            if left < len && self.score_at(left) > self.score_at(largest) {
                largest = left;
            }
            if right < len && self.score_at(right) > self.score_at(largest) {
                largest = right;
            }
            if largest == index {
                break;
            }
            self.entries.swap(index, largest);
            index = largest;
        }
    }
}
