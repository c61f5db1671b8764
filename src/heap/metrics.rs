//! Heap metrics derived from a reconstructed state

use super::{Block, HeapState};

/// Number of free-size buckets
pub const BUCKET_COUNT: usize = 13;

/// Inclusive upper bounds of every bucket but the last, which is unbounded
pub const BUCKET_BOUNDS: [u64; BUCKET_COUNT - 1] = [
    64,
    128,
    512,
    1024,
    4 * 1024,
    8 * 1024,
    16 * 1024,
    32 * 1024,
    64 * 1024,
    128 * 1024,
    256 * 1024,
    512 * 1024,
];

pub const BUCKET_LABELS: [&str; BUCKET_COUNT] = [
    "≤64", "≤128", "≤512", "≤1K", "≤4K", "≤8K", "≤16K", "≤32K", "≤64K", "≤128K", "≤256K",
    "≤512K", ">512K",
];

/// Summary of one heap state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub total_alloc: u64,
    pub total_free: u64,
    pub largest_free: u64,
    pub free_count: usize,
    pub alloc_count: usize,
    /// Allocated share of tracked bytes, in `[0, 1]`
    pub util: f64,
    /// External fragmentation proxy, in `[0, 1]`. 0 means all free bytes sit
    /// in one block.
    pub frag: f64,
    pub heap_size: u64,
}

/// Compute metrics for a heap state
pub fn compute_metrics(state: &HeapState) -> Metrics {
    let mut metrics = Metrics {
        heap_size: state.heap_size,
        ..Metrics::default()
    };

    for block in &state.blocks {
        if block.allocated {
            metrics.total_alloc = metrics.total_alloc.saturating_add(block.size);
            metrics.alloc_count += 1;
        } else {
            metrics.total_free = metrics.total_free.saturating_add(block.size);
            metrics.free_count += 1;
            metrics.largest_free = metrics.largest_free.max(block.size);
        }
    }

    // Summed as floats so overlapping blocks from a damaged log cannot overflow
    let total = metrics.total_alloc as f64 + metrics.total_free as f64;
    if total > 0.0 {
        metrics.util = metrics.total_alloc as f64 / total;
    }
    if metrics.total_free > 0 {
        metrics.frag = 1.0 - metrics.largest_free as f64 / metrics.total_free as f64;
    }

    metrics
}

/// Bucket a free block of `size` bytes falls into
pub fn bucket_index(size: u64) -> usize {
    BUCKET_BOUNDS
        .iter()
        .position(|&bound| size <= bound)
        .unwrap_or(BUCKET_COUNT - 1)
}

/// Count free blocks per size bucket
pub fn bucket_histogram(blocks: &[Block]) -> [u64; BUCKET_COUNT] {
    let mut buckets = [0; BUCKET_COUNT];
    for block in blocks.iter().filter(|b| !b.allocated) {
        buckets[bucket_index(block.size)] += 1;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_bounds_are_inclusive() {
        assert_eq!(bucket_index(0), 0);
        assert_eq!(bucket_index(64), 0);
        assert_eq!(bucket_index(65), 1);
        assert_eq!(bucket_index(1024), 3);
        assert_eq!(bucket_index(1025), 4);
        assert_eq!(bucket_index(512 * 1024), 11);
        assert_eq!(bucket_index(512 * 1024 + 1), 12);
        assert_eq!(bucket_index(u64::MAX), 12);
    }
}
