//! Reconstructed heap model
//!
//! This module provides the heap-side view of a trace:
//! - [`replay`]: folds the event log into one [`HeapState`] per event
//! - [`metrics`]: utilization, fragmentation and free-size buckets
//!
//! # Invariants
//!
//! Within a single [`HeapState`], blocks are sorted by offset and never share
//! a byte. Gaps between blocks are allowed: they are bytes the log has not
//! described yet.

pub mod metrics;
pub mod replay;

use crate::trace::Event;
use serde::{Deserialize, Serialize};

/// A contiguous byte range with uniform allocation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub offset: u64,
    pub size: u64,
    pub allocated: bool,
}

impl Block {
    pub fn allocated(offset: u64, size: u64) -> Self {
        Block {
            offset,
            size,
            allocated: true,
        }
    }

    pub fn free(offset: u64, size: u64) -> Self {
        Block {
            offset,
            size,
            allocated: false,
        }
    }

    /// One past the last byte of the block (saturating)
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }

    /// Check whether two blocks share at least one byte
    pub fn overlaps(&self, other: &Block) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }

    pub fn status(&self) -> &'static str {
        if self.allocated {
            "Allocated"
        } else {
            "Free"
        }
    }
}

/// The complete block set after one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapState {
    /// Blocks sorted by offset
    pub blocks: Vec<Block>,
    pub heap_size: u64,
    /// The event that produced this state
    pub event: Event,
}

impl HeapState {
    /// Byte extent to lay out: the recorded heap size, or the end of the last
    /// block when the log never reported one
    pub fn extent(&self) -> u64 {
        if self.heap_size > 0 {
            self.heap_size
        } else {
            self.blocks.last().map_or(0, Block::end)
        }
    }
}

/// Format a byte count for display (`512 B`, `1.5 KB`, `2.0 MB`)
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
