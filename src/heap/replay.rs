//! Heap state reconstruction
//!
//! The live block map is an ordered arena keyed by block offset. Each event is
//! folded into the arena and the emitted [`HeapState`] receives its own sorted
//! copy, so states produced earlier are never touched by later events.

use super::{Block, HeapState};
use crate::trace::{Event, EventKind};
use std::collections::BTreeMap;
use tracing::debug;

/// Incremental fold over an event log
#[derive(Debug, Clone, Default)]
pub struct Replayer {
    blocks: BTreeMap<u64, Block>,
    heap_size: u64,
    events_applied: usize,
}

impl Replayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the resulting state
    pub fn apply(&mut self, event: &Event) -> HeapState {
        self.heap_size = event.heap_size;

        match event.kind {
            EventKind::Malloc => {
                self.blocks
                    .insert(event.offset, Block::allocated(event.offset, event.size));
            }
            EventKind::Free => match self.blocks.get_mut(&event.offset) {
                Some(block) => block.allocated = false,
                None => {
                    // Free of a block allocated before recording began
                    debug!(
                        index = self.events_applied,
                        offset = event.offset,
                        size = event.size,
                        "free without a tracked block"
                    );
                    self.blocks
                        .insert(event.offset, Block::free(event.offset, event.size));
                }
            },
            EventKind::Coalesce => self.coalesce(event.offset, event.end()),
            EventKind::ExtendHeap | EventKind::Split | EventKind::Realloc => {}
            EventKind::Unknown => {
                debug!(index = self.events_applied, "unrecognized event kind, skipped");
            }
        }

        self.events_applied += 1;
        HeapState {
            blocks: self.blocks.values().copied().collect(),
            heap_size: self.heap_size,
            event: event.clone(),
        }
    }

    /// Retire every block starting in `[start, end)` and replace them with a
    /// single free block covering the range
    fn coalesce(&mut self, start: u64, end: u64) {
        let retired: Vec<u64> = self.blocks.range(start..end).map(|(&off, _)| off).collect();
        for off in &retired {
            self.blocks.remove(off);
        }
        debug!(start, end, retired = retired.len(), "coalesced blocks");
        self.blocks
            .insert(start, Block::free(start, end.saturating_sub(start)));
    }

    /// Blocks currently tracked, sorted by offset
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn heap_size(&self) -> u64 {
        self.heap_size
    }
}

/// Fold an entire event log into one state per event
pub fn build_heap_states(events: &[Event]) -> Vec<HeapState> {
    let mut replayer = Replayer::new();
    events.iter().map(|evt| replayer.apply(evt)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_with_empty_range_still_inserts() {
        let mut replayer = Replayer::new();
        let state = replayer.apply(&Event::new(EventKind::Coalesce, 64, 32));
        assert_eq!(state.blocks, vec![Block::free(64, 32)]);
    }

    #[test]
    fn test_split_and_extend_leave_blocks_alone() {
        let mut replayer = Replayer::new();
        replayer.apply(&Event::new(EventKind::Malloc, 0, 32).with_heap_size(64));
        let split = replayer.apply(&Event::new(EventKind::Split, 0, 16).with_heap_size(64));
        let extend =
            replayer.apply(&Event::new(EventKind::ExtendHeap, 64, 4096).with_heap_size(4160));

        assert_eq!(split.blocks, vec![Block::allocated(0, 32)]);
        assert_eq!(extend.blocks, split.blocks);
        assert_eq!(extend.heap_size, 4160);
    }
}
