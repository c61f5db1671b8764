// Integration tests for heap state reconstruction and metrics

use heapreel::heap::metrics::{bucket_histogram, compute_metrics};
use heapreel::heap::replay::{build_heap_states, Replayer};
use heapreel::heap::{Block, HeapState};
use heapreel::trace::{Event, EventKind, TraceDocument};

fn malloc(offset: u64, size: u64) -> Event {
    Event::new(EventKind::Malloc, offset, size).with_heap_size(4096)
}

fn free(offset: u64, size: u64) -> Event {
    Event::new(EventKind::Free, offset, size).with_heap_size(4096)
}

fn coalesce(offset: u64, size: u64) -> Event {
    Event::new(EventKind::Coalesce, offset, size).with_heap_size(4096)
}

fn fixture() -> TraceDocument {
    let json = include_str!("../traces/coalescing.json");
    TraceDocument::from_json_str("coalescing.json", json).expect("fixture should parse")
}

fn assert_well_formed(state: &HeapState) {
    for pair in state.blocks.windows(2) {
        assert!(
            pair[0].offset < pair[1].offset,
            "blocks not sorted: {:?}",
            state.blocks
        );
        assert!(
            !pair[0].overlaps(&pair[1]),
            "blocks overlap: {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_free_after_two_mallocs() {
    let states = build_heap_states(&[malloc(0, 16), malloc(16, 16), free(0, 16)]);

    assert_eq!(states.len(), 3);
    assert_eq!(
        states[2].blocks,
        vec![Block::free(0, 16), Block::allocated(16, 16)]
    );

    let metrics = compute_metrics(&states[2]);
    assert_eq!(metrics.util, 0.5);
    assert_eq!(metrics.frag, 0.0);
    assert_eq!(metrics.alloc_count, 1);
    assert_eq!(metrics.free_count, 1);
}

#[test]
fn test_coalesce_merges_into_one_block() {
    let states = build_heap_states(&[
        malloc(0, 16),
        malloc(16, 16),
        free(0, 16),
        free(16, 16),
        coalesce(0, 32),
    ]);

    let last = states.last().unwrap();
    assert_eq!(last.blocks, vec![Block::free(0, 32)]);
    assert_eq!(last.event.kind, EventKind::Coalesce);
}

#[test]
fn test_coalesce_retires_only_blocks_starting_in_range() {
    let states = build_heap_states(&[
        malloc(0, 16),
        malloc(16, 16),
        malloc(32, 16),
        free(16, 16),
        coalesce(16, 16),
        malloc(48, 16),
    ]);

    let before = &states[3];
    let after = &states[4];
    let (start, end) = (16, 32);

    let survivors: Vec<_> = after
        .blocks
        .iter()
        .filter(|b| b.offset >= start && b.offset < end)
        .collect();
    assert_eq!(survivors, vec![&Block::free(16, 16)]);

    // Blocks outside the range are untouched
    for block in before.blocks.iter().filter(|b| b.offset < start || b.offset >= end) {
        assert!(after.blocks.contains(block));
    }
}

#[test]
fn test_earlier_states_are_not_affected_by_later_events() {
    let states = build_heap_states(&[malloc(0, 16), free(0, 16), coalesce(0, 64)]);

    assert_eq!(states[0].blocks, vec![Block::allocated(0, 16)]);
    assert_eq!(states[1].blocks, vec![Block::free(0, 16)]);
    assert_eq!(states[2].blocks, vec![Block::free(0, 64)]);
}

#[test]
fn test_free_without_tracked_block_synthesizes_one() {
    let states = build_heap_states(&[free(128, 32), malloc(0, 16)]);

    assert_eq!(states[0].blocks, vec![Block::free(128, 32)]);
    assert_eq!(
        states[1].blocks,
        vec![Block::allocated(0, 16), Block::free(128, 32)]
    );
}

#[test]
fn test_free_keeps_tracked_size() {
    let states = build_heap_states(&[malloc(0, 48), free(0, 32)]);
    assert_eq!(states[1].blocks, vec![Block::free(0, 48)]);
}

#[test]
fn test_malloc_overwrites_block_at_same_offset() {
    let states = build_heap_states(&[malloc(0, 64), free(0, 64), malloc(0, 32)]);
    assert_eq!(states[2].blocks, vec![Block::allocated(0, 32)]);
}

#[test]
fn test_heap_size_follows_each_event() {
    let events = vec![
        Event::new(EventKind::ExtendHeap, 0, 4096).with_heap_size(4096),
        Event::new(EventKind::Malloc, 0, 16).with_heap_size(4096),
        Event::new(EventKind::ExtendHeap, 4096, 4096).with_heap_size(8192),
    ];
    let states = build_heap_states(&events);
    let sizes: Vec<u64> = states.iter().map(|s| s.heap_size).collect();
    assert_eq!(sizes, vec![4096, 4096, 8192]);
    assert_eq!(states[2].blocks, states[1].blocks);
}

#[test]
fn test_replayer_matches_batch_build() {
    let doc = fixture();
    let batch = build_heap_states(&doc.events);

    let mut replayer = Replayer::new();
    for (i, evt) in doc.events.iter().enumerate() {
        assert_eq!(replayer.apply(evt), batch[i]);
    }
    assert_eq!(replayer.heap_size(), 4096);
    assert_eq!(replayer.blocks().count(), batch.last().unwrap().blocks.len());
}

#[test]
fn test_fixture_states_are_well_formed() {
    let doc = fixture();
    let states = build_heap_states(&doc.events);
    assert_eq!(states.len(), doc.events.len());

    for state in &states {
        assert_well_formed(state);

        let metrics = compute_metrics(state);
        let block_bytes: u64 = state.blocks.iter().map(|b| b.size).sum();
        assert_eq!(metrics.total_alloc + metrics.total_free, block_bytes);
        assert!((0.0..=1.0).contains(&metrics.util));
        assert!((0.0..=1.0).contains(&metrics.frag));
        assert_eq!(metrics.heap_size, state.heap_size);
    }

    let last = states.last().unwrap();
    assert_eq!(
        last.blocks,
        vec![Block::free(0, 224), Block::allocated(224, 2048)]
    );
}

#[test]
fn test_metrics_zero_on_empty_and_all_free_heaps() {
    let empty = build_heap_states(&[Event::new(EventKind::ExtendHeap, 0, 4096).with_heap_size(4096)]);
    let metrics = compute_metrics(&empty[0]);
    assert_eq!(metrics.util, 0.0);
    assert_eq!(metrics.frag, 0.0);
    assert_eq!(metrics.total_alloc + metrics.total_free, 0);

    let all_free = build_heap_states(&[free(0, 64)]);
    let metrics = compute_metrics(&all_free[0]);
    assert_eq!(metrics.util, 0.0);
    assert_eq!(metrics.frag, 0.0);
    assert_eq!(metrics.largest_free, 64);
}

#[test]
fn test_fragmentation_of_scattered_free_blocks() {
    let states = build_heap_states(&[
        malloc(0, 100),
        malloc(100, 100),
        malloc(200, 300),
        malloc(500, 100),
        free(0, 100),
        free(200, 300),
    ]);
    let metrics = compute_metrics(states.last().unwrap());

    assert_eq!(metrics.total_free, 400);
    assert_eq!(metrics.largest_free, 300);
    assert!((metrics.frag - 0.25).abs() < 1e-12);
    assert!((metrics.util - 200.0 / 600.0).abs() < 1e-12);
}

#[test]
fn test_bucket_histogram_counts_free_blocks_only() {
    let blocks = vec![
        Block::free(0, 64),
        Block::allocated(64, 64),
        Block::free(128, 100),
        Block::free(228, 4096),
        Block::free(4324, 1 << 20),
    ];
    let buckets = bucket_histogram(&blocks);

    assert_eq!(buckets[0], 1);
    assert_eq!(buckets[1], 1);
    assert_eq!(buckets[4], 1);
    assert_eq!(buckets[12], 1);
    assert_eq!(buckets.iter().sum::<u64>(), 4);
}

#[test]
fn test_metrics_on_oversized_blocks_do_not_overflow() {
    let half = u64::MAX / 2 + 1;
    let states = build_heap_states(&[
        Event::new(EventKind::Malloc, 0, half),
        Event::new(EventKind::Malloc, half, half),
        Event::new(EventKind::Free, 1, half),
    ]);

    let metrics = compute_metrics(&states[1]);
    assert_eq!(metrics.total_alloc, u64::MAX);
    assert_eq!(metrics.alloc_count, 2);
    assert_eq!(metrics.util, 1.0);

    let metrics = compute_metrics(&states[2]);
    assert_eq!(metrics.total_alloc, u64::MAX);
    assert_eq!(metrics.total_free, half);
    assert!(metrics.util > 0.0 && metrics.util < 1.0);
    assert_eq!(metrics.frag, 0.0);
}
