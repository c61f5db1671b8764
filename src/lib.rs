//! # Introduction
//!
//! heapreel replays an allocator event log recorded while an allocator ran a
//! workload trace, and rebuilds the exact block layout of the heap after every
//! event. The reconstructed history is browsed forward and backward through a
//! terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Trace JSON → TraceDocument → Replayer → HeapStates → {Metrics, Layout} → TUI
//! ```
//!
//! 1. [`trace`] — the event log, workload ops and allocator snapshots.
//! 2. [`heap`] — folds events into one [`heap::HeapState`] per event and
//!    derives utilization, fragmentation and free-size buckets.
//! 3. [`layout`] — maps a heap state onto a bounded multi-row grid.
//! 4. [`playback`] — clamped seek/step and the play/pause state machine.
//! 5. [`session`] — one loaded trace plus everything derived from it.
//! 6. [`ui`] — ratatui-based TUI; not part of the stable library API.
//!
//! ## Event kinds
//!
//! `malloc`, `free`, `coalesce`, `extend_heap`, `split`. Only the first three
//! change the block set; the others update the heap size or exist for the
//! timeline.

pub mod config;
pub mod errors;
pub mod heap;
pub mod layout;
pub mod playback;
pub mod session;
pub mod trace;
pub mod ui;
