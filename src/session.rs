//! A loaded trace together with everything derived from it
//!
//! [`Session`] owns the trace document, the cached heap states, the trace op
//! index and the playback position. Loading a new trace replaces all of them
//! at once; a failed load changes nothing.

use crate::errors::Result;
use crate::heap::metrics::{bucket_histogram, compute_metrics, Metrics, BUCKET_COUNT};
use crate::heap::replay::build_heap_states;
use crate::heap::HeapState;
use crate::layout::{Layout, LayoutConfig, Viewport};
use crate::playback::{Mode, Playback};
use crate::trace::{Event, TraceDocument, TraceOp};
use rustc_hash::FxHashMap;
use std::path::Path;
use tracing::info;

/// Everything the UI needs to draw the current position
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub position: usize,
    pub total: usize,
    pub mode: Mode,
    pub state: Option<&'a HeapState>,
    pub metrics: Metrics,
    pub buckets: [u64; BUCKET_COUNT],
    /// Trace op the current event came from
    pub highlighted_op: Option<usize>,
    /// e.g. `alloc(3, 64) #12`
    pub source_label: Option<String>,
}

impl View<'_> {
    pub fn event(&self) -> Option<&Event> {
        self.state.map(|s| &s.event)
    }
}

pub struct Session {
    name: String,
    trace: TraceDocument,
    states: Vec<HeapState>,
    op_events: FxHashMap<usize, Vec<usize>>,
    playback: Playback,
}

impl Session {
    pub fn new(name: impl Into<String>, trace: TraceDocument) -> Self {
        let name = name.into();
        let states = build_heap_states(&trace.events);
        let op_events = index_trace_ops(&trace.events);
        info!(
            trace = %name,
            states = states.len(),
            indexed_ops = op_events.len(),
            "built heap states"
        );
        let playback = Playback::new(states.len());
        Session {
            name,
            trace,
            states,
            op_events,
            playback,
        }
    }

    /// Open a trace file
    pub fn open(path: &Path) -> Result<Self> {
        let trace = TraceDocument::from_path(path)?;
        Ok(Self::new(path.display().to_string(), trace))
    }

    /// Replace the loaded trace. On error the current trace stays loaded and
    /// the error is handed back.
    pub fn reload(&mut self, name: impl Into<String>, loaded: Result<TraceDocument>) -> Result<()> {
        let trace = loaded?;
        let stride = self.playback.stride();
        *self = Session::new(name, trace);
        self.playback.set_stride(stride);
        Ok(())
    }

    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        self.reload(path.display().to_string(), TraceDocument::from_path(path))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trace(&self) -> &TraceDocument {
        &self.trace
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn heap_state(&self, index: usize) -> Option<&HeapState> {
        self.states.get(index)
    }

    /// Metrics for a state; all zero when the state does not exist
    pub fn metrics(&self, index: usize) -> Metrics {
        self.heap_state(index)
            .map(compute_metrics)
            .unwrap_or_default()
    }

    pub fn layout(&self, index: usize, viewport: Viewport, config: &LayoutConfig) -> Option<Layout> {
        self.heap_state(index)
            .map(|state| Layout::compute(state, viewport, config))
    }

    /// Free-block counts per size bucket. At the final state the allocator's
    /// first snapshot is used when the trace has one; the recorder writes it
    /// once the workload has finished.
    pub fn bucket_histogram(&self, index: usize) -> [u64; BUCKET_COUNT] {
        let Some(state) = self.heap_state(index) else {
            return [0; BUCKET_COUNT];
        };
        if index == self.playback.last_index() {
            if let Some(snapshot) = self.trace.snapshots.first() {
                return snapshot.free_lists;
            }
        }
        bucket_histogram(&state.blocks)
    }

    /// Indices of the events produced by trace op `op`, ascending
    pub fn event_indices_for_trace_op(&self, op: usize) -> &[usize] {
        self.op_events.get(&op).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn trace_op(&self, op: usize) -> Option<&TraceOp> {
        self.trace.trace_op(op)
    }

    pub fn trace_ops(&self) -> &[TraceOp] {
        &self.trace.trace_ops
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn position(&self) -> usize {
        self.playback.position()
    }

    pub fn seek(&mut self, index: i64) {
        self.playback.seek(index);
    }

    pub fn step(&mut self, delta: i64) {
        self.playback.step(delta);
    }

    pub fn seek_end(&mut self) {
        self.playback.seek(self.playback.last_index() as i64);
    }

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle_play(&mut self) {
        self.playback.toggle();
    }

    pub fn tick(&mut self) -> bool {
        self.playback.tick()
    }

    pub fn set_stride(&mut self, stride: usize) {
        self.playback.set_stride(stride);
    }

    /// Jump to the first event of a trace op. Returns false if the op
    /// produced no events.
    pub fn seek_trace_op(&mut self, op: usize) -> bool {
        match self.event_indices_for_trace_op(op).first() {
            Some(&first) => {
                self.playback.seek(first as i64);
                true
            }
            None => false,
        }
    }

    /// Jump to the state under a timeline click
    pub fn seek_timeline(&mut self, fraction: f64) {
        let index = self.playback.timeline_index(fraction);
        self.playback.seek(index as i64);
    }

    /// Source description for an event, e.g. `alloc(3, 64) #12`
    pub fn source_label(&self, event: &Event) -> Option<String> {
        let op = event.trace_op_index()?;
        let trace_op = self.trace_op(op)?;
        Some(format!("{} #{}", trace_op, op))
    }

    /// Render pass for the current position
    pub fn view(&self) -> View<'_> {
        let position = self.playback.position();
        let state = self.heap_state(position);
        let highlighted_op = state.and_then(|s| s.event.trace_op_index());
        let source_label = state.and_then(|s| self.source_label(&s.event));
        View {
            position,
            total: self.states.len(),
            mode: self.playback.mode(),
            state,
            metrics: self.metrics(position),
            buckets: self.bucket_histogram(position),
            highlighted_op,
            source_label,
        }
    }
}

/// Invert the event → trace op attribution
fn index_trace_ops(events: &[Event]) -> FxHashMap<usize, Vec<usize>> {
    let mut index: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for (i, evt) in events.iter().enumerate() {
        if let Some(op) = evt.trace_op_index() {
            index.entry(op).or_default().push(i);
        }
    }
    index
}
