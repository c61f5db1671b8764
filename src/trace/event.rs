//! Allocator events and the workload operations that produced them

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of a recorded allocator event
///
/// `Realloc` and unrecognized kinds are carried through replay without
/// touching the block map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Malloc,
    Free,
    Coalesce,
    ExtendHeap,
    Split,
    Realloc,
    #[serde(other)]
    Unknown,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Malloc => "malloc",
            EventKind::Free => "free",
            EventKind::Coalesce => "coalesce",
            EventKind::ExtendHeap => "extend_heap",
            EventKind::Split => "split",
            EventKind::Realloc => "realloc",
            EventKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded allocator action
///
/// The position of an event in the log is its identity; events are never
/// mutated once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub offset: u64,
    pub size: u64,
    #[serde(default)]
    pub heap_size: u64,
    /// User-requested size before rounding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_size: Option<u64>,
    /// Index into the trace op list, or -1 when not attributable
    #[serde(default = "unattributed", deserialize_with = "trace_op_or_unattributed")]
    pub trace_op: i64,
}

fn unattributed() -> i64 {
    -1
}

fn trace_op_or_unattributed<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(-1))
}

impl Event {
    pub fn new(kind: EventKind, offset: u64, size: u64) -> Self {
        Event {
            kind,
            offset,
            size,
            heap_size: 0,
            request_size: None,
            trace_op: -1,
        }
    }

    pub fn with_heap_size(mut self, heap_size: u64) -> Self {
        self.heap_size = heap_size;
        self
    }

    pub fn with_trace_op(mut self, trace_op: i64) -> Self {
        self.trace_op = trace_op;
        self
    }

    /// The trace op this event is attributed to, if any
    pub fn trace_op_index(&self) -> Option<usize> {
        usize::try_from(self.trace_op).ok()
    }

    /// End of the event's byte range (saturating)
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// Kind of a workload-level call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceOpKind {
    #[serde(rename = "alloc", alias = "a")]
    Alloc,
    #[serde(rename = "free", alias = "f")]
    Free,
    #[serde(rename = "realloc", alias = "r")]
    Realloc,
}

/// A single call from the workload trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceOp {
    #[serde(rename = "type")]
    pub kind: TraceOpKind,
    /// Logical object id
    pub index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            TraceOpKind::Alloc => "alloc",
            TraceOpKind::Free => "free",
            TraceOpKind::Realloc => "realloc",
        };
        match self.size {
            Some(size) => write!(f, "{}({}, {})", name, self.index, size),
            None => write!(f, "{}({})", name, self.index),
        }
    }
}
