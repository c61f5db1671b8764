//! Recorded allocator traces
//!
//! A trace document bundles three read-only lists:
//! - `events`: the ordered allocator event log ([`Event`])
//! - `trace_ops`: the workload calls that produced those events ([`TraceOp`])
//! - `snapshots`: sparse, authoritative full-state captures ([`Snapshot`])

pub mod event;

pub use event::{Event, EventKind, TraceOp, TraceOpKind};

use crate::errors::{LoadError, Result};
use crate::heap::metrics::BUCKET_COUNT;
use crate::heap::Block;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Full state capture recorded by the allocator itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub blocks: Vec<Block>,
    /// Free block counts per size bucket
    pub free_lists: [u64; BUCKET_COUNT],
}

/// A loaded trace document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceDocument {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub trace_ops: Vec<TraceOp>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
}

impl TraceDocument {
    /// Parse a trace document from JSON text. `name` is only used in errors.
    pub fn from_json_str(name: &str, json: &str) -> Result<Self> {
        let doc: TraceDocument = serde_json::from_str(json).map_err(|source| LoadError::Parse {
            name: name.to_string(),
            source,
        })?;
        doc.warn_dangling_ops(name);
        Ok(doc)
    }

    /// Read and parse a trace file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json_str(&path.display().to_string(), &json)?;
        info!(
            path = %path.display(),
            events = doc.events.len(),
            trace_ops = doc.trace_ops.len(),
            snapshots = doc.snapshots.len(),
            "loaded trace"
        );
        Ok(doc)
    }

    /// Get a trace op by position
    pub fn trace_op(&self, index: usize) -> Option<&TraceOp> {
        self.trace_ops.get(index)
    }

    /// Final heap extent of the trace
    pub fn final_heap_size(&self) -> u64 {
        self.events.last().map_or(0, |evt| evt.heap_size)
    }

    fn warn_dangling_ops(&self, name: &str) {
        let dangling = self
            .events
            .iter()
            .filter_map(Event::trace_op_index)
            .filter(|&op| op >= self.trace_ops.len())
            .count();
        if dangling > 0 {
            warn!(
                trace = name,
                dangling,
                trace_ops = self.trace_ops.len(),
                "events reference trace ops missing from the document"
            );
        }
    }
}
