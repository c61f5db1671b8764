//! TUI pane rendering modules
//!
//! - [`heap`]: the heap grid, painted from a [`crate::layout::Layout`]
//! - [`metrics`]: utilization/fragmentation numbers and free-size buckets
//! - [`event`]: current event details and the trace op list
//! - [`timeline`]: event-kind strip with the current position marker
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each pane exports a `render_*` function that draws from borrowed data and
//! keeps no state of its own beyond scroll offsets passed in by the app.

pub mod event;
pub mod heap;
pub mod metrics;
pub mod status;
pub mod timeline;

pub use event::{render_event_pane, render_trace_ops_pane, OpsScroll};
pub use heap::render_heap_pane;
pub use metrics::render_metrics_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use timeline::render_timeline_pane;
