//! Error types for loading traces
//!
//! Replay, metrics and layout are total over a loaded trace, so the only
//! fallible step is getting a trace document into memory.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a trace document
#[derive(Debug, Error)]
pub enum LoadError {
    /// The trace file could not be read
    #[error("failed to read trace {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The trace document is not valid JSON or does not match the trace shape
    #[error("malformed trace {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;
