//! Command-line configuration

use crate::playback::stride_for_speed;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Replay allocator event traces and browse the reconstructed heap
#[derive(Debug, Clone, Parser)]
#[command(name = "heapreel", version, about)]
pub struct Cli {
    /// Trace files to load; `n`/`p` switch between them
    #[arg(required = true)]
    pub traces: Vec<PathBuf>,

    /// Playback speed; each tick advances max(1, speed / 5) events
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub speed: u32,

    /// Milliseconds between playback ticks
    #[arg(long, default_value_t = 50)]
    pub tick_ms: u64,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter used when HEAPREEL_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print final-state metrics for each trace and exit
    #[arg(long)]
    pub summary: bool,
}

/// Playback settings handed to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub speed: u32,
    pub tick_interval: Duration,
}

impl PlaybackConfig {
    pub fn stride(&self) -> usize {
        stride_for_speed(self.speed)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            speed: 10,
            tick_interval: Duration::from_millis(50),
        }
    }
}

impl From<&Cli> for PlaybackConfig {
    fn from(cli: &Cli) -> Self {
        PlaybackConfig {
            speed: cli.speed,
            tick_interval: Duration::from_millis(cli.tick_ms.max(1)),
        }
    }
}
