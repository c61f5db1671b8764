// heapreel: allocator trace replay with heap visualization

use std::fs::File;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use heapreel::config::{Cli, PlaybackConfig};
use heapreel::heap::format_size;
use heapreel::session::Session;
use heapreel::ui::App;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if cli.summary {
        return print_summary(&cli);
    }

    let session = Session::open(&cli.traces[0])?;
    eprintln!(
        "Loaded {} ({} events, {} trace ops).",
        session.name(),
        session.len(),
        session.trace_ops().len()
    );

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, cli.traces.clone(), 0, PlaybackConfig::from(&cli));
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Logs go to a file only; the TUI owns stdout and stderr while running
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("HEAPREEL_LOG")
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn print_summary(cli: &Cli) -> Result<()> {
    for path in &cli.traces {
        let session = Session::open(path)?;
        let last = session.len().saturating_sub(1);
        let metrics = session.metrics(last);
        let buckets = session.bucket_histogram(last);
        println!("{}", session.name());
        println!("  events        {}", session.len());
        println!("  trace ops     {}", session.trace_ops().len());
        println!("  heap size     {}", format_size(metrics.heap_size));
        println!("  allocated     {}", format_size(metrics.total_alloc));
        println!("  free          {}", format_size(metrics.total_free));
        println!("  utilization   {:.1}%", metrics.util * 100.0);
        println!("  fragmentation {:.1}%", metrics.frag * 100.0);
        println!("  free buckets  {:?}", buckets);
    }
    Ok(())
}
