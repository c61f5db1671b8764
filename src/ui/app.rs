//! Main TUI application state and logic

use crate::config::PlaybackConfig;
use crate::heap::Block as HeapBlock;
use crate::layout::Layout as HeapLayout;
use crate::playback::{stride_for_speed, Ticker};
use crate::session::Session;
use crossterm::event::{
    self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::panes::{self, heap, timeline, OpsScroll, StatusRenderData};

const IDLE_POLL: Duration = Duration::from_millis(100);
const SPEED_STEP: u32 = 5;
const MAX_SPEED: u32 = 100;

/// Which pane receives the arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Heap,
    TraceOps,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Heap => FocusedPane::TraceOps,
            FocusedPane::TraceOps => FocusedPane::Heap,
        }
    }
}

/// Screen areas from the last render, used to route mouse events
#[derive(Debug, Clone, Copy, Default)]
struct HitAreas {
    heap_grid: Rect,
    timeline: Rect,
    trace_ops: Rect,
}

/// The main application state
pub struct App {
    /// The loaded trace and its playback position
    pub session: Session,

    /// Trace files that `n`/`p` cycle through
    pub traces: Vec<PathBuf>,
    pub current_trace: usize,

    pub focused_pane: FocusedPane,

    /// Trace op list cursor and scroll offset
    pub ops_selected: usize,
    pub ops_scroll: OpsScroll,

    pub speed: u32,
    ticker: Ticker,

    /// Last known mouse cell, for hover details
    mouse: Option<(u16, u16)>,
    areas: HitAreas,
    last_layout: Option<HeapLayout>,

    pub should_quit: bool,
    pub status_message: String,
}

impl App {
    pub fn new(
        mut session: Session,
        traces: Vec<PathBuf>,
        current_trace: usize,
        config: PlaybackConfig,
    ) -> Self {
        session.set_stride(config.stride());
        App {
            session,
            traces,
            current_trace,
            focused_pane: FocusedPane::Heap,
            ops_selected: 0,
            ops_scroll: OpsScroll::default(),
            speed: config.speed,
            ticker: Ticker::new(config.tick_interval),
            mouse: None,
            areas: HitAreas::default(),
            last_layout: None,
            should_quit: false,
            status_message: String::from("Ready!"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // The next tick is armed only after the frame above is drawn
            let now = Instant::now();
            if self.session.playback().is_playing() {
                if !self.ticker.is_armed() {
                    self.ticker.arm(now);
                }
            } else {
                self.ticker.cancel();
            }

            let timeout = self.ticker.remaining(now).unwrap_or(IDLE_POLL).min(IDLE_POLL);
            if event::poll(timeout)? {
                match event::read()? {
                    TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key)
                    }
                    TermEvent::Mouse(mouse) => self.handle_mouse_event(mouse),
                    // Resize only needs a redraw, which the loop does anyway
                    _ => {}
                }
            }

            if self.ticker.fire(Instant::now()) {
                self.session.tick();
                if !self.session.playback().is_playing() {
                    self.status_message = "Playback complete".to_string();
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9),
                Constraint::Length(25),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        let view = self.session.view();

        let grid = heap::heap_grid_area(columns[0]);
        let layout = view.state.map(|state| heap::layout_for_area(state, grid));
        let hovered = match (self.mouse, &layout) {
            (Some(pos), Some(layout)) => hovered_block(layout, grid, pos),
            _ => None,
        };

        panes::render_heap_pane(
            frame,
            columns[0],
            view.state,
            layout.as_ref(),
            self.focused_pane == FocusedPane::Heap,
        );

        panes::render_event_pane(
            frame,
            right_rows[0],
            view.event(),
            view.source_label.as_deref(),
            hovered.as_ref(),
        );

        panes::render_metrics_pane(frame, right_rows[1], &view.metrics, &view.buckets);

        panes::render_trace_ops_pane(
            frame,
            right_rows[2],
            self.session.trace_ops(),
            view.highlighted_op,
            self.ops_selected,
            self.focused_pane == FocusedPane::TraceOps,
            &mut self.ops_scroll,
        );

        panes::render_timeline_pane(
            frame,
            main_chunks[1],
            &self.session.trace().events,
            view.position,
        );

        panes::render_status_bar(
            frame,
            main_chunks[2],
            StatusRenderData {
                message: &self.status_message,
                trace_name: self.session.name(),
                position: view.position,
                total: view.total,
                speed: self.speed,
                is_playing: view.mode == crate::playback::Mode::Playing,
                is_at_start: self.session.playback().is_at_start(),
                is_at_end: self.session.playback().is_at_end(),
            },
        );

        self.areas = HitAreas {
            heap_grid: grid,
            timeline: timeline::timeline_strip(main_chunks[1]),
            trace_ops: right_rows[2],
        };
        self.last_layout = layout;
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.session.pause();
                let n = c.to_digit(10).map_or(1, i64::from);
                let before = self.session.position();
                self.session.step(n);
                self.status_message = format!(
                    "Stepped forward {} event(s)",
                    self.session.position() - before
                );
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.session.pause();
                self.step(-1);
            }
            KeyCode::Right => {
                self.session.pause();
                self.step(1);
            }
            KeyCode::Up if self.focused_pane == FocusedPane::TraceOps => {
                self.ops_selected = self.ops_selected.saturating_sub(1);
            }
            KeyCode::Down if self.focused_pane == FocusedPane::TraceOps => {
                let last = self.session.trace_ops().len().saturating_sub(1);
                self.ops_selected = (self.ops_selected + 1).min(last);
            }
            KeyCode::Enter if self.focused_pane == FocusedPane::TraceOps => {
                self.session.pause();
                self.jump_to_trace_op(self.ops_selected);
            }
            KeyCode::Char(' ') => {
                self.session.toggle_play();
                if self.session.playback().is_playing() {
                    self.ticker.arm_immediately(Instant::now());
                    self.status_message = "Playing...".to_string();
                } else {
                    self.ticker.cancel();
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::End | KeyCode::Enter => {
                self.session.pause();
                self.session.seek_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Home | KeyCode::Backspace => {
                self.session.pause();
                self.session.seek(0);
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.set_speed(self.speed.saturating_add(SPEED_STEP));
            }
            KeyCode::Char('-') => {
                self.set_speed(self.speed.saturating_sub(SPEED_STEP));
            }
            KeyCode::Char('n') => self.switch_trace(1),
            KeyCode::Char('p') => self.switch_trace(-1),
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                self.mouse = Some((col, row));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.areas.timeline, col, row) {
                    if let Some(fraction) = timeline::click_fraction(self.areas.timeline, col) {
                        self.session.pause();
                        self.session.seek_timeline(fraction);
                        self.status_message = "Jumped via timeline".to_string();
                    }
                } else if let Some(op) = self.trace_op_at(col, row) {
                    self.session.pause();
                    self.ops_selected = op;
                    self.jump_to_trace_op(op);
                } else if contains(self.areas.heap_grid, col, row) {
                    self.mouse = Some((col, row));
                    if let Some(block) = self
                        .last_layout
                        .as_ref()
                        .and_then(|layout| hovered_block(layout, self.areas.heap_grid, (col, row)))
                    {
                        self.status_message = format!(
                            "Block 0x{:x}: {} {}",
                            block.offset,
                            crate::heap::format_size(block.size),
                            block.status()
                        );
                    }
                }
            }
            MouseEventKind::ScrollUp if contains(self.areas.trace_ops, col, row) => {
                self.ops_scroll.scroll_by(-1);
            }
            MouseEventKind::ScrollDown if contains(self.areas.trace_ops, col, row) => {
                self.ops_scroll.scroll_by(1);
            }
            _ => {}
        }
    }

    /// Trace op row under a mouse cell
    fn trace_op_at(&self, col: u16, row: u16) -> Option<usize> {
        let area = self.areas.trace_ops;
        let inner_top = area.y + 1;
        let inner_bottom = area.y + area.height.saturating_sub(1);
        if !contains(area, col, row) || row < inner_top || row >= inner_bottom {
            return None;
        }
        let op = self.ops_scroll.offset + (row - inner_top) as usize;
        (op < self.session.trace_ops().len()).then_some(op)
    }

    fn step(&mut self, delta: i64) {
        let before = self.session.position();
        self.session.step(delta);
        self.status_message = if self.session.position() == before {
            if delta < 0 {
                "Already at the first event".to_string()
            } else {
                "Already at the last event".to_string()
            }
        } else if delta < 0 {
            "Stepped backward".to_string()
        } else {
            "Stepped forward".to_string()
        };
    }

    fn jump_to_trace_op(&mut self, op: usize) {
        self.status_message = if self.session.seek_trace_op(op) {
            format!("Jumped to trace op #{}", op)
        } else {
            format!("Trace op #{} produced no events", op)
        };
    }

    fn set_speed(&mut self, speed: u32) {
        self.speed = speed.clamp(1, MAX_SPEED);
        self.session.set_stride(stride_for_speed(self.speed));
        self.status_message = format!(
            "Speed {} ({} event(s) per tick)",
            self.speed,
            self.session.playback().stride()
        );
    }

    /// Load the trace `delta` places away in the trace list
    fn switch_trace(&mut self, delta: isize) {
        if self.traces.len() < 2 {
            self.status_message = "Only one trace loaded".to_string();
            return;
        }
        self.session.pause();
        self.ticker.cancel();

        let next = (self.current_trace as isize + delta).rem_euclid(self.traces.len() as isize)
            as usize;
        let path = self.traces[next].clone();
        match self.session.load_path(&path) {
            Ok(()) => {
                debug!(trace = %path.display(), "switched trace");
                self.current_trace = next;
                self.ops_selected = 0;
                self.ops_scroll = OpsScroll::default();
                self.status_message = format!("Loaded {}", path.display());
            }
            Err(e) => {
                warn!(error = %e, "trace load failed, keeping current trace");
                self.status_message = format!("Failed to load trace: {}", e);
            }
        }
    }
}

fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Block drawn under a terminal cell, probing the cell's centre
fn hovered_block(layout: &HeapLayout, grid: Rect, (col, row): (u16, u16)) -> Option<HeapBlock> {
    if !contains(grid, col, row) {
        return None;
    }
    let x = (col - grid.x) as f64 + 0.5;
    let y = (row - grid.y) as f64 + 0.5;
    layout.hit_test(x, y).copied()
}
