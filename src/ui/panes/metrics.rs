//! Metrics and free-list bucket pane

use crate::heap::format_size;
use crate::heap::metrics::{Metrics, BUCKET_COUNT, BUCKET_LABELS};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LABEL_WIDTH: usize = 7;

/// Render metrics (top) and the bucket histogram (bottom)
pub fn render_metrics_pane(
    frame: &mut Frame,
    area: Rect,
    metrics: &Metrics,
    buckets: &[u64; BUCKET_COUNT],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    let label = Style::default().fg(DEFAULT_THEME.comment);
    let value = Style::default().fg(DEFAULT_THEME.fg);
    let row = |name: &'static str, text: String| {
        Line::from(vec![
            Span::styled(format!("{:<14}", name), label),
            Span::styled(text, value),
        ])
    };

    let lines = vec![
        row("Heap size", format_size(metrics.heap_size)),
        row("Allocated", format_size(metrics.total_alloc)),
        row("Free", format_size(metrics.total_free)),
        row("Utilization", format!("{:.1}%", metrics.util * 100.0)),
        row("Fragmentation", format!("{:.1}%", metrics.frag * 100.0)),
        row("Largest free", format_size(metrics.largest_free)),
        row("Free blocks", metrics.free_count.to_string()),
        row("Alloc blocks", metrics.alloc_count.to_string()),
    ];

    let block = Block::default()
        .title(" Metrics ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    render_buckets(frame, chunks[1], buckets);
}

fn render_buckets(frame: &mut Frame, area: Rect, buckets: &[u64; BUCKET_COUNT]) {
    let block = Block::default()
        .title(" Free buckets ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    if buckets.iter().all(|&count| count == 0) {
        let paragraph = Paragraph::new("(no free blocks)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = buckets
        .iter()
        .zip(BUCKET_LABELS)
        .map(|(&count, label)| bucket_line(label, count, buckets, inner_width))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn bucket_line(
    label: &'static str,
    count: u64,
    buckets: &[u64; BUCKET_COUNT],
    inner_width: usize,
) -> Line<'static> {
    let max = buckets.iter().copied().max().unwrap_or(0).max(1);
    let count_text = count.to_string();
    // label, space, bar, space, count
    let bar_space = inner_width.saturating_sub(LABEL_WIDTH + 2 + count_text.len());
    let filled = ((count as f64 / max as f64) * bar_space as f64).round() as usize;

    Line::from(vec![
        Span::styled(
            format!("{:>width$} ", label, width = LABEL_WIDTH),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            "█".repeat(filled),
            Style::default().fg(DEFAULT_THEME.bucket_bar),
        ),
        Span::styled(
            "·".repeat(bar_space - filled),
            Style::default().fg(DEFAULT_THEME.current_line_bg),
        ),
        Span::styled(format!(" {}", count_text), Style::default().fg(DEFAULT_THEME.fg)),
    ])
}
