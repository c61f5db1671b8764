//! Heap grid pane
//!
//! Paints the segments produced by [`Layout`] into the terminal buffer, one
//! character cell per layout unit. Allocated blocks are green, free blocks
//! red; the block touched by the current event is hatched in orange.

use crate::heap::HeapState;
use crate::layout::{Layout, LayoutConfig, Segment, Viewport};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Inner drawing area of the heap pane for a given outer area
pub fn heap_grid_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Lay out `state` for the cells of `inner`
pub fn layout_for_area(state: &HeapState, inner: Rect) -> Layout {
    Layout::compute(
        state,
        Viewport::new(inner.width as f64, inner.height as f64),
        &LayoutConfig::terminal(),
    )
}

/// Render the heap pane
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    state: Option<&HeapState>,
    layout: Option<&Layout>,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = match layout {
        Some(layout) if !layout.is_empty() => {
            format!(" Heap ({} per row) ", crate::heap::format_size(layout.bytes_per_row))
        }
        _ => " Heap ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let (Some(state), Some(layout)) = (state, layout) else {
        let paragraph = Paragraph::new("(no events)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    if layout.is_empty() {
        let paragraph = Paragraph::new("(no blocks yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let highlight_offset = state.event.offset;
    let buf = frame.buffer_mut();
    for segment in &layout.segments {
        paint_segment(buf, inner, segment, segment.block.offset == highlight_offset);
    }
}

/// Cell columns `[start, end)` covered by a segment, at least one wide
fn segment_columns(segment: &Segment, inner: Rect) -> (u16, u16) {
    let start = segment.rect.x.round().max(0.0) as u16;
    let end = (segment.rect.right().round() as u16).max(start + 1);
    (start.min(inner.width), end.min(inner.width))
}

fn paint_segment(buf: &mut Buffer, inner: Rect, segment: &Segment, highlighted: bool) {
    let row = segment.rect.y as u16;
    if row >= inner.height {
        return;
    }
    let (start, end) = segment_columns(segment, inner);
    if start >= end {
        return;
    }

    let fill = if segment.block.allocated {
        DEFAULT_THEME.allocated
    } else {
        DEFAULT_THEME.free
    };
    let y = inner.y + row;

    for col in start..end {
        let Some(cell) = buf.cell_mut((inner.x + col, y)) else {
            continue;
        };
        cell.set_bg(fill);
        if highlighted {
            cell.set_char('░').set_fg(DEFAULT_THEME.highlight);
        } else if col == start && segment.bytes.start == segment.block.offset {
            // Visible seam between neighbouring blocks of the same status
            cell.set_char('▏').set_fg(DEFAULT_THEME.bg);
        } else {
            cell.set_char(' ');
        }
    }

    if let Some(label) = &segment.label {
        let width = (end - start) as usize;
        let len = label.chars().count();
        if len <= width {
            let x = inner.x + start + ((width - len) / 2) as u16;
            buf.set_string(
                x,
                y,
                label,
                Style::default()
                    .fg(ratatui::style::Color::White)
                    .bg(fill)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}
