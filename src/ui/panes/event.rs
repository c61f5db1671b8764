//! Current event details and the trace op list

use crate::heap::format_size;
use crate::heap::Block as HeapBlock;
use crate::trace::{Event, TraceOp, TraceOpKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the event detail box. `hovered` is the block under the mouse.
pub fn render_event_pane(
    frame: &mut Frame,
    area: Rect,
    event: Option<&Event>,
    source_label: Option<&str>,
    hovered: Option<&HeapBlock>,
) {
    let block = Block::default()
        .title(" Event ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let Some(event) = event else {
        let paragraph = Paragraph::new("(empty trace)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let label = Style::default().fg(DEFAULT_THEME.comment);
    let field = |name: &'static str, value: Span<'static>| {
        Line::from(vec![Span::styled(format!("{:<9}", name), label), value])
    };

    let mut lines = vec![
        field(
            "Type",
            Span::styled(
                event.kind.as_str(),
                Style::default()
                    .fg(DEFAULT_THEME.event_color(event.kind))
                    .add_modifier(Modifier::BOLD),
            ),
        ),
        field("Offset", Span::raw(format!("0x{:x}", event.offset))),
        field("Size", Span::raw(format_size(event.size))),
        field(
            "Request",
            Span::raw(event.request_size.map_or_else(|| "—".to_string(), format_size)),
        ),
        field(
            "Source",
            Span::styled(
                source_label.unwrap_or("—").to_string(),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
        ),
    ];

    if let Some(hovered) = hovered {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Hover    ", label),
            Span::raw(format!(
                "0x{:x} {} {}",
                hovered.offset,
                format_size(hovered.size),
                hovered.status()
            )),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the trace op list, keeping `selected` in view
pub fn render_trace_ops_pane(
    frame: &mut Frame,
    area: Rect,
    ops: &[TraceOp],
    highlighted: Option<usize>,
    selected: usize,
    is_focused: bool,
    scroll: &mut OpsScroll,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = if ops.is_empty() {
        " Trace ops ".to_string()
    } else {
        format!(" Trace ops ({} ops) ", ops.len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if ops.is_empty() {
        let paragraph = Paragraph::new("(no trace operations)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let anchor = if is_focused { Some(selected) } else { highlighted };
    scroll.follow(anchor, visible_height, ops.len());

    let idx_width = ops.len().to_string().len();
    let items: Vec<ListItem> = ops
        .iter()
        .enumerate()
        .skip(scroll.offset)
        .take(visible_height)
        .map(|(i, op)| {
            let mut style = Style::default();
            if Some(i) == highlighted {
                style = style.bg(DEFAULT_THEME.current_line_bg);
            }
            if is_focused && i == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", i, width = idx_width),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(op.to_string(), Style::default().fg(op_color(op.kind))),
            ]))
            .style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn op_color(kind: TraceOpKind) -> Color {
    match kind {
        TraceOpKind::Alloc => DEFAULT_THEME.allocated,
        TraceOpKind::Free => DEFAULT_THEME.free,
        TraceOpKind::Realloc => DEFAULT_THEME.primary,
    }
}

/// Scroll position of the trace op list
///
/// The list follows the selected or highlighted op only when that op changes,
/// so manual scrolling sticks until playback or the cursor moves on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpsScroll {
    pub offset: usize,
    anchor: Option<usize>,
}

impl OpsScroll {
    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = self.offset.saturating_add_signed(delta);
    }

    pub(crate) fn follow(&mut self, anchor: Option<usize>, visible: usize, total: usize) {
        if anchor != self.anchor {
            if let Some(index) = anchor {
                self.offset = scroll_to_include(self.offset, index, visible, total);
            }
            self.anchor = anchor;
        }
        self.offset = self.offset.min(total.saturating_sub(visible));
    }
}

/// Smallest scroll change that keeps `index` inside the visible window
pub(crate) fn scroll_to_include(scroll: usize, index: usize, visible: usize, total: usize) -> usize {
    let max_scroll = total.saturating_sub(visible);
    let scroll = if index < scroll {
        index
    } else if index >= scroll + visible {
        index + 1 - visible
    } else {
        scroll
    };
    scroll.min(max_scroll)
}

#[cfg(test)]
mod tests {
    use super::{scroll_to_include, OpsScroll};

    #[test]
    fn test_scroll_to_include() {
        assert_eq!(scroll_to_include(0, 3, 10, 100), 0);
        assert_eq!(scroll_to_include(0, 12, 10, 100), 3);
        assert_eq!(scroll_to_include(20, 5, 10, 100), 5);
        assert_eq!(scroll_to_include(0, 99, 10, 100), 90);
        assert_eq!(scroll_to_include(50, 2, 10, 5), 0);
    }

    #[test]
    fn test_manual_scroll_sticks_until_anchor_moves() {
        let mut scroll = OpsScroll::default();
        scroll.follow(Some(40), 10, 100);
        assert_eq!(scroll.offset, 31);

        scroll.scroll_by(-5);
        scroll.follow(Some(40), 10, 100);
        assert_eq!(scroll.offset, 26);

        scroll.follow(Some(41), 10, 100);
        assert_eq!(scroll.offset, 32);

        scroll.scroll_by(500);
        scroll.follow(Some(41), 10, 100);
        assert_eq!(scroll.offset, 90);
    }
}
