//! Event timeline strip
//!
//! One cell per column; each column shows the kind of the first event that
//! falls into it. The current position is drawn as a white bar.

use crate::trace::Event;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Inner strip of the timeline pane
pub fn timeline_strip(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Fraction of the timeline under a mouse column, if the column is on it
pub fn click_fraction(strip: Rect, column: u16) -> Option<f64> {
    if strip.width == 0 || column < strip.x || column >= strip.x + strip.width {
        return None;
    }
    Some((column - strip.x) as f64 / strip.width as f64)
}

/// Column of the strip that shows event `index`
fn column_for(index: usize, total: usize, width: u16) -> u16 {
    if total == 0 {
        return 0;
    }
    ((index as f64 / total as f64) * width as f64).floor() as u16
}

pub fn render_timeline_pane(frame: &mut Frame, area: Rect, events: &[Event], current: usize) {
    let block = Block::default()
        .title(" Timeline ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let strip = block.inner(area);
    frame.render_widget(block, area);

    if events.is_empty() || strip.width == 0 || strip.height == 0 {
        return;
    }

    let width = strip.width;
    let buf = frame.buffer_mut();
    for col in 0..width {
        let first = (col as f64 / width as f64 * events.len() as f64).floor() as usize;
        let Some(event) = events.get(first) else {
            continue;
        };
        if let Some(cell) = buf.cell_mut((strip.x + col, strip.y)) {
            cell.set_char('•')
                .set_fg(DEFAULT_THEME.event_color(event.kind));
        }
    }

    let marker = column_for(current, events.len(), width).min(width - 1);
    if let Some(cell) = buf.cell_mut((strip.x + marker, strip.y)) {
        cell.set_char('┃').set_fg(Color::White);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_fraction() {
        let strip = Rect::new(1, 1, 10, 1);
        assert_eq!(click_fraction(strip, 0), None);
        assert_eq!(click_fraction(strip, 1), Some(0.0));
        assert_eq!(click_fraction(strip, 6), Some(0.5));
        assert_eq!(click_fraction(strip, 11), None);
    }
}
