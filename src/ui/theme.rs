use crate::trace::EventKind;
use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub allocated: Color,
    pub free: Color,
    pub highlight: Color, // Block touched by the current event
    pub bucket_bar: Color,
    pub event_malloc: Color,
    pub event_free: Color,
    pub event_coalesce: Color,
    pub event_extend: Color,
    pub event_split: Color,
    pub event_realloc: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    bg: Color::Rgb(13, 17, 23),
    fg: Color::Rgb(201, 209, 217),
    primary: Color::Rgb(56, 139, 253),
    secondary: Color::Rgb(240, 136, 62),
    comment: Color::Rgb(139, 148, 158),
    success: Color::Rgb(63, 185, 80),
    error: Color::Rgb(218, 54, 51),
    border_focused: Color::Rgb(210, 153, 34),
    border_normal: Color::Rgb(72, 79, 88),
    current_line_bg: Color::Rgb(33, 38, 45),
    allocated: Color::Rgb(35, 134, 54),
    free: Color::Rgb(218, 54, 51),
    highlight: Color::Rgb(240, 136, 62),
    bucket_bar: Color::Rgb(63, 185, 80),
    event_malloc: Color::Rgb(35, 134, 54),
    event_free: Color::Rgb(218, 54, 51),
    event_coalesce: Color::Rgb(210, 153, 34),
    event_extend: Color::Rgb(139, 148, 158),
    event_split: Color::Rgb(163, 113, 247),
    event_realloc: Color::Rgb(56, 139, 253),
};

impl Theme {
    pub fn event_color(&self, kind: EventKind) -> Color {
        match kind {
            EventKind::Malloc => self.event_malloc,
            EventKind::Free => self.event_free,
            EventKind::Coalesce => self.event_coalesce,
            EventKind::ExtendHeap => self.event_extend,
            EventKind::Split => self.event_split,
            EventKind::Realloc => self.event_realloc,
            EventKind::Unknown => self.fg,
        }
    }
}
