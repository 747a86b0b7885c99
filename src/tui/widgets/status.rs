//! Status bar below the editor.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::Widget,
};

/// One-line status bar. Errors are drawn in red.
pub struct StatusBar<'a> {
    text: &'a str,
    is_error: bool,
}

impl<'a> StatusBar<'a> {
    pub fn new(text: &'a str, is_error: bool) -> Self {
        Self { text, is_error }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = if self.is_error {
            Style::default().bg(Color::Red).fg(Color::White)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), style);
        let span = Span::styled(format!(" {}", self.text), style);
        buf.set_span(area.x, area.y, &span, area.width);
    }
}
