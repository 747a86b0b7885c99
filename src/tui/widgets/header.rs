//! Header bar: application name, SQL mode and theme.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    mode: &'a str,
    theme: &'a str,
}

impl<'a> Header<'a> {
    pub fn new(mode: &'a str, theme: &'a str) -> Self {
        Self { mode, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), style);

        let left = Span::styled(format!(" sqlformula v{}", env!("CARGO_PKG_VERSION")), style);
        buf.set_span(area.x, area.y, &left, area.width);

        let right = format!(" [{} | {}] ", self.mode, self.theme);
        let right_width = right.chars().count() as u16;
        if right_width + left.width() as u16 <= area.width {
            let x = area.right().saturating_sub(right_width);
            buf.set_string(x, area.y, &right, style.remove_modifier(Modifier::BOLD));
        }
    }
}
