//! Screen layout and rendering.

use super::app::App;
use super::widgets::{header::Header, status::StatusBar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Regions of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub editor: Rect,
    pub status: Rect,
}

/// Splits `area` into a header line, the editor and a status line.
pub fn layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    ScreenLayout {
        header: chunks[0],
        editor: chunks[1],
        status: chunks[2],
    }
}

/// Renders the whole screen.
pub fn render(frame: &mut Frame, app: &mut App) {
    let areas = layout(frame.area());

    frame.render_widget(Header::new(app.mode(), app.theme()), areas.header);

    if let Some(editor) = app.editor.instance_mut() {
        editor.render(areas.editor, frame.buffer_mut());
        if let Some(position) = editor.cursor_screen_position() {
            frame.set_cursor_position(position);
        }
    }

    let status = app.status_line();
    frame.render_widget(StatusBar::new(&status, app.status.is_some()), areas.status);
}
