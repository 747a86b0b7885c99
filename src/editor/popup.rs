//! Hint popup state and widget.

use super::buffer::Position;
use super::hint::HintResult;
use super::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Number of rows PageUp/PageDown move the selection by.
const PAGE: usize = 5;

/// State of the hint popup.
#[derive(Debug, Default, Clone)]
pub struct HintPopupState {
    /// Whether the popup is currently visible.
    pub visible: bool,
    /// Candidates being shown.
    pub items: Vec<String>,
    /// Currently selected index.
    pub selected: usize,
    /// Replacement range of the current result.
    pub from: Position,
    pub to: Position,
}

impl HintPopupState {
    /// Shows `result`, or closes the popup when it is empty.
    pub fn open(&mut self, result: HintResult) {
        if result.is_empty() {
            self.close();
            return;
        }
        self.visible = true;
        self.items = result.list;
        self.from = result.from;
        self.to = result.to;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.items.clear();
        self.selected = 0;
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1).min(self.items.len() - 1);
        }
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(PAGE);
    }

    pub fn page_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + PAGE).min(self.items.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    /// Returns the currently selected candidate.
    pub fn selected_item(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }
}

/// Hint popup widget.
pub struct HintPopup<'a> {
    state: &'a HintPopupState,
    theme: &'a Theme,
}

impl<'a> HintPopup<'a> {
    pub fn new(state: &'a HintPopupState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Places the popup under the anchor cell, or above it when there is no
    /// room below, clamped to `bounds`.
    pub fn popup_area(&self, anchor: (u16, u16), bounds: Rect) -> Rect {
        let longest = self
            .state
            .items
            .iter()
            .map(|i| i.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let width = (longest + 4).min(bounds.width).max(1);
        let height = (self.state.items.len() as u16 + 2).min(10).min(bounds.height);

        let (x, y) = anchor;
        let below = y + 1;
        let y = if below + height <= bounds.bottom() {
            below
        } else {
            y.saturating_sub(height).max(bounds.y)
        };
        let x = x.min(bounds.right().saturating_sub(width)).max(bounds.x);

        Rect::new(x, y, width, height)
    }
}

impl Widget for HintPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.popup_border))
            .style(self.theme.base());
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = inner.height as usize;
        let first = self.state.selected.saturating_sub(rows.saturating_sub(1));

        for (row, (idx, item)) in self
            .state
            .items
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .enumerate()
        {
            let style = if idx == self.state.selected {
                self.theme
                    .base()
                    .bg(self.theme.popup_selected)
                    .add_modifier(Modifier::BOLD)
            } else {
                self.theme.base()
            };
            let line_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
            buf.set_style(line_area, style);
            Paragraph::new(Line::from(Span::styled(format!(" {item}"), style)))
                .render(line_area, buf);
        }
    }
}
