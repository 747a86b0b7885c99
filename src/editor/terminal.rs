//! Terminal implementation of the editor widget.

use super::buffer::{Position, TextBuffer};
use super::hint::{CursorContext, HintSource};
use super::keymap::{Command, KeyMap};
use super::mode::SqlMode;
use super::popup::{HintPopup, HintPopupState};
use super::sql_hint::SqlHint;
use super::theme::Theme;
use super::{
    ChangeEvent, ChangeOrigin, EditorEvent, EditorFactory, EditorInstance, EditorOptions,
    EventKind, InstanceId, Listener, MountPoint, SubscriptionId,
};
use crate::error::{FormulaError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use tracing::debug;
use unicode_width::UnicodeWidthChar;

/// Builds [`TerminalEditor`] instances.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalFactory;

impl EditorFactory for TerminalFactory {
    type Instance = TerminalEditor;

    fn create(&mut self, mount: &MountPoint, options: EditorOptions) -> Result<TerminalEditor> {
        TerminalEditor::new(mount, options)
    }
}

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    listener: Listener,
}

/// A line laid out for display: characters, their styles, and the display
/// column each character starts at (plus one trailing entry for line end).
struct StyledLine {
    chars: Vec<char>,
    styles: Vec<Style>,
    cols: Vec<usize>,
}

/// SQL editor drawn into a ratatui buffer and driven by crossterm key events.
pub struct TerminalEditor {
    id: InstanceId,
    area: Rect,
    buffer: TextBuffer,
    mode: SqlMode,
    theme: Theme,
    keymap: KeyMap,
    indent_with_tabs: bool,
    indent_unit: usize,
    tab_size: usize,
    smart_indent: bool,
    match_brackets: bool,
    line_wrapping: bool,
    focused: bool,
    complete_single: bool,
    hint_source: Rc<dyn HintSource>,
    popup: HintPopupState,
    subscriptions: Vec<Subscription>,
    live: HashSet<SubscriptionId>,
    next_subscription: u64,
    destroyed: bool,
    scroll_row: usize,
    scroll_col: usize,
    cursor_screen: Option<(u16, u16)>,
}

impl fmt::Debug for TerminalEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalEditor")
            .field("id", &self.id)
            .field("mode", &self.mode.mime())
            .field("theme", &self.theme.name)
            .field("cursor", &self.buffer.cursor())
            .field("listeners", &self.live.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl TerminalEditor {
    /// Validates `options` and builds the editor.
    pub fn new(mount: &MountPoint, options: EditorOptions) -> Result<Self> {
        let mode = SqlMode::from_mime(&options.mode)?;
        let theme = Theme::by_name(&options.theme)?;
        let keymap = KeyMap::from_names(&options.extra_keys)?;
        if options.indent_unit == 0 || options.tab_size == 0 {
            return Err(FormulaError::construction(
                "indent_unit and tab_size must be at least 1",
            ));
        }

        let hint_source = options.hint_options.hint.clone().unwrap_or_else(|| {
            Rc::new(SqlHint::new(options.hint_options.tables.clone(), mode.clone()))
        });

        let id = InstanceId::next();
        debug!(%id, mode = mode.mime(), theme = theme.name, "editor created");

        Ok(Self {
            id,
            area: mount.area,
            buffer: TextBuffer::new(&options.value),
            mode,
            theme,
            keymap,
            indent_with_tabs: options.indent_with_tabs,
            indent_unit: options.indent_unit,
            tab_size: options.tab_size,
            smart_indent: options.smart_indent,
            match_brackets: options.match_brackets,
            line_wrapping: options.line_wrapping,
            focused: options.autofocus,
            complete_single: options.hint_options.complete_single,
            hint_source,
            popup: HintPopupState::default(),
            subscriptions: Vec::new(),
            live: HashSet::new(),
            next_subscription: 0,
            destroyed: false,
            scroll_row: 0,
            scroll_col: 0,
            cursor_screen: None,
        })
    }

    pub fn mode(&self) -> &SqlMode {
        &self.mode
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn hint_state(&self) -> &HintPopupState {
        &self.popup
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Screen cell of the cursor after the last render, if it was visible.
    pub fn cursor_screen_position(&self) -> Option<(u16, u16)> {
        self.cursor_screen
    }

    /// Moves the cursor, firing `cursorActivity` if it moved.
    pub fn set_cursor(&mut self, pos: Position) {
        let moved = self.buffer.set_cursor(pos);
        self.after_move(moved);
    }

    /// Handles a key press. Returns false if the key was not used.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.destroyed || key.kind == KeyEventKind::Release {
            return false;
        }
        self.focused = true;

        if self.popup.visible && self.handle_popup_key(&key) {
            return true;
        }
        if let Some(command) = self.keymap.command_for(&key) {
            self.run_command(command);
            return true;
        }
        self.handle_default_key(key)
    }

    fn handle_popup_key(&mut self, key: &KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Up => self.popup.select_previous(),
            KeyCode::Down => self.popup.select_next(),
            KeyCode::PageUp => self.popup.page_up(),
            KeyCode::PageDown => self.popup.page_down(),
            KeyCode::Home => self.popup.select_first(),
            KeyCode::End => self.popup.select_last(),
            KeyCode::Enter | KeyCode::Tab => self.pick(),
            KeyCode::Esc => self.popup.close(),
            _ => return false,
        }
        true
    }

    fn handle_default_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(c) if !ctrl && !alt => {
                let change = self.buffer.insert(&c.to_string(), ChangeOrigin::Input);
                self.after_edit(Some(change));
            }
            KeyCode::Enter => self.run_command(Command::NewlineAndIndent),
            KeyCode::Tab => self.run_command(Command::InsertTab),
            KeyCode::BackTab => self.run_command(Command::IndentLess),
            KeyCode::Backspace => {
                let change = self.buffer.backspace();
                self.after_edit(change);
            }
            KeyCode::Delete => {
                let change = self.buffer.delete_forward();
                self.after_edit(change);
            }
            KeyCode::Left => {
                let moved = self.buffer.move_left();
                self.after_move(moved);
            }
            KeyCode::Right => {
                let moved = self.buffer.move_right();
                self.after_move(moved);
            }
            KeyCode::Up => {
                let moved = self.buffer.move_up();
                self.after_move(moved);
            }
            KeyCode::Down => {
                let moved = self.buffer.move_down();
                self.after_move(moved);
            }
            KeyCode::Home if ctrl => self.run_command(Command::GoDocStart),
            KeyCode::End if ctrl => self.run_command(Command::GoDocEnd),
            KeyCode::Home => {
                let moved = self.buffer.move_line_start();
                self.after_move(moved);
            }
            KeyCode::End => {
                let moved = self.buffer.move_line_end();
                self.after_move(moved);
            }
            _ => return false,
        }
        true
    }

    fn run_command(&mut self, command: Command) {
        debug!(id = %self.id, command = command.name(), "running editor command");
        match command {
            Command::Autocomplete => self.show_hint(),
            Command::InsertTab => {
                let change = self.buffer.insert(&self.indent_string(), ChangeOrigin::Input);
                self.after_edit(Some(change));
            }
            Command::IndentMore => {
                let cursor = self.buffer.cursor();
                let unit = self.indent_string();
                let start = Position::new(cursor.line, 0);
                let change = self
                    .buffer
                    .replace_range(start, start, &unit, ChangeOrigin::Indent);
                self.buffer
                    .set_cursor(Position::new(cursor.line, cursor.ch + unit.chars().count()));
                self.after_edit(Some(change));
            }
            Command::IndentLess => {
                let change = self.buffer.dedent(self.indent_unit);
                self.after_edit(change);
            }
            Command::NewlineAndIndent => {
                let text = format!("\n{}", self.next_line_indent());
                let change = self.buffer.insert(&text, ChangeOrigin::Input);
                self.after_edit(Some(change));
            }
            Command::GoDocStart => {
                let moved = self.buffer.move_doc_start();
                self.after_move(moved);
            }
            Command::GoDocEnd => {
                let moved = self.buffer.move_doc_end();
                self.after_move(moved);
            }
            Command::DeleteLine => {
                let change = self.buffer.delete_line();
                self.after_edit(Some(change));
            }
        }
    }

    fn indent_string(&self) -> String {
        if self.indent_with_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_unit)
        }
    }

    /// Indentation for a line opened at the cursor.
    fn next_line_indent(&self) -> String {
        if !self.smart_indent {
            return String::new();
        }
        let cursor = self.buffer.cursor();
        let mut indent = self.buffer.indentation(cursor.line).to_string();
        let before: String = self
            .buffer
            .line(cursor.line)
            .chars()
            .take(cursor.ch)
            .collect();
        if before.trim_end().ends_with('(') {
            indent.push_str(&self.indent_string());
        }
        indent
    }

    /// Replaces the word range of the popup with the selected candidate.
    fn pick(&mut self) {
        let Some(item) = self.popup.selected_item().map(str::to_string) else {
            self.popup.close();
            return;
        };
        let (from, to) = (self.popup.from, self.popup.to);
        self.popup.close();
        let change = self
            .buffer
            .replace_range(from, to, &item, ChangeOrigin::Complete);
        self.after_edit(Some(change));
    }

    fn after_edit(&mut self, change: Option<ChangeEvent>) {
        let Some(change) = change else {
            return;
        };
        self.popup.close();
        self.emit(EditorEvent::Change(change));
        self.emit(EditorEvent::CursorActivity {
            cursor: self.buffer.cursor(),
        });
    }

    fn after_move(&mut self, moved: bool) {
        if moved {
            self.popup.close();
            self.emit(EditorEvent::CursorActivity {
                cursor: self.buffer.cursor(),
            });
        }
    }

    /// Delivers `event` to matching listeners. Listeners added while
    /// dispatching are kept but not called for this event.
    fn emit(&mut self, event: EditorEvent) {
        if self.destroyed {
            return;
        }
        let kind = event.kind();
        let mut subscriptions = std::mem::take(&mut self.subscriptions);
        for subscription in subscriptions.iter_mut().filter(|s| s.kind == kind) {
            if self.destroyed {
                break;
            }
            if self.live.contains(&subscription.id) {
                let instance: &mut dyn EditorInstance = &mut *self;
                (subscription.listener)(instance, &event);
            }
        }
        subscriptions.append(&mut self.subscriptions);
        subscriptions.retain(|s| self.live.contains(&s.id));
        self.subscriptions = subscriptions;
    }

    fn styled_line(&self, index: usize) -> StyledLine {
        let line = self.buffer.line(index);
        let chars: Vec<char> = line.chars().collect();
        let byte_to_char: Vec<usize> = line.char_indices().map(|(b, _)| b).collect();

        let mut styles = vec![self.theme.base(); chars.len()];
        for token in self.mode.tokenize(line) {
            let style = self.theme.token_style(token.kind);
            let first = byte_to_char.partition_point(|&b| b < token.start);
            let last = byte_to_char.partition_point(|&b| b < token.end());
            styles[first..last].fill(style);
        }

        let mut cols = Vec::with_capacity(chars.len() + 1);
        let mut col = 0;
        for c in &chars {
            cols.push(col);
            col += if *c == '\t' {
                self.tab_size - col % self.tab_size
            } else {
                c.width().unwrap_or(1)
            };
        }
        cols.push(col);

        StyledLine {
            chars,
            styles,
            cols,
        }
    }

    fn rows_for(&self, line: &StyledLine, width: usize) -> usize {
        if self.line_wrapping {
            line.cols[line.chars.len()] / width + 1
        } else {
            1
        }
    }

    /// Visual `(row, col)` of `pos` within the unscrolled document.
    fn visual_position(&self, pos: Position, width: usize) -> (usize, usize) {
        let rows_before: usize = (0..pos.line)
            .map(|i| self.rows_for(&self.styled_line(i), width))
            .sum();
        let line = self.styled_line(pos.line);
        let col = line.cols[pos.ch.min(line.chars.len())];
        if self.line_wrapping {
            (rows_before + col / width, col % width)
        } else {
            (rows_before, col)
        }
    }

    /// Draws the editor and, if open, its hint popup.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.area = area;
        self.cursor_screen = None;
        buf.set_style(area, self.theme.base());
        if area.width == 0 || area.height == 0 || self.destroyed {
            return;
        }
        let width = area.width as usize;
        let height = area.height as usize;

        let cursor = self.buffer.cursor();
        let (cursor_row, cursor_col) = self.visual_position(cursor, width);
        if cursor_row < self.scroll_row {
            self.scroll_row = cursor_row;
        } else if cursor_row >= self.scroll_row + height {
            self.scroll_row = cursor_row + 1 - height;
        }
        if self.line_wrapping {
            self.scroll_col = 0;
        } else if cursor_col < self.scroll_col {
            self.scroll_col = cursor_col;
        } else if cursor_col >= self.scroll_col + width {
            self.scroll_col = cursor_col + 1 - width;
        }

        let brackets = if self.match_brackets {
            self.buffer.matching_bracket()
        } else {
            None
        };

        let mut row = 0;
        for index in 0..self.buffer.line_count() {
            if row >= self.scroll_row + height {
                break;
            }
            let mut line = self.styled_line(index);
            if let Some((a, b)) = brackets {
                for pos in [a, b].into_iter().filter(|p| p.line == index) {
                    line.styles[pos.ch] = line.styles[pos.ch].patch(self.theme.bracket_style());
                }
            }

            for (ch, c) in line.chars.iter().enumerate() {
                let start = line.cols[ch];
                for col in start..line.cols[ch + 1] {
                    // Cells covered by a wide character stay blank.
                    let symbol = if *c == '\t' || col > start { ' ' } else { *c };
                    self.put(buf, area, row, col, symbol, line.styles[ch]);
                }
            }
            row += self.rows_for(&line, width);
        }

        if self.focused {
            let screen = self.screen_cell(area, cursor_row, cursor_col);
            if let Some((x, y)) = screen {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_style(Style::default().add_modifier(Modifier::REVERSED));
                }
            }
            self.cursor_screen = screen;
        }

        if self.popup.visible {
            let (row, col) = self.visual_position(self.popup.from, width);
            let anchor = self
                .screen_cell(area, row, col)
                .unwrap_or((area.x, area.y));
            let popup = HintPopup::new(&self.popup, &self.theme);
            let popup_area = popup.popup_area(anchor, area);
            popup.render(popup_area, buf);
        }
    }

    /// Maps an unscrolled visual cell to a screen cell inside `area`.
    fn screen_cell(&self, area: Rect, row: usize, col: usize) -> Option<(u16, u16)> {
        let y = row.checked_sub(self.scroll_row)?;
        let x = col.checked_sub(self.scroll_col)?;
        (y < area.height as usize && x < area.width as usize)
            .then(|| (area.x + x as u16, area.y + y as u16))
    }

    fn put(&self, buf: &mut Buffer, area: Rect, row: usize, col: usize, c: char, style: Style) {
        let width = area.width as usize;
        let (row, col) = if self.line_wrapping {
            (row + col / width, col % width)
        } else {
            (row, col)
        };
        if let Some((x, y)) = self.screen_cell(area, row, col) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(c).set_style(style);
            }
        }
    }
}

impl EditorInstance for TerminalEditor {
    fn id(&self) -> InstanceId {
        self.id
    }

    fn on(&mut self, kind: EventKind, listener: Listener) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        if !self.destroyed {
            self.live.insert(id);
            self.subscriptions.push(Subscription { id, kind, listener });
        }
        id
    }

    fn off(&mut self, subscription: SubscriptionId) -> bool {
        if !self.live.remove(&subscription) {
            return false;
        }
        self.subscriptions.retain(|s| s.id != subscription);
        true
    }

    fn listener_count(&self) -> usize {
        self.live.len()
    }

    fn value(&self) -> String {
        self.buffer.text()
    }

    fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    fn show_hint(&mut self) {
        if self.destroyed {
            return;
        }
        let ctx = CursorContext::from_buffer(&self.buffer);
        let result = self.hint_source.hints(&ctx);
        let single = result.len() == 1;
        self.popup.open(result);
        if single && self.complete_single {
            self.pick();
        }
    }

    fn close_hint(&mut self) {
        self.popup.close();
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.subscriptions.clear();
        self.live.clear();
        self.popup.close();
        self.focused = false;
        debug!(id = %self.id, "editor destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
