//! Line-based text buffer with a single cursor.
//!
//! Positions are `(line, ch)` pairs where `ch` counts characters, not bytes.

use super::{ChangeEvent, ChangeOrigin};

/// A cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

const OPEN_BRACKETS: [char; 3] = ['(', '[', '{'];
const CLOSE_BRACKETS: [char; 3] = [')', ']', '}'];

/// Editable document.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Position,
}

impl TextBuffer {
    /// Creates a buffer holding `text` with the cursor at the start.
    pub fn new(text: &str) -> Self {
        let lines = text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
        Self {
            lines,
            cursor: Position::default(),
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    fn line_len(&self, index: usize) -> usize {
        self.line(index).chars().count()
    }

    /// Clamps `pos` into the document.
    pub fn clip(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len().saturating_sub(1));
        Position::new(line, pos.ch.min(self.line_len(line)))
    }

    /// Moves the cursor. Returns true if it moved.
    pub fn set_cursor(&mut self, pos: Position) -> bool {
        let pos = self.clip(pos);
        let moved = pos != self.cursor;
        self.cursor = pos;
        moved
    }

    /// Character at `pos`, if any.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line).chars().nth(pos.ch)
    }

    /// Text from the document start up to the cursor.
    pub fn text_before_cursor(&self) -> String {
        let mut before: Vec<&str> = self.lines[..self.cursor.line]
            .iter()
            .map(String::as_str)
            .collect();
        let current = self.line(self.cursor.line);
        before.push(&current[..byte_index(current, self.cursor.ch)]);
        before.join("\n")
    }

    /// Leading whitespace of a line.
    pub fn indentation(&self, line: usize) -> &str {
        let text = self.line(line);
        let end = text.len() - text.trim_start_matches([' ', '\t']).len();
        &text[..end]
    }

    /// Replaces the text between `from` and `to` and leaves the cursor at the
    /// end of the inserted text.
    pub fn replace_range(
        &mut self,
        from: Position,
        to: Position,
        text: &str,
        origin: ChangeOrigin,
    ) -> ChangeEvent {
        let (from, to) = {
            let (a, b) = (self.clip(from), self.clip(to));
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };
        let removed = self.slice(from, to);

        let head = {
            let line = self.line(from.line);
            line[..byte_index(line, from.ch)].to_string()
        };
        let tail = {
            let line = self.line(to.line);
            line[byte_index(line, to.ch)..].to_string()
        };

        let inserted: Vec<String> = text.split('\n').map(String::from).collect();
        let last = inserted.len() - 1;
        let cursor = if last == 0 {
            Position::new(from.line, from.ch + inserted[0].chars().count())
        } else {
            Position::new(from.line + last, inserted[last].chars().count())
        };

        let mut replacement: Vec<String> = inserted.clone();
        replacement[0] = format!("{head}{}", replacement[0]);
        replacement[last].push_str(&tail);
        self.lines.splice(from.line..=to.line, replacement);
        self.cursor = cursor;

        ChangeEvent {
            from,
            to,
            text: inserted,
            removed,
            origin,
        }
    }

    /// Inserts text at the cursor.
    pub fn insert(&mut self, text: &str, origin: ChangeOrigin) -> ChangeEvent {
        let at = self.cursor;
        self.replace_range(at, at, text, origin)
    }

    /// Deletes the character before the cursor, joining lines at column 0.
    pub fn backspace(&mut self) -> Option<ChangeEvent> {
        let to = self.cursor;
        let from = if to.ch > 0 {
            Position::new(to.line, to.ch - 1)
        } else if to.line > 0 {
            Position::new(to.line - 1, self.line_len(to.line - 1))
        } else {
            return None;
        };
        Some(self.replace_range(from, to, "", ChangeOrigin::Delete))
    }

    /// Deletes the character after the cursor, joining lines at line end.
    pub fn delete_forward(&mut self) -> Option<ChangeEvent> {
        let from = self.cursor;
        let to = if from.ch < self.line_len(from.line) {
            Position::new(from.line, from.ch + 1)
        } else if from.line + 1 < self.lines.len() {
            Position::new(from.line + 1, 0)
        } else {
            return None;
        };
        Some(self.replace_range(from, to, "", ChangeOrigin::Delete))
    }

    /// Removes the cursor line entirely.
    pub fn delete_line(&mut self) -> ChangeEvent {
        let line = self.cursor.line;
        let (from, to) = if line + 1 < self.lines.len() {
            (Position::new(line, 0), Position::new(line + 1, 0))
        } else if line > 0 {
            (
                Position::new(line - 1, self.line_len(line - 1)),
                Position::new(line, self.line_len(line)),
            )
        } else {
            (Position::new(0, 0), Position::new(0, self.line_len(0)))
        };
        let change = self.replace_range(from, to, "", ChangeOrigin::Delete);
        self.cursor = self.clip(Position::new(line, 0));
        change
    }

    /// Removes up to `width` columns of leading whitespace from the cursor line.
    pub fn dedent(&mut self, width: usize) -> Option<ChangeEvent> {
        let line = self.cursor.line;
        let indent = self.indentation(line);
        let remove = if indent.starts_with('\t') {
            1
        } else {
            indent.chars().take_while(|c| *c == ' ').count().min(width)
        };
        if remove == 0 {
            return None;
        }
        let cursor = self.cursor;
        let change = self.replace_range(
            Position::new(line, 0),
            Position::new(line, remove),
            "",
            ChangeOrigin::Indent,
        );
        self.cursor = Position::new(line, cursor.ch.saturating_sub(remove));
        Some(change)
    }

    pub fn move_left(&mut self) -> bool {
        let c = self.cursor;
        if c.ch > 0 {
            self.set_cursor(Position::new(c.line, c.ch - 1))
        } else if c.line > 0 {
            self.set_cursor(Position::new(c.line - 1, self.line_len(c.line - 1)))
        } else {
            false
        }
    }

    pub fn move_right(&mut self) -> bool {
        let c = self.cursor;
        if c.ch < self.line_len(c.line) {
            self.set_cursor(Position::new(c.line, c.ch + 1))
        } else if c.line + 1 < self.lines.len() {
            self.set_cursor(Position::new(c.line + 1, 0))
        } else {
            false
        }
    }

    pub fn move_up(&mut self) -> bool {
        let c = self.cursor;
        c.line > 0 && self.set_cursor(Position::new(c.line - 1, c.ch))
    }

    pub fn move_down(&mut self) -> bool {
        let c = self.cursor;
        c.line + 1 < self.lines.len() && self.set_cursor(Position::new(c.line + 1, c.ch))
    }

    pub fn move_line_start(&mut self) -> bool {
        self.set_cursor(Position::new(self.cursor.line, 0))
    }

    pub fn move_line_end(&mut self) -> bool {
        let line = self.cursor.line;
        self.set_cursor(Position::new(line, self.line_len(line)))
    }

    pub fn move_doc_start(&mut self) -> bool {
        self.set_cursor(Position::default())
    }

    pub fn move_doc_end(&mut self) -> bool {
        let last = self.lines.len() - 1;
        self.set_cursor(Position::new(last, self.line_len(last)))
    }

    /// Finds the bracket pair touching the cursor: the character before the
    /// cursor is checked first, then the one after it.
    pub fn matching_bracket(&self) -> Option<(Position, Position)> {
        let c = self.cursor;
        let candidates = [
            (c.ch > 0).then(|| Position::new(c.line, c.ch - 1)),
            Some(c),
        ];
        candidates
            .into_iter()
            .flatten()
            .find_map(|pos| self.char_at(pos).and_then(|ch| self.scan_match(pos, ch)))
    }

    fn scan_match(&self, pos: Position, ch: char) -> Option<(Position, Position)> {
        if let Some(i) = OPEN_BRACKETS.iter().position(|b| *b == ch) {
            let close = CLOSE_BRACKETS[i];
            let mut depth = 0usize;
            for (line_no, line) in self.lines.iter().enumerate().skip(pos.line) {
                let skip = if line_no == pos.line { pos.ch } else { 0 };
                for (ch_no, c) in line.chars().enumerate().skip(skip) {
                    if c == ch {
                        depth += 1;
                    } else if c == close {
                        depth -= 1;
                        if depth == 0 {
                            return Some((pos, Position::new(line_no, ch_no)));
                        }
                    }
                }
            }
            None
        } else if let Some(i) = CLOSE_BRACKETS.iter().position(|b| *b == ch) {
            let open = OPEN_BRACKETS[i];
            let mut depth = 0usize;
            for line_no in (0..=pos.line).rev() {
                let chars: Vec<char> = self.line(line_no).chars().collect();
                let end = if line_no == pos.line { pos.ch + 1 } else { chars.len() };
                for ch_no in (0..end).rev() {
                    let c = chars[ch_no];
                    if c == ch {
                        depth += 1;
                    } else if c == open {
                        depth -= 1;
                        if depth == 0 {
                            return Some((pos, Position::new(line_no, ch_no)));
                        }
                    }
                }
            }
            None
        } else {
            None
        }
    }

    fn slice(&self, from: Position, to: Position) -> Vec<String> {
        if from.line == to.line {
            let line = self.line(from.line);
            return vec![line[byte_index(line, from.ch)..byte_index(line, to.ch)].to_string()];
        }
        let first = self.line(from.line);
        let last = self.line(to.line);
        let mut out = vec![first[byte_index(first, from.ch)..].to_string()];
        out.extend(self.lines[from.line + 1..to.line].iter().cloned());
        out.push(last[..byte_index(last, to.ch)].to_string());
        out
    }
}

/// Byte offset of the `ch`-th character of `line` (or its length).
pub fn byte_index(line: &str, ch: usize) -> usize {
    line.char_indices()
        .nth(ch)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
