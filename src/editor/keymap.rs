//! Key names and editor commands.
//!
//! Keys are written the CodeMirror way: optional `Ctrl-`, `Alt-`, `Shift-`
//! prefixes followed by a key name (`Tab`, `Enter`, `Space`, `F5`, `a`, `/`).

use crate::error::{FormulaError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A key together with its modifiers, normalized so that parsed names and
/// terminal events compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let mut modifiers =
            modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        let chorded = modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let code = match code {
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            KeyCode::Char(c) if chorded => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        // Shift is already folded into BackTab and into the case of characters.
        if matches!(code, KeyCode::BackTab | KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self { code, modifiers }
    }

    /// Parses a key name such as `Ctrl-Space` or `Shift-Tab`.
    pub fn parse(name: &str) -> Result<Self> {
        let mut rest = name.trim();
        let mut modifiers = KeyModifiers::empty();

        loop {
            let Some((prefix, tail)) = rest.split_once('-') else {
                break;
            };
            if tail.is_empty() {
                break;
            }
            match prefix.to_ascii_lowercase().as_str() {
                "ctrl" | "cmd" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => break,
            }
            rest = tail;
        }

        let code = parse_key_code(rest).ok_or_else(|| {
            FormulaError::construction(format!("Unknown key name '{}'", name))
        })?;
        Ok(Self::new(code, modifiers))
    }

    /// Converts the chord into the event a terminal would deliver.
    pub fn to_event(self) -> KeyEvent {
        KeyEvent::new(self.code, self.modifiers)
    }
}

impl From<&KeyEvent> for KeyChord {
    fn from(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift-")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::BackTab => write!(f, "Shift-Tab"),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Esc => write!(f, "Esc"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            other => write!(f, "{other:?}"),
        }
    }
}

fn parse_key_code(name: &str) -> Option<KeyCode> {
    let lower = name.to_ascii_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then_some(KeyCode::F(n));
    }
    let code = match lower.as_str() {
        "tab" => KeyCode::Tab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Commands that can be bound in `extra_keys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the hint popup.
    Autocomplete,
    /// Insert a tab (or indent unit of spaces).
    InsertTab,
    /// Indent the cursor line by one unit.
    IndentMore,
    /// Remove one indent unit from the cursor line.
    IndentLess,
    /// Insert a newline followed by indentation.
    NewlineAndIndent,
    GoDocStart,
    GoDocEnd,
    DeleteLine,
}

impl Command {
    const NAMES: [(Command, &'static str); 8] = [
        (Command::Autocomplete, "autocomplete"),
        (Command::InsertTab, "insertTab"),
        (Command::IndentMore, "indentMore"),
        (Command::IndentLess, "indentLess"),
        (Command::NewlineAndIndent, "newlineAndIndent"),
        (Command::GoDocStart, "goDocStart"),
        (Command::GoDocEnd, "goDocEnd"),
        (Command::DeleteLine, "deleteLine"),
    ];

    pub fn from_name(name: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(command, _)| *command)
            .ok_or_else(|| FormulaError::construction(format!("Unknown command '{}'", name)))
    }

    pub fn name(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(command, _)| command == self)
            .map(|(_, n)| *n)
            .unwrap_or("unknown")
    }
}

/// Extra key bindings consulted before the default key handling.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<KeyChord, Command>,
}

impl KeyMap {
    /// Builds a key map from `key name -> command name` pairs.
    pub fn from_names(names: &BTreeMap<String, String>) -> Result<Self> {
        let bindings = names
            .iter()
            .map(|(key, command)| Ok((KeyChord::parse(key)?, Command::from_name(command)?)))
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { bindings })
    }

    pub fn command_for(&self, event: &KeyEvent) -> Option<Command> {
        self.bindings.get(&KeyChord::from(event)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
