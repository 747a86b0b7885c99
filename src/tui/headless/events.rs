//! Event DSL for headless mode.
//!
//! Scripts are lists of events separated by commas or newlines, e.g.
//! `type:SELECT * FROM us,key:Tab,assert:contains:users`. A literal comma is
//! written `\,`. Lines starting with `#` are comments.

use super::HeadlessState;
use crate::editor::keymap::KeyChord;
use crate::error::{FormulaError, Result};
use std::fmt;

/// An assertion to check against the screen or state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen does not contain text (case-insensitive).
    NotContains(String),
    /// Screen matches a regex.
    Matches(String),
    /// State field equals value.
    StateEquals { field: String, value: String },
    /// Numeric comparison of a state field (`>=`, `<=`, `>`, `<`).
    StateCompare {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::StateEquals { field, value } => {
                state.field(field).as_deref() == Some(value.as_str())
            }
            Self::StateCompare { field, op, value } => {
                compare_values(state.field(field).as_deref(), op, value)
            }
        }
    }
}

fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    match (actual.parse::<i64>(), expected.parse::<i64>()) {
        (Ok(a), Ok(e)) => match op {
            ">=" => a >= e,
            "<=" => a <= e,
            ">" => a > e,
            "<" => a < e,
            _ => false,
        },
        _ => false,
    }
}

/// A parsed headless event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press, named the CodeMirror way (`Tab`, `Ctrl-Space`).
    Key(KeyChord),
    /// Type text, one key press per character.
    Type(String),
    /// Re-render the host component with a new value.
    Props(String),
    Mount,
    Unmount,
    Resize(u16, u16),
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(chord) => write!(f, "key:{chord}"),
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Props(value) => write!(f, "props:{value}"),
            Self::Mount => write!(f, "mount"),
            Self::Unmount => write!(f, "unmount"),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Assert(a) => match a {
                Assertion::Contains(t) => write!(f, "assert:contains:{t}"),
                Assertion::NotContains(t) => write!(f, "assert:not-contains:{t}"),
                Assertion::Matches(p) => write!(f, "assert:matches:{p}"),
                Assertion::StateEquals { field, value } => {
                    write!(f, "assert:state:{field}={value}")
                }
                Assertion::StateCompare { field, op, value } => {
                    write!(f, "assert:state:{field}{op}{value}")
                }
            },
        }
    }
}

/// Splits a line on commas not preceded by a backslash, unescaping `\,`.
fn split_events(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses every event in `input`.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        for line in input.lines() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            for part in split_events(line) {
                let part = part.trim_start();
                if part.trim().is_empty() {
                    continue;
                }
                events.push(self.parse_one(part)?);
            }
        }
        Ok(events)
    }

    /// Parses a single event. Text after `type:` and `props:` is kept verbatim,
    /// including trailing spaces.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim_start();
        let (event_type, value) = match input.split_once(':') {
            Some((t, v)) => (t.trim().to_lowercase(), v),
            None => (input.trim().to_lowercase(), ""),
        };

        match event_type.as_str() {
            "key" => {
                let chord = KeyChord::parse(value.trim())
                    .map_err(|e| FormulaError::script(format!("Invalid key event: {e}")))?;
                Ok(Event::Key(chord))
            }
            "type" => Ok(Event::Type(value.to_string())),
            "props" => Ok(Event::Props(value.to_string())),
            "mount" => Ok(Event::Mount),
            "unmount" => Ok(Event::Unmount),
            "resize" => self.parse_resize(value.trim()),
            "assert" => self.parse_assert(value.trim()),
            _ => Err(FormulaError::script(format!(
                "Unknown event type: '{}'. Valid types: key, type, props, mount, unmount, resize, assert",
                event_type
            ))),
        }
    }

    fn parse_resize(&self, value: &str) -> Result<Event> {
        let (width, height) = crate::cli::parse_size(value).map_err(FormulaError::script)?;
        Ok(Event::Resize(width, height))
    }

    fn parse_assert(&self, value: &str) -> Result<Event> {
        let Some((assert_type, rest)) = value.split_once(':') else {
            return Err(FormulaError::script(format!(
                "Invalid assertion syntax: '{}'. Expected assert:type:value",
                value
            )));
        };

        let assertion = match assert_type.trim().to_lowercase().as_str() {
            "contains" => Assertion::Contains(rest.to_string()),
            "not-contains" => Assertion::NotContains(rest.to_string()),
            "matches" => {
                regex::Regex::new(rest).map_err(|e| {
                    FormulaError::script(format!("Invalid regex '{rest}': {e}"))
                })?;
                Assertion::Matches(rest.to_string())
            }
            "state" => self.parse_state_assertion(rest)?,
            other => {
                return Err(FormulaError::script(format!(
                    "Unknown assertion type: '{}'. Valid types: contains, not-contains, matches, state",
                    other
                )));
            }
        };

        Ok(Event::Assert(assertion))
    }

    fn parse_state_assertion(&self, value: &str) -> Result<Assertion> {
        for op in [">=", "<=", ">", "<", "="] {
            if let Some((field, expected)) = value.split_once(op) {
                let field = field.trim().to_string();
                let expected = expected.trim().to_string();
                return Ok(if op == "=" {
                    Assertion::StateEquals {
                        field,
                        value: expected,
                    }
                } else {
                    Assertion::StateCompare {
                        field,
                        op: op.to_string(),
                        value: expected,
                    }
                });
            }
        }

        Err(FormulaError::script(format!(
            "Invalid state assertion: '{}'. Expected field=value or field>=value",
            value
        )))
    }
}
