//! Hint requests, results and the process-wide helper registry.

use super::buffer::{Position, TextBuffer};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Snapshot of the editor around the cursor, handed to hint sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorContext {
    /// Whole document.
    pub text: String,
    /// Document text up to the cursor.
    pub before_cursor: String,
    pub cursor: Position,
    /// Word characters immediately before the cursor.
    pub word: String,
    /// Start of the word under the cursor.
    pub word_start: Position,
    /// End of the word under the cursor (it may extend past the cursor).
    pub word_end: Position,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl CursorContext {
    pub fn from_buffer(buffer: &TextBuffer) -> Self {
        let cursor = buffer.cursor();
        let chars: Vec<char> = buffer.line(cursor.line).chars().collect();

        let start = chars[..cursor.ch]
            .iter()
            .rposition(|c| !is_word_char(*c))
            .map(|i| i + 1)
            .unwrap_or(0);
        let end = chars[cursor.ch..]
            .iter()
            .position(|c| !is_word_char(*c))
            .map(|i| cursor.ch + i)
            .unwrap_or(chars.len());

        Self {
            text: buffer.text(),
            before_cursor: buffer.text_before_cursor(),
            cursor,
            word: chars[start..cursor.ch].iter().collect(),
            word_start: Position::new(cursor.line, start),
            word_end: Position::new(cursor.line, end),
        }
    }

    /// Builds a context for `text` with the cursor at `cursor`.
    pub fn at(text: &str, cursor: Position) -> Self {
        let mut buffer = TextBuffer::new(text);
        buffer.set_cursor(cursor);
        Self::from_buffer(&buffer)
    }

    /// Builds a context with the cursor at the end of `text`.
    pub fn at_end(text: &str) -> Self {
        let mut buffer = TextBuffer::new(text);
        buffer.move_doc_end();
        Self::from_buffer(&buffer)
    }

    /// The identifier before a `.` that directly precedes the current word,
    /// e.g. `u` in `SELECT u.na`.
    pub fn qualifier(&self) -> Option<&str> {
        let before_word = self.before_cursor.strip_suffix(self.word.as_str())?;
        let before_dot = before_word.strip_suffix('.')?;
        let start = before_dot
            .rfind(|c: char| !(is_word_char(c) || c == '"' || c == '`'))
            .map(|i| i + before_dot[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);
        let qualifier = before_dot[start..].trim_matches(['"', '`']);
        (!qualifier.is_empty()).then_some(qualifier)
    }
}

/// Candidates for the word under the cursor. Picking a candidate replaces the
/// text between `from` and `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintResult {
    pub list: Vec<String>,
    pub from: Position,
    pub to: Position,
}

impl HintResult {
    /// A result replacing the word under the cursor.
    pub fn for_word(ctx: &CursorContext, list: Vec<String>) -> Self {
        Self {
            list,
            from: ctx.word_start,
            to: ctx.word_end,
        }
    }

    pub fn empty(ctx: &CursorContext) -> Self {
        Self::for_word(ctx, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
}

/// Anything that can answer a hint request.
pub trait HintSource {
    fn hints(&self, ctx: &CursorContext) -> HintResult;
}

/// Keeps candidates that start with `word` (ignoring case), dropping exact
/// matches and duplicates while preserving order.
pub fn filter_candidates<I, S>(word: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let prefix = word.to_lowercase();
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(Into::into)
        .filter(|c| {
            let lower = c.to_lowercase();
            lower.starts_with(&prefix) && lower != prefix && seen.insert(lower)
        })
        .collect()
}

/// Helper categories in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HelperKind {
    Hint,
}

/// A registered hint function.
pub type HintHelper = Arc<dyn Fn(&CursorContext) -> HintResult + Send + Sync>;

type Registry = RwLock<HashMap<(HelperKind, String), HintHelper>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::default)
}

/// Registers `helper` under `name` for every editor in the process,
/// replacing any previous registration.
pub fn register_helper(kind: HelperKind, name: impl Into<String>, helper: HintHelper) {
    let name = name.into();
    tracing::debug!(?kind, %name, "registering editor helper");
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert((kind, name), helper);
}

/// Looks up a registered helper.
pub fn helper(kind: HelperKind, name: &str) -> Option<HintHelper> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&(kind, name.to_string()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_context_word_under_cursor() {
        let ctx = CursorContext::at("SELECT na", Position::new(0, 9));
        assert_eq!(ctx.word, "na");
        assert_eq!(ctx.word_start, Position::new(0, 7));
        assert_eq!(ctx.word_end, Position::new(0, 9));
    }

    #[test]
    fn test_context_word_extends_past_cursor() {
        let ctx = CursorContext::at("SELECT name", Position::new(0, 9));
        assert_eq!(ctx.word, "na");
        assert_eq!(ctx.word_end, Position::new(0, 11));
    }

    #[test]
    fn test_context_after_space_has_empty_word() {
        let ctx = CursorContext::at_end("SELECT ");
        assert_eq!(ctx.word, "");
        assert_eq!(ctx.word_start, Position::new(0, 7));
    }

    #[test]
    fn test_context_multiline() {
        let ctx = CursorContext::at_end("SELECT *\nFROM us");
        assert_eq!(ctx.before_cursor, "SELECT *\nFROM us");
        assert_eq!(ctx.word, "us");
        assert_eq!(ctx.word_start, Position::new(1, 5));
    }

    #[test]
    fn test_qualifier() {
        assert_eq!(CursorContext::at_end("SELECT u.na").qualifier(), Some("u"));
        assert_eq!(CursorContext::at_end("SELECT users.").qualifier(), Some("users"));
        assert_eq!(CursorContext::at_end("SELECT `users`.").qualifier(), Some("users"));
        assert_eq!(CursorContext::at_end("SELECT na").qualifier(), None);
        assert_eq!(CursorContext::at_end("SELECT .").qualifier(), None);
    }

    #[test]
    fn test_filter_candidates() {
        let filtered = filter_candidates("na", ["name", "NATION", "score", "name", "na"]);
        assert_eq!(filtered, vec!["name", "NATION"]);
    }

    #[test]
    fn test_filter_with_empty_word_keeps_all() {
        let filtered = filter_candidates("", ["custom-hint", "abc"]);
        assert_eq!(filtered, vec!["custom-hint", "abc"]);
    }

    #[test]
    fn test_register_and_lookup_helper() {
        register_helper(
            HelperKind::Hint,
            "hint-registry-test",
            Arc::new(|ctx: &CursorContext| HintResult::for_word(ctx, vec!["x".to_string()])),
        );
        let helper = helper(HelperKind::Hint, "hint-registry-test").unwrap();
        let result = helper(&CursorContext::at_end(""));
        assert_eq!(result.list, vec!["x"]);
        assert!(super::helper(HelperKind::Hint, "never-registered").is_none());
    }
}
