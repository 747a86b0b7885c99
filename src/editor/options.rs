//! Creation options for editor instances.
//!
//! Options are fixed at construction time; changing any of them means building
//! a new instance.

use super::hint::HintSource;
use super::sql_hint::HintTables;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Options controlling the hint popup.
#[derive(Clone)]
pub struct HintOptions {
    /// Pick the candidate immediately when a request yields exactly one.
    pub complete_single: bool,
    /// Schema used by the built-in SQL completer.
    pub tables: HintTables,
    /// Hint source to use instead of the built-in SQL completer.
    pub hint: Option<Rc<dyn HintSource>>,
}

impl Default for HintOptions {
    fn default() -> Self {
        Self {
            complete_single: true,
            tables: HintTables::new(),
            hint: None,
        }
    }
}

impl fmt::Debug for HintOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HintOptions")
            .field("complete_single", &self.complete_single)
            .field("tables", &self.tables)
            .field("hint", &self.hint.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

/// Everything an editor needs at construction.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Initial document.
    pub value: String,
    /// MIME name of the SQL mode, e.g. `text/x-mysql`.
    pub mode: String,
    /// Palette name.
    pub theme: String,
    /// Indent with tab characters instead of `indent_unit` spaces.
    pub indent_with_tabs: bool,
    pub indent_unit: usize,
    /// Display width of a tab character.
    pub tab_size: usize,
    /// Carry indentation over on Enter and indent after an open bracket.
    pub smart_indent: bool,
    /// Highlight the bracket pair touching the cursor.
    pub match_brackets: bool,
    /// Wrap long lines instead of scrolling horizontally.
    pub line_wrapping: bool,
    /// Take keyboard focus on construction.
    pub autofocus: bool,
    /// Key name to command name bindings, consulted before default handling.
    pub extra_keys: BTreeMap<String, String>,
    pub hint_options: HintOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            value: String::new(),
            mode: "text/x-sql".to_string(),
            theme: "default".to_string(),
            indent_with_tabs: false,
            indent_unit: 2,
            tab_size: 4,
            smart_indent: true,
            match_brackets: false,
            line_wrapping: false,
            autofocus: false,
            extra_keys: BTreeMap::new(),
            hint_options: HintOptions::default(),
        }
    }
}
