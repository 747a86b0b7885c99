//! Built-in SQL-aware completer.
//!
//! Completes table names after `FROM`/`JOIN`/`INTO`/`UPDATE`, columns after a
//! `table.` or `alias.` qualifier, columns of the referenced tables inside
//! select lists and conditions, and dialect keywords everywhere else.

use super::hint::{filter_candidates, CursorContext, HintResult, HintSource};
use super::mode::{SqlMode, Token, TokenKind};
use std::collections::{BTreeMap, HashMap};

/// Table name to ordered column names, as passed in the hint options.
pub type HintTables = BTreeMap<String, Vec<String>>;

/// Keywords offered at the start of a statement.
const STATEMENT_STARTERS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE", "WITH"];

/// Keywords offered after a table reference.
const TABLE_CONTINUATIONS: &[&str] = &[
    "WHERE",
    "JOIN",
    "LEFT JOIN",
    "INNER JOIN",
    "ON",
    "AS",
    "ORDER BY",
    "GROUP BY",
    "LIMIT",
];

/// Clause the cursor is in, derived from the tokens before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Start,
    /// A table name is expected.
    Tables,
    /// Right after a table name or its alias.
    AfterTable,
    /// A column or expression is expected.
    Columns,
    /// Anywhere else (literals, `LIMIT`, column aliases).
    Other,
}

impl Clause {
    fn after_keyword(self, keyword: &str) -> Self {
        match keyword {
            "FROM" | "JOIN" | "INTO" | "UPDATE" | "TABLE" => Self::Tables,
            "SELECT" | "WHERE" | "ON" | "AND" | "OR" | "BY" | "SET" | "HAVING" | "WHEN"
            | "THEN" | "ELSE" | "DISTINCT" | "NOT" | "IS" | "IN" | "LIKE" | "BETWEEN" => {
                Self::Columns
            }
            "AS" if self == Self::AfterTable => Self::AfterTable,
            "AS" | "VALUES" | "LIMIT" | "OFFSET" => Self::Other,
            _ => self,
        }
    }

    fn after_token(self, token: &Token<'_>) -> Self {
        match token.kind {
            TokenKind::Keyword => self.after_keyword(&token.text.to_ascii_uppercase()),
            TokenKind::Identifier | TokenKind::QuotedIdentifier | TokenKind::Builtin
                if self == Self::Tables =>
            {
                Self::AfterTable
            }
            TokenKind::Punctuation if token.text == "," && self == Self::AfterTable => {
                Self::Tables
            }
            TokenKind::Punctuation if token.text == "(" && self == Self::AfterTable => {
                Self::Columns
            }
            _ => self,
        }
    }
}

/// Tables referenced by a statement and the aliases given to them.
#[derive(Debug, Default)]
struct References {
    tables: Vec<String>,
    aliases: HashMap<String, String>,
}

impl References {
    fn scan(tokens: &[Token<'_>], known: &HintTables) -> Self {
        let mut refs = Self::default();
        let mut i = 0;
        while i < tokens.len() {
            let introduces = ["FROM", "JOIN", "INTO", "UPDATE"]
                .iter()
                .any(|kw| tokens[i].is_keyword(kw));
            i += 1;
            if !introduces {
                continue;
            }
            let is_list = tokens[i - 1].is_keyword("FROM");

            while let Some(table) = tokens.get(i).filter(|t| is_name(t)) {
                let table = canonical_table(known, table.unquoted());
                refs.tables.push(table.clone());
                i += 1;
                if tokens.get(i).is_some_and(|t| t.is_keyword("AS")) {
                    i += 1;
                }
                if let Some(alias) = tokens.get(i).filter(|t| is_name(t)) {
                    refs.aliases.insert(alias.unquoted().to_lowercase(), table);
                    i += 1;
                }
                let more = tokens
                    .get(i)
                    .is_some_and(|t| t.kind == TokenKind::Punctuation && t.text == ",");
                if !(is_list && more) {
                    break;
                }
                i += 1;
            }
        }
        refs
    }

    fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases
            .get(&name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(name)
    }
}

fn is_name(token: &Token<'_>) -> bool {
    matches!(
        token.kind,
        TokenKind::Identifier | TokenKind::QuotedIdentifier
    )
}

/// Table name as spelled in `known`, matching case-insensitively.
fn canonical_table(known: &HintTables, name: &str) -> String {
    if known.contains_key(name) {
        return name.to_string();
    }
    known
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned()
        .unwrap_or_else(|| name.to_string())
}

fn columns_of<'a>(known: &'a HintTables, table: &str) -> &'a [String] {
    known
        .get(&canonical_table(known, table))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Keywords in the case the user is typing in.
fn keywords_for(word: &str, keywords: &[&str]) -> Vec<String> {
    let lower = !word.is_empty() && word.chars().all(|c| !c.is_uppercase());
    keywords
        .iter()
        .map(|k| if lower { k.to_lowercase() } else { k.to_string() })
        .collect()
}

/// Computes completions for `ctx`.
pub fn sql_hint(ctx: &CursorContext, tables: &HintTables, mode: &SqlMode) -> HintResult {
    let before = mode.tokenize(&ctx.before_cursor);

    // Nothing to complete inside a literal or comment.
    if before.last().is_some_and(|t| {
        matches!(t.kind, TokenKind::String | TokenKind::Comment)
            && t.end() == ctx.before_cursor.len()
    }) {
        return HintResult::empty(ctx);
    }

    let refs = References::scan(&mode.tokenize(&ctx.text), tables);

    if let Some(qualifier) = ctx.qualifier() {
        let table = refs.resolve(qualifier);
        let columns = columns_of(tables, table);
        return HintResult::for_word(ctx, filter_candidates(&ctx.word, columns.iter().cloned()));
    }

    let scanned = if ctx.word.is_empty() {
        &before[..]
    } else {
        &before[..before.len().saturating_sub(1)]
    };
    let clause = scanned
        .iter()
        .fold(Clause::Start, |clause, token| clause.after_token(token));

    let word = ctx.word.as_str();
    let keywords = || {
        if word.is_empty() {
            Vec::new()
        } else {
            keywords_for(word, &mode.completion_words())
        }
    };

    let candidates: Vec<String> = match clause {
        Clause::Start if word.is_empty() => keywords_for(word, STATEMENT_STARTERS),
        Clause::Start | Clause::Other => keywords(),
        Clause::Tables => tables.keys().cloned().collect(),
        Clause::AfterTable if word.is_empty() => keywords_for(word, TABLE_CONTINUATIONS),
        Clause::AfterTable => keywords(),
        Clause::Columns => {
            let mut list: Vec<String> = if refs.tables.is_empty() {
                tables.values().flatten().cloned().collect()
            } else {
                refs.tables
                    .iter()
                    .flat_map(|t| columns_of(tables, t).iter().cloned())
                    .collect()
            };
            list.extend(tables.keys().cloned());
            list.extend(keywords());
            list
        }
    };

    HintResult::for_word(ctx, filter_candidates(word, candidates))
}

/// [`HintSource`] adapter over [`sql_hint`].
#[derive(Debug, Clone)]
pub struct SqlHint {
    tables: HintTables,
    mode: SqlMode,
}

impl SqlHint {
    pub fn new(tables: HintTables, mode: SqlMode) -> Self {
        Self { tables, mode }
    }
}

impl HintSource for SqlHint {
    fn hints(&self, ctx: &CursorContext) -> HintResult {
        sql_hint(ctx, &self.tables, &self.mode)
    }
}
