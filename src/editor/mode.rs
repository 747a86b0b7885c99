//! SQL language modes.
//!
//! A mode is selected by MIME name (`text/x-mysql`, `text/x-pgsql`, ...) and
//! provides the keyword set used for highlighting and completion, plus a
//! tokenizer shared by both.

use crate::error::{FormulaError, Result};

/// Keywords recognized by every dialect.
const COMMON_KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CREATE", "CROSS", "DELETE",
    "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT", "EXISTS", "FALSE", "FROM", "FULL",
    "GRANT", "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS",
    "JOIN", "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER",
    "REVOKE", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TRUE", "UNION", "UPDATE", "VALUES",
    "VIEW", "WHEN", "WHERE", "WITH",
];

const MYSQL_KEYWORDS: &[&str] = &[
    "AUTO_INCREMENT", "DESCRIBE", "DUPLICATE", "ENGINE", "IGNORE", "KEY", "REGEXP", "REPLACE",
    "SHOW", "STRAIGHT_JOIN", "USE",
];

const PGSQL_KEYWORDS: &[&str] = &[
    "ILIKE", "LATERAL", "NULLS", "FIRST", "LAST", "RETURNING", "SIMILAR", "ANALYZE", "VACUUM",
];

const SQLITE_KEYWORDS: &[&str] = &["AUTOINCREMENT", "GLOB", "PRAGMA", "VACUUM", "WITHOUT"];

const MSSQL_KEYWORDS: &[&str] = &["TOP", "NOLOCK", "OUTPUT", "PIVOT", "UNPIVOT", "GO"];

/// Built-in functions, highlighted separately from keywords.
const FUNCTIONS: &[&str] = &[
    "ABS", "AVG", "CAST", "CEIL", "COALESCE", "CONCAT", "COUNT", "CURRENT_DATE",
    "CURRENT_TIMESTAMP", "FLOOR", "IFNULL", "LENGTH", "LOWER", "MAX", "MIN", "NOW", "NULLIF",
    "ROUND", "SUBSTRING", "SUM", "TRIM", "UPPER",
];

/// SQL dialects with a registered MIME name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Standard,
    MySql,
    MariaDb,
    Postgres,
    Sqlite,
    MsSql,
}

impl Dialect {
    const ALL: [(Dialect, &'static str); 6] = [
        (Dialect::Standard, "text/x-sql"),
        (Dialect::MySql, "text/x-mysql"),
        (Dialect::MariaDb, "text/x-mariadb"),
        (Dialect::Postgres, "text/x-pgsql"),
        (Dialect::Sqlite, "text/x-sqlite"),
        (Dialect::MsSql, "text/x-mssql"),
    ];

    fn extra_keywords(self) -> &'static [&'static str] {
        match self {
            Self::Standard => &[],
            Self::MySql | Self::MariaDb => MYSQL_KEYWORDS,
            Self::Postgres => PGSQL_KEYWORDS,
            Self::Sqlite => SQLITE_KEYWORDS,
            Self::MsSql => MSSQL_KEYWORDS,
        }
    }
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Builtin,
    Identifier,
    /// `"name"` or `` `name` ``.
    QuotedIdentifier,
    String,
    Number,
    Comment,
    Operator,
    Punctuation,
}

/// A token with its byte offset into the tokenized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
}

impl Token<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Returns true if this is a word token (keyword, builtin or identifier).
    pub fn is_word(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Keyword | TokenKind::Builtin | TokenKind::Identifier
        )
    }

    /// Returns true if this is the keyword `kw` (case-insensitive).
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text.eq_ignore_ascii_case(kw)
    }

    /// Identifier text without surrounding quotes.
    pub fn unquoted(&self) -> &str {
        if self.kind == TokenKind::QuotedIdentifier {
            self.text
                .trim_start_matches(['"', '`'])
                .trim_end_matches(['"', '`'])
        } else {
            self.text
        }
    }
}

/// A configured SQL mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMode {
    dialect: Dialect,
    mime: &'static str,
}

impl SqlMode {
    /// Resolves a mode from its MIME name.
    pub fn from_mime(name: &str) -> Result<Self> {
        Dialect::ALL
            .iter()
            .find(|(_, mime)| mime.eq_ignore_ascii_case(name.trim()))
            .map(|&(dialect, mime)| Self { dialect, mime })
            .ok_or_else(|| {
                FormulaError::construction(format!(
                    "Unknown mode '{}'. Expected one of: {}",
                    name,
                    Self::known_modes().join(", ")
                ))
            })
    }

    pub fn known_modes() -> Vec<&'static str> {
        Dialect::ALL.iter().map(|(_, mime)| *mime).collect()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        let upper = word.to_ascii_uppercase();
        COMMON_KEYWORDS.contains(&upper.as_str())
            || self.dialect.extra_keywords().contains(&upper.as_str())
    }

    pub fn is_builtin(&self, word: &str) -> bool {
        FUNCTIONS.contains(&word.to_ascii_uppercase().as_str())
    }

    /// Keywords followed by builtins, each group in alphabetical order.
    pub fn completion_words(&self) -> Vec<&'static str> {
        let mut keywords: Vec<&'static str> = COMMON_KEYWORDS
            .iter()
            .chain(self.dialect.extra_keywords())
            .copied()
            .collect();
        keywords.sort_unstable();
        keywords.dedup();
        keywords.extend(FUNCTIONS.iter().copied());
        keywords
    }

    /// `#` starts a line comment in MySQL and MariaDB.
    fn hash_comments(&self) -> bool {
        matches!(self.dialect, Dialect::MySql | Dialect::MariaDb)
    }

    /// Splits `text` into tokens. Whitespace is dropped; unterminated strings
    /// and comments run to the end of the text.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut chars = text.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            let rest = &text[start..];

            if c.is_whitespace() {
                chars.next();
                continue;
            }

            let (kind, len) = if rest.starts_with("--") || (c == '#' && self.hash_comments()) {
                (TokenKind::Comment, rest.find('\n').unwrap_or(rest.len()))
            } else if rest.starts_with("/*") {
                let len = rest[2..].find("*/").map(|i| i + 4).unwrap_or(rest.len());
                (TokenKind::Comment, len)
            } else if c == '\'' {
                (TokenKind::String, quoted_len(rest, '\''))
            } else if c == '"' || c == '`' {
                (TokenKind::QuotedIdentifier, quoted_len(rest, c))
            } else if c.is_ascii_digit() {
                let len = rest
                    .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                    .unwrap_or(rest.len());
                (TokenKind::Number, len)
            } else if c.is_alphabetic() || c == '_' {
                let len = rest
                    .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                    .unwrap_or(rest.len());
                let word = &rest[..len];
                let kind = if self.is_keyword(word) {
                    TokenKind::Keyword
                } else if self.is_builtin(word) {
                    TokenKind::Builtin
                } else {
                    TokenKind::Identifier
                };
                (kind, len)
            } else if let Some(op) = ["<>", "!=", "<=", ">=", "||"]
                .iter()
                .find(|op| rest.starts_with(**op))
            {
                (TokenKind::Operator, op.len())
            } else if "=<>+-*/%!|&^~".contains(c) {
                (TokenKind::Operator, c.len_utf8())
            } else {
                (TokenKind::Punctuation, c.len_utf8())
            };

            tokens.push(Token {
                kind,
                text: &rest[..len],
                start,
            });
            while chars.peek().is_some_and(|&(i, _)| i < start + len) {
                chars.next();
            }
        }

        tokens
    }
}

/// Length of a quoted run starting at `rest[0]`, doubled quotes included.
fn quoted_len(rest: &str, quote: char) -> usize {
    let mut iter = rest.char_indices().skip(1).peekable();
    while let Some((i, c)) = iter.next() {
        if c == quote {
            if iter.peek().is_some_and(|&(_, next)| next == quote) {
                iter.next();
                continue;
            }
            return i + c.len_utf8();
        }
    }
    rest.len()
}
