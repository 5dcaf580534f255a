//! Identifier unquoting for SQL query builders.
//!
//! Query builders hand us identifier tokens exactly as they will appear in the
//! generated SQL, i.e. possibly wrapped in the dialect's quote characters.
//! This module strips that quoting again so table names and aliases can be
//! compared and used as map keys.
//!
//! ## Conventions
//! - `Bracket`: SQL Server style `[name]`, no escaping inside
//! - `Symmetric(q)`: one quote character on both sides, `qq` escapes `q`
//!   (`"a""b"` → `a"b`, `` `a``b` `` → ``a`b``)
//!
//! Unquoting never fails. Malformed input (unbalanced quotes, stray brackets)
//! is stripped on a best-effort basis; validating identifiers is the
//! database's job, not ours.

mod dialect;

pub use dialect::{ParseDialectError, SqlDialect};

use serde::{Deserialize, Serialize};

/// How a SQL dialect delimits quoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotingConvention {
    /// `[identifier]`, no escape sequence.
    Bracket,
    /// The same character opens and closes; a doubled character is an escaped one.
    Symmetric(char),
}

impl QuotingConvention {
    /// ANSI double-quote convention.
    pub const DOUBLE_QUOTE: QuotingConvention = QuotingConvention::Symmetric('"');

    /// MySQL / ClickHouse backtick convention.
    pub const BACKTICK: QuotingConvention = QuotingConvention::Symmetric('`');

    /// Characters that may delimit an identifier under this convention.
    pub fn delimiters(&self) -> (char, char) {
        match self {
            QuotingConvention::Bracket => ('[', ']'),
            QuotingConvention::Symmetric(q) => (*q, *q),
        }
    }
}

impl Default for QuotingConvention {
    fn default() -> Self {
        QuotingConvention::DOUBLE_QUOTE
    }
}

/// Unquote a single identifier.
///
/// Surrounding whitespace is trimmed first. Brackets are stripped
/// independently, so `[name` and `name]` both yield `name`.
///
/// # Examples
/// ```
/// use tableref::identifier::{unquote, QuotingConvention};
///
/// assert_eq!(unquote(" [Users] ", QuotingConvention::Bracket), "Users");
/// assert_eq!(unquote(r#""a""b""#, QuotingConvention::DOUBLE_QUOTE), r#"a"b"#);
/// assert_eq!(unquote("pages", QuotingConvention::BACKTICK), "pages");
/// ```
pub fn unquote(identifier: &str, convention: QuotingConvention) -> String {
    let identifier = identifier.trim();
    let (open, close) = convention.delimiters();

    let stripped = identifier.strip_prefix(open).unwrap_or(identifier);
    let stripped = stripped.strip_suffix(close).unwrap_or(stripped);

    match convention {
        QuotingConvention::Bracket => stripped.to_string(),
        QuotingConvention::Symmetric(quote) => collapse_doubled(stripped, quote),
    }
}

/// Replace every `qq` with `q`, scanning left to right without overlap.
fn collapse_doubled(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == quote && chars.peek() == Some(&quote) {
            chars.next();
        }
    }

    out
}
