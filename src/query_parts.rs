//! FROM / JOIN parts as a query builder hands them to us.
//!
//! We never parse SQL text. The builder already knows which token is a table
//! and which is an alias; it only quotes them for the target platform. These
//! types carry that pre-segmented data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One FROM or JOIN entry: a raw (possibly quoted) table name and alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseReference {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ClauseReference {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_alias(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: Some(alias.into()),
        }
    }
}

/// Joins chained against the same FROM alias.
///
/// Query builders group joins by the alias they hang off, so a single group
/// can carry several join operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGroup {
    pub from_alias: String,
    pub joins: Vec<ClauseReference>,
}

impl AsRef<[ClauseReference]> for JoinGroup {
    fn as_ref(&self) -> &[ClauseReference] {
        &self.joins
    }
}

/// The FROM and JOIN parts of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParts {
    #[serde(default)]
    pub from: Vec<ClauseReference>,
    #[serde(default)]
    pub join: Vec<JoinGroup>,
}

impl QueryParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a FROM entry.
    pub fn from(mut self, table: impl Into<String>, alias: Option<&str>) -> Self {
        self.from.push(ClauseReference {
            table: table.into(),
            alias: alias.map(str::to_string),
        });
        self
    }

    /// Add a JOIN against `from_alias`.
    ///
    /// Appends to the existing group for `from_alias`, or opens a new group
    /// after all existing ones.
    pub fn join(
        mut self,
        from_alias: impl Into<String>,
        table: impl Into<String>,
        alias: Option<&str>,
    ) -> Self {
        let from_alias = from_alias.into();
        let clause = ClauseReference {
            table: table.into(),
            alias: alias.map(str::to_string),
        };

        match self.join.iter_mut().find(|g| g.from_alias == from_alias) {
            Some(group) => group.joins.push(clause),
            None => self.join.push(JoinGroup {
                from_alias,
                joins: vec![clause],
            }),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.join.iter().all(|g| g.joins.is_empty())
    }
}

/// Which query parts to inspect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryScope {
    From,
    Join,
    #[default]
    #[serde(alias = "both")]
    All,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown query scope: '{0}' (expected from, join or all)")]
pub struct ParseScopeError(pub String);

impl QueryScope {
    pub fn includes_from(&self) -> bool {
        matches!(self, QueryScope::From | QueryScope::All)
    }

    pub fn includes_join(&self) -> bool {
        matches!(self, QueryScope::Join | QueryScope::All)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryScope::From => "from",
            QueryScope::Join => "join",
            QueryScope::All => "all",
        }
    }
}

impl fmt::Display for QueryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryScope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "from" => Ok(QueryScope::From),
            "join" => Ok(QueryScope::Join),
            "all" | "both" => Ok(QueryScope::All),
            _ => Err(ParseScopeError(s.to_string())),
        }
    }
}
