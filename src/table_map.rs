//! Alias → table resolution over query builder parts.
//!
//! Given the FROM and JOIN entries of a query, build the mapping from each
//! alias to the canonical (unquoted) table name it refers to. GraphQL field
//! resolvers use this to find which SQL alias backs a field, e.g. all the
//! `language_overlay*` joins added for translated records.
//!
//! Everything here is a pure function of its arguments.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::identifier::{unquote, QuotingConvention, SqlDialect};
use crate::query_parts::{ClauseReference, QueryParts, QueryScope};

/// Alias prefix used for language overlay joins.
pub const LANGUAGE_OVERLAY_PREFIX: &str = "language_overlay";

/// Alias → canonical table name. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedTableMap(HashMap<String, String>);

impl ResolvedTableMap {
    pub fn table_for(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.0.contains_key(alias)
    }

    /// All aliases bound to `table`, sorted.
    pub fn aliases_of(&self, table: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .0
            .iter()
            .filter(|(_, t)| t.as_str() == table)
            .map(|(a, _)| a.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }

    /// Entries whose alias starts with `prefix`, in ascending alias order.
    pub fn filter_by_prefix(&self, prefix: &str) -> OrderedTableMap {
        filter_by_prefix(self, prefix)
    }
}

impl From<HashMap<String, String>> for ResolvedTableMap {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<A: Into<String>, T: Into<String>> FromIterator<(A, T)> for ResolvedTableMap {
    fn from_iter<I: IntoIterator<Item = (A, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(a, t)| (a.into(), t.into()))
                .collect(),
        )
    }
}

/// Alias → canonical table name in ascending byte-wise alias order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedTableMap(BTreeMap<String, String>);

impl OrderedTableMap {
    pub fn table_for(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(a, t)| (a.clone(), t.clone())).collect()
    }
}

/// Build the alias → table map for the selected query parts.
///
/// FROM entries are visited first, then each join group in order. An entry
/// without alias is keyed by its own table name. When two entries share a key
/// the later one wins.
pub fn extract_table_references<J>(
    from: &[ClauseReference],
    joins: &[J],
    convention: QuotingConvention,
    scope: QueryScope,
) -> ResolvedTableMap
where
    J: AsRef<[ClauseReference]>,
{
    let mut tables = HashMap::new();

    if scope.includes_from() {
        for clause in from {
            insert_clause(&mut tables, clause, convention);
        }
    }

    if scope.includes_join() {
        for group in joins {
            for clause in group.as_ref() {
                insert_clause(&mut tables, clause, convention);
            }
        }
    }

    ResolvedTableMap(tables)
}

fn insert_clause(
    tables: &mut HashMap<String, String>,
    clause: &ClauseReference,
    convention: QuotingConvention,
) {
    let table = unquote(&clause.table, convention);
    // An alias that unquotes to nothing counts as no alias
    let alias = clause
        .alias
        .as_deref()
        .map(|alias| unquote(alias, convention))
        .filter(|alias| !alias.is_empty())
        .unwrap_or_else(|| table.clone());

    log::trace!("Resolved table reference '{}' -> '{}'", alias, table);

    if let Some(previous) = tables.insert(alias.clone(), table) {
        log::debug!(
            "Alias '{}' rebound: '{}' replaced by a later clause",
            alias,
            previous
        );
    }
}

/// Keep entries whose alias starts with `prefix` (case-sensitive).
pub fn filter_by_prefix(tables: &ResolvedTableMap, prefix: &str) -> OrderedTableMap {
    OrderedTableMap(
        tables
            .0
            .iter()
            .filter(|(alias, _)| alias.starts_with(prefix))
            .map(|(a, t)| (a.clone(), t.clone()))
            .collect(),
    )
}

/// Tables referenced by `parts`, unquoted with the dialect's convention.
pub fn queried_tables(
    parts: &QueryParts,
    dialect: SqlDialect,
    scope: QueryScope,
) -> ResolvedTableMap {
    extract_table_references(
        &parts.from,
        &parts.join,
        dialect.quoting_convention(),
        scope,
    )
}

/// Language overlay joins in ascending alias order.
pub fn filter_language_overlay_tables(tables: &ResolvedTableMap) -> OrderedTableMap {
    filter_by_prefix(tables, LANGUAGE_OVERLAY_PREFIX)
}
