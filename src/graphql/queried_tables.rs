use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{
    string_argument, ArgumentDefinition, Arguments, ResolveContext, ResolveInfo, Resolver,
    ResolverError,
};
use crate::identifier::SqlDialect;
use crate::query_parts::{QueryParts, QueryScope};
use crate::table_map::queried_tables;

/// Context key holding the query parts when the field has no parent value.
pub const QUERY_PARTS_CONTEXT_KEY: &str = "queryParts";

/// Resolves a field to the alias → table map of the query being built.
///
/// The query parts come from the parent value, or from the request context
/// under [`QUERY_PARTS_CONTEXT_KEY`] for root fields.
#[derive(Debug, Clone, Default)]
pub struct QueriedTablesResolver {
    default_dialect: SqlDialect,
}

impl QueriedTablesResolver {
    pub fn new(default_dialect: SqlDialect) -> Self {
        Self { default_dialect }
    }

    fn query_parts(
        source: Option<&Value>,
        context: &ResolveContext,
    ) -> Result<Option<QueryParts>, ResolverError> {
        let raw = match source.filter(|v| !v.is_null()) {
            Some(value) => value,
            None => match context.get(QUERY_PARTS_CONTEXT_KEY) {
                Some(value) if !value.is_null() => value,
                _ => return Ok(None),
            },
        };

        QueryParts::deserialize(raw)
            .map(Some)
            .map_err(|e| ResolverError::MalformedSource(e.to_string()))
    }
}

#[async_trait]
impl Resolver for QueriedTablesResolver {
    async fn resolve(
        &self,
        source: Option<&Value>,
        arguments: &Arguments,
        context: &ResolveContext,
        info: &ResolveInfo,
    ) -> Result<Option<Map<String, Value>>, ResolverError> {
        self.validate_arguments(arguments, info)?;
        let declared = self.arguments();

        let dialect = match string_argument(arguments, &declared, "dialect")? {
            Some(name) => name
                .parse::<SqlDialect>()
                .map_err(|e| ResolverError::InvalidArgument {
                    argument: "dialect".to_string(),
                    reason: e.to_string(),
                })?,
            None => self.default_dialect,
        };

        let scope = match string_argument(arguments, &declared, "scope")? {
            Some(name) => name
                .parse::<QueryScope>()
                .map_err(|e| ResolverError::InvalidArgument {
                    argument: "scope".to_string(),
                    reason: e.to_string(),
                })?,
            None => QueryScope::All,
        };

        let prefix = string_argument(arguments, &declared, "prefix")?;

        let Some(parts) = Self::query_parts(source, context)? else {
            log::debug!(
                "No query parts available for field '{}', resolving to null",
                info.field_name
            );
            return Ok(None);
        };

        let tables = queried_tables(&parts, dialect, scope);
        log::debug!(
            "Field '{}' resolved {} table reference(s) ({}, scope {})",
            info.field_name,
            tables.len(),
            dialect,
            scope
        );

        let value = match prefix {
            Some(prefix) => json!(tables.filter_by_prefix(prefix)),
            None => json!(tables),
        };

        match value {
            Value::Object(map) => Ok(Some(map)),
            _ => Ok(None),
        }
    }

    fn arguments(&self) -> Vec<ArgumentDefinition> {
        vec![
            ArgumentDefinition::optional("dialect", "String")
                .with_default(json!(self.default_dialect.as_str()))
                .with_description("Platform whose identifier quoting is undone"),
            ArgumentDefinition::optional("scope", "String")
                .with_default(json!(QueryScope::All.as_str()))
                .with_description("Query parts to inspect: from, join or all"),
            ArgumentDefinition::optional("prefix", "String")
                .with_description("Only aliases starting with this prefix, in alias order"),
        ]
    }
}
