//! GraphQL field resolution contract.
//!
//! A resolver produces the value of one field: it receives the parent value,
//! the field arguments, the ambient request context and information about the
//! field being resolved. It may return an object or an explicit absence.
//!
//! The execution engine itself (schema, validation, traversal) lives
//! elsewhere; this module only pins down the contract and ships the resolvers
//! backed by table alias resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod queried_tables;

pub use queried_tables::QueriedTablesResolver;

/// Argument values keyed by argument name.
pub type Arguments = Map<String, Value>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolverError {
    #[error("Unknown argument '{argument}' on field '{field}'")]
    UnknownArgument { field: String, argument: String },

    #[error("Missing required argument '{argument}' on field '{field}'")]
    MissingArgument { field: String, argument: String },

    #[error("Invalid value for argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Malformed source value: {0}")]
    MalformedSource(String),
}

/// Information about the field currently being resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveInfo {
    pub field_name: String,
    #[serde(default)]
    pub parent_type: Option<String>,
    /// Response path from the root, e.g. `["pages", "0", "tables"]`
    #[serde(default)]
    pub path: Vec<String>,
}

impl ResolveInfo {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            ..Default::default()
        }
    }
}

/// Request-scoped values shared by all resolvers of one execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolveContext(HashMap<String, Value>);

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<HashMap<String, Value>> for ResolveContext {
    fn from(values: HashMap<String, Value>) -> Self {
        Self(values)
    }
}

/// A declared field argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    pub name: String,
    /// GraphQL type name, e.g. `String` or `String!`
    pub type_name: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentDefinition {
    pub fn optional(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            required: false,
            default_value: None,
            description: None,
        }
    }

    pub fn required(name: &str, type_name: &str) -> Self {
        Self {
            required: true,
            type_name: format!("{}!", type_name),
            ..Self::optional(name, type_name)
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Value of the field, or `None` when the field resolves to null.
    async fn resolve(
        &self,
        source: Option<&Value>,
        arguments: &Arguments,
        context: &ResolveContext,
        info: &ResolveInfo,
    ) -> Result<Option<Map<String, Value>>, ResolverError>;

    /// Arguments this field accepts.
    fn arguments(&self) -> Vec<ArgumentDefinition>;

    /// Reject arguments that are not declared and required ones that are missing.
    fn validate_arguments(
        &self,
        arguments: &Arguments,
        info: &ResolveInfo,
    ) -> Result<(), ResolverError> {
        let declared = self.arguments();

        if let Some(unknown) = arguments
            .keys()
            .find(|name| !declared.iter().any(|d| &d.name == *name))
        {
            return Err(ResolverError::UnknownArgument {
                field: info.field_name.clone(),
                argument: unknown.clone(),
            });
        }

        if let Some(missing) = declared
            .iter()
            .find(|d| d.required && arguments.get(&d.name).is_none_or(Value::is_null))
        {
            return Err(ResolverError::MissingArgument {
                field: info.field_name.clone(),
                argument: missing.name.clone(),
            });
        }

        Ok(())
    }
}

/// Read an optional string argument, falling back to its declared default.
pub(crate) fn string_argument<'a>(
    arguments: &'a Arguments,
    declared: &'a [ArgumentDefinition],
    name: &str,
) -> Result<Option<&'a str>, ResolverError> {
    let value = arguments.get(name).filter(|v| !v.is_null()).or_else(|| {
        declared
            .iter()
            .find(|d| d.name == name)
            .and_then(|d| d.default_value.as_ref())
    });

    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ResolverError::InvalidArgument {
            argument: name.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}
