use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::query_parts::QueryParts;

#[derive(Debug, Deserialize)]
pub struct UnquoteRequest {
    pub identifier: String,
    /// Dialect name (e.g. "postgresql", "sqlserver"); server default if absent
    pub dialect: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnquoteResponse {
    pub identifier: String,
    pub unquoted: String,
    pub dialect: String,
}

#[derive(Debug, Deserialize)]
pub struct TablesRequest {
    pub query_parts: QueryParts,
    pub dialect: Option<String>,
    /// "from", "join" or "all" (default)
    pub scope: Option<String>,
    /// Keep only aliases with this prefix, ordered by alias
    pub prefix: Option<String>,
    /// Shorthand for `prefix` = the configured overlay prefix
    #[serde(default)]
    pub language_overlays: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TablesResponse {
    pub dialect: String,
    pub scope: String,
    pub tables: Map<String, Value>,
    /// True when `tables` is ordered by alias
    pub ordered: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub field_name: String,
    pub parent_type: Option<String>,
    #[serde(default)]
    pub path: Vec<String>,
    pub source: Option<Value>,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub context: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
