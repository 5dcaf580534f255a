use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    graphql::{ResolveContext, ResolveInfo, Resolver, ResolverError},
    identifier::{unquote, SqlDialect},
    query_parts::QueryScope,
    table_map::queried_tables,
};

use super::{
    models::{
        ErrorResponse, ResolveRequest, ResolveResponse, TablesRequest, TablesResponse,
        UnquoteRequest, UnquoteResponse,
    },
    AppState,
};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String, error_type: &str, hint: Option<&str>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error,
            error_type: error_type.to_string(),
            hint: hint.map(str::to_string),
        }),
    )
}

fn parse_dialect(requested: Option<&str>, state: &AppState) -> Result<SqlDialect, HandlerError> {
    match requested {
        None => Ok(state.config.default_dialect),
        Some(name) => name.parse().map_err(|e: crate::identifier::ParseDialectError| {
            let supported: Vec<&str> = SqlDialect::ALL.iter().map(|d| d.as_str()).collect();
            bad_request(
                e.to_string(),
                "UnsupportedDialectError",
                Some(&format!("Supported dialects: {}", supported.join(", "))),
            )
        }),
    }
}

fn parse_scope(requested: Option<&str>) -> Result<QueryScope, HandlerError> {
    match requested {
        None => Ok(QueryScope::All),
        Some(name) => name
            .parse()
            .map_err(|e: crate::query_parts::ParseScopeError| {
                bad_request(e.to_string(), "InvalidScopeError", None)
            }),
    }
}

/// Serialize a table map into the JSON object carried by `TablesResponse`.
fn table_object<T: Serialize>(tables: T) -> Result<Map<String, Value>, HandlerError> {
    let error = match serde_json::to_value(tables) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => format!("table map serialized to a non-object: {}", other),
        Err(e) => e.to_string(),
    };

    log::error!("Failed to serialize table map: {}", error);
    Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error,
            error_type: "SerializationError".to_string(),
            hint: None,
        }),
    ))
}

/// Simple health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "tableref",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handler for POST /identifiers/unquote
pub async fn unquote_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UnquoteRequest>,
) -> Result<Json<UnquoteResponse>, HandlerError> {
    let dialect = parse_dialect(payload.dialect.as_deref(), &app_state)?;
    let unquoted = unquote(&payload.identifier, dialect.quoting_convention());

    log::debug!(
        "Unquoted identifier {:?} -> {:?} ({})",
        payload.identifier,
        unquoted,
        dialect
    );

    Ok(Json(UnquoteResponse {
        identifier: payload.identifier,
        unquoted,
        dialect: dialect.as_str().to_string(),
    }))
}

/// Handler for POST /tables - alias → table map of the given query parts
pub async fn tables_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<TablesRequest>,
) -> Result<Json<TablesResponse>, HandlerError> {
    let dialect = parse_dialect(payload.dialect.as_deref(), &app_state)?;
    let scope = parse_scope(payload.scope.as_deref())?;

    let tables = queried_tables(&payload.query_parts, dialect, scope);

    let prefix = match (&payload.prefix, payload.language_overlays) {
        (Some(prefix), _) => Some(prefix.as_str()),
        (None, true) => Some(app_state.config.overlay_prefix.as_str()),
        (None, false) => None,
    };

    let (tables, ordered) = match prefix {
        Some(prefix) => (table_object(tables.filter_by_prefix(prefix))?, true),
        None => (table_object(&tables)?, false),
    };

    log::debug!(
        "Resolved {} table reference(s) ({}, scope {}, ordered={})",
        tables.len(),
        dialect,
        scope,
        ordered
    );

    Ok(Json(TablesResponse {
        dialect: dialect.as_str().to_string(),
        scope: scope.as_str().to_string(),
        tables,
        ordered,
    }))
}

/// Handler for POST /resolve - run the queried-tables field resolver
pub async fn resolve_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, HandlerError> {
    let info = ResolveInfo {
        field_name: payload.field_name,
        parent_type: payload.parent_type,
        path: payload.path,
    };
    let context = ResolveContext::from(payload.context);

    let data = app_state
        .resolver
        .resolve(payload.source.as_ref(), &payload.arguments, &context, &info)
        .await
        .map_err(|e| {
            log::warn!("Resolver failed for field '{}': {}", info.field_name, e);
            let error_type = match e {
                ResolverError::UnknownArgument { .. } => "UnknownArgument",
                ResolverError::MissingArgument { .. } => "MissingArgument",
                ResolverError::InvalidArgument { .. } => "InvalidArgument",
                ResolverError::MalformedSource(_) => "MalformedSource",
            };
            bad_request(e.to_string(), error_type, None)
        })?;

    Ok(Json(ResolveResponse { data }))
}
