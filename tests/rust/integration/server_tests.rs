use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tableref::{config::ServerConfig, identifier::SqlDialect};

use super::support::{app, app_with, post_json, send};

#[tokio::test]
async fn test_health_check() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "tableref");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unquote_uses_requested_dialect() {
    let (status, body) = post_json(
        app(),
        "/identifiers/unquote",
        json!({"identifier": " [Users] ", "dialect": "sqlserver"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unquoted"], "Users");
    assert_eq!(body["dialect"], "sqlserver");
}

#[tokio::test]
async fn test_unquote_falls_back_to_configured_dialect() {
    let config = ServerConfig {
        default_dialect: SqlDialect::MySQL,
        ..Default::default()
    };
    let (status, body) = post_json(
        app_with(config),
        "/identifiers/unquote",
        json!({"identifier": "`we``ird`"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unquoted"], "we`ird");
    assert_eq!(body["dialect"], "mysql");
}

#[tokio::test]
async fn test_unknown_dialect_is_rejected() {
    let (status, body) = post_json(
        app(),
        "/identifiers/unquote",
        json!({"identifier": "pages", "dialect": "oracle"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "UnsupportedDialectError");
    assert!(body["hint"].as_str().unwrap().contains("sqlserver"));
}

fn overlay_query() -> serde_json::Value {
    json!({
        "from": [{"table": "\"pages\"", "alias": "\"p\""}],
        "join": [{
            "from_alias": "p",
            "joins": [
                {"table": "\"pages\"", "alias": "\"language_overlay_1\""},
                {"table": "\"pages\"", "alias": "\"language_overlay_0\""},
                {"table": "\"sys_category\""}
            ]
        }]
    })
}

#[tokio::test]
async fn test_tables_all_scope() {
    let (status, body) = post_json(
        app(),
        "/tables",
        json!({"query_parts": overlay_query()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scope"], "all");
    assert_eq!(body["ordered"], false);
    assert_eq!(
        body["tables"],
        json!({
            "p": "pages",
            "language_overlay_1": "pages",
            "language_overlay_0": "pages",
            "sys_category": "sys_category"
        })
    );
}

#[tokio::test]
async fn test_tables_join_scope() {
    let (status, body) = post_json(
        app(),
        "/tables",
        json!({"query_parts": overlay_query(), "scope": "join"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["tables"].get("p").is_none());
    assert_eq!(body["tables"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_tables_prefix_is_ordered() {
    let (status, body) = post_json(
        app(),
        "/tables",
        json!({"query_parts": overlay_query(), "prefix": "language_overlay"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ordered"], true);
    let aliases: Vec<&String> = body["tables"].as_object().unwrap().keys().collect();
    assert_eq!(aliases, vec!["language_overlay_0", "language_overlay_1"]);
}

#[tokio::test]
async fn test_tables_language_overlays_use_configured_prefix() {
    let config = ServerConfig {
        overlay_prefix: "language_overlay_1".to_string(),
        ..Default::default()
    };
    let (status, body) = post_json(
        app_with(config),
        "/tables",
        json!({"query_parts": overlay_query(), "language_overlays": true}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tables"], json!({"language_overlay_1": "pages"}));
}

#[tokio::test]
async fn test_tables_invalid_scope() {
    let (status, body) = post_json(
        app(),
        "/tables",
        json!({"query_parts": overlay_query(), "scope": "where"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "InvalidScopeError");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let config = ServerConfig {
        max_body_bytes: 1024,
        ..Default::default()
    };
    let padding = "x".repeat(4096);
    let (status, _) = post_json(
        app_with(config),
        "/identifiers/unquote",
        json!({"identifier": padding}),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
