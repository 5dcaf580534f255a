//! Alias → table resolution through the public API

use std::collections::HashMap;

use tableref::identifier::{QuotingConvention, SqlDialect};
use tableref::query_parts::{ClauseReference, QueryParts, QueryScope};
use tableref::table_map::{
    extract_table_references, filter_by_prefix, filter_language_overlay_tables, queried_tables,
    ResolvedTableMap,
};

fn hash_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(a, t)| (a.to_string(), t.to_string()))
        .collect()
}

#[test]
fn test_single_from_without_alias() {
    let joins: Vec<Vec<ClauseReference>> = vec![];
    let tables = extract_table_references(
        &[ClauseReference::new("pages")],
        &joins,
        QuotingConvention::Symmetric('"'),
        QueryScope::From,
    );
    assert_eq!(tables.into_inner(), hash_map(&[("pages", "pages")]));
}

#[test]
fn test_from_and_join_aliases() {
    let tables = extract_table_references(
        &[ClauseReference::with_alias("pages", "p")],
        &[vec![ClauseReference::with_alias(
            "language_overlay_pages",
            "lop",
        )]],
        QuotingConvention::Symmetric('"'),
        QueryScope::All,
    );
    assert_eq!(
        tables.into_inner(),
        hash_map(&[("p", "pages"), ("lop", "language_overlay_pages")])
    );
}

#[test]
fn test_join_wins_over_from_on_shared_alias() {
    let tables = extract_table_references(
        &[ClauseReference::with_alias("a", "x")],
        &[vec![ClauseReference::with_alias("b", "x")]],
        QuotingConvention::Symmetric('"'),
        QueryScope::All,
    );
    assert_eq!(tables.into_inner(), hash_map(&[("x", "b")]));
}

#[test]
fn test_later_join_group_wins_over_earlier_one() {
    let parts = QueryParts::new()
        .from("pages", Some("p"))
        .join("p", "sys_category", Some("c"))
        .join("x", "sys_file", Some("c"));

    let tables = queried_tables(&parts, SqlDialect::PostgreSQL, QueryScope::Join);
    assert_eq!(tables.table_for("c"), Some("sys_file"));
    assert!(!tables.contains_alias("p"));
}

#[test]
fn test_join_scope_ignores_colliding_from_alias() {
    let parts = QueryParts::new()
        .from("\"pages\"", Some("\"x\""))
        .from("\"tt_content\"", None)
        .join("x", "\"sys_file_reference\"", Some("\"x\""));

    let join_only = queried_tables(&parts, SqlDialect::PostgreSQL, QueryScope::Join);
    assert_eq!(
        join_only.into_inner(),
        hash_map(&[("x", "sys_file_reference")])
    );

    let from_only = queried_tables(&parts, SqlDialect::PostgreSQL, QueryScope::From);
    assert_eq!(
        from_only.into_inner(),
        hash_map(&[("x", "pages"), ("tt_content", "tt_content")])
    );
}

#[test]
fn test_filter_by_prefix_example() {
    let tables = ResolvedTableMap::from(hash_map(&[
        ("language_overlay_1", "t1"),
        ("other", "t2"),
        ("language_overlay_0", "t3"),
    ]));

    let filtered = filter_by_prefix(&tables, "language_overlay");
    assert_eq!(
        filtered.to_vec(),
        vec![
            ("language_overlay_0".to_string(), "t3".to_string()),
            ("language_overlay_1".to_string(), "t1".to_string()),
        ]
    );
    assert_eq!(filter_language_overlay_tables(&tables), filtered);
}

#[test]
fn test_filter_with_empty_prefix_keeps_everything_sorted() {
    let tables = ResolvedTableMap::from(hash_map(&[("b", "t2"), ("a", "t1")]));
    let filtered = filter_by_prefix(&tables, "");
    let aliases: Vec<&str> = filtered.aliases().collect();
    assert_eq!(aliases, vec!["a", "b"]);
}

#[test]
fn test_sql_server_overlay_query() {
    let parts = QueryParts::new()
        .from("[pages]", Some("[pages]"))
        .join("pages", "[pages]", Some("[language_overlay_2]"))
        .join("pages", "[pages]", Some("[language_overlay_1]"))
        .join("pages", "[sys_workspace]", Some("[ws]"));

    let tables = queried_tables(&parts, SqlDialect::SqlServer, QueryScope::All);
    assert_eq!(tables.len(), 4);

    let overlays = filter_language_overlay_tables(&tables);
    let aliases: Vec<&str> = overlays.aliases().collect();
    assert_eq!(aliases, vec!["language_overlay_1", "language_overlay_2"]);
    assert!(overlays.iter().all(|(_, table)| table == "pages"));
}

#[test]
fn test_resolved_map_serializes_as_plain_object() {
    let parts = QueryParts::new().from("`pages`", Some("`p`"));
    let tables = queried_tables(&parts, SqlDialect::MySQL, QueryScope::All);
    assert_eq!(
        serde_json::to_value(&tables).unwrap(),
        serde_json::json!({"p": "pages"})
    );
}
