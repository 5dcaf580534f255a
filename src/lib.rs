//! tableref - table alias resolution for SQL query builders
//!
//! This crate recovers the tables a query reads from its FROM and JOIN parts:
//! - Identifier unquoting per SQL dialect (brackets, double quotes, backticks)
//! - Alias → table maps over builder-supplied query parts
//! - Alias prefix filtering (e.g. language overlay joins)
//! - A GraphQL resolver contract and a resolver exposing the above
//! - An HTTP service wrapping it all

pub mod config;
pub mod graphql;
pub mod identifier;
pub mod query_parts;
pub mod server;
pub mod table_map;
