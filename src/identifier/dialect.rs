use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::QuotingConvention;

/// Database platform whose identifier quoting we need to undo.
/// Deserialized through [`FromStr`], so names are case-insensitive and
/// accept the same aliases as `parse`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SqlDialect {
    #[serde(rename = "postgresql")]
    #[default]
    PostgreSQL,

    #[serde(rename = "mysql")]
    MySQL,

    #[serde(rename = "mariadb")]
    MariaDB,

    #[serde(rename = "sqlite")]
    SQLite,

    #[serde(rename = "sqlserver")]
    SqlServer,

    #[serde(rename = "clickhouse")]
    ClickHouse,

    #[serde(rename = "duckdb")]
    DuckDB,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown SQL dialect: '{0}'")]
pub struct ParseDialectError(pub String);

impl SqlDialect {
    pub const ALL: [SqlDialect; 7] = [
        SqlDialect::PostgreSQL,
        SqlDialect::MySQL,
        SqlDialect::MariaDB,
        SqlDialect::SQLite,
        SqlDialect::SqlServer,
        SqlDialect::ClickHouse,
        SqlDialect::DuckDB,
    ];

    /// Get the string representation of the dialect
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::PostgreSQL => "postgresql",
            SqlDialect::MySQL => "mysql",
            SqlDialect::MariaDB => "mariadb",
            SqlDialect::SQLite => "sqlite",
            SqlDialect::SqlServer => "sqlserver",
            SqlDialect::ClickHouse => "clickhouse",
            SqlDialect::DuckDB => "duckdb",
        }
    }

    /// The identifier quoting this platform emits.
    ///
    /// SQL Server is the only bracket dialect; everything else quotes with a
    /// single symmetric character.
    pub fn quoting_convention(&self) -> QuotingConvention {
        match self {
            SqlDialect::SqlServer => QuotingConvention::Bracket,
            SqlDialect::MySQL | SqlDialect::MariaDB | SqlDialect::ClickHouse => {
                QuotingConvention::BACKTICK
            }
            SqlDialect::PostgreSQL | SqlDialect::SQLite | SqlDialect::DuckDB => {
                QuotingConvention::DOUBLE_QUOTE
            }
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlDialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(SqlDialect::PostgreSQL),
            "mysql" => Ok(SqlDialect::MySQL),
            "mariadb" => Ok(SqlDialect::MariaDB),
            "sqlite" => Ok(SqlDialect::SQLite),
            "sqlserver" | "mssql" => Ok(SqlDialect::SqlServer),
            "clickhouse" => Ok(SqlDialect::ClickHouse),
            "duckdb" => Ok(SqlDialect::DuckDB),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}

impl TryFrom<String> for SqlDialect {
    type Error = ParseDialectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SqlDialect> for QuotingConvention {
    fn from(dialect: SqlDialect) -> Self {
        dialect.quoting_convention()
    }
}
