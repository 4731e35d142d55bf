//! SQL dialects and the few text snippets that differ between them.

use crate::error::{SqlError, SqlResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target SQL dialect.
///
/// The dialect only affects paging syntax, string concatenation and the
/// positional marker used when binding named placeholders.
///
/// Serde goes through [`FromStr`] and [`Dialect::as_str`], so configuration
/// files accept the same case-insensitive names as `str::parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    /// Generic SQL: `OFFSET n LIMIT m` after ORDER BY, `CONCAT(...)`.
    #[default]
    Default,
    /// PostgreSQL: `OFFSET n LIMIT m` after ORDER BY, `a||b`, `$n` markers.
    Postgres,
    /// SQL Server: `TOP m OFFSET n` right after `SELECT`.
    SqlServer,
}

impl Dialect {
    /// Whether paging is emitted directly after `SELECT`, before the column list.
    pub fn paging_before_columns(self) -> bool {
        matches!(self, Dialect::SqlServer)
    }

    /// Render the paging fragment for this dialect.
    pub fn paging(self, offset: u64, page_size: u32) -> String {
        match self {
            Dialect::SqlServer => format!("TOP {page_size} OFFSET {offset}"),
            Dialect::Default | Dialect::Postgres => format!("OFFSET {offset} LIMIT {page_size}"),
        }
    }

    /// Membership test against a named list parameter: `col IN (:param)`.
    pub fn in_list(self, column: &str, param: &str) -> String {
        format!("{column} IN (:{param})")
    }

    /// String concatenation of SQL terms.
    pub fn concat<S: AsRef<str>>(self, terms: &[S]) -> String {
        let terms: Vec<&str> = terms.iter().map(AsRef::as_ref).collect();
        match self {
            Dialect::Postgres => terms.join("||"),
            Dialect::Default | Dialect::SqlServer => format!("CONCAT({})", terms.join(",")),
        }
    }

    /// Positional marker for the `index`-th (1-based) bound value.
    pub(crate) fn positional_marker(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Default | Dialect::SqlServer => "?".to_string(),
        }
    }

    /// Canonical configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Default => "default",
            Dialect::Postgres => "postgres",
            Dialect::SqlServer => "sql_server",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    fn from_str(s: &str) -> SqlResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "sqlite" => Ok(Dialect::Default),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mssql" | "sqlserver" | "sql_server" => Ok(Dialect::SqlServer),
            other => Err(SqlError::config(format!("unknown dialect '{other}'"))),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = SqlError;

    fn try_from(value: String) -> SqlResult<Self> {
        value.parse()
    }
}

impl From<Dialect> for String {
    fn from(dialect: Dialect) -> Self {
        dialect.as_str().to_string()
    }
}
