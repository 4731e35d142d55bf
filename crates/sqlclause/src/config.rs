use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use serde::{Deserialize, Deserializer};

/// Rendering configuration shared by every clause of a statement.
///
/// # Example
///
/// ```
/// use sqlclause::{BuilderConfig, Dialect};
///
/// let config = BuilderConfig::from_toml_str(
///     r#"
/// schema = "gg"
/// dialect = "postgresql"
/// delimiter = " "
/// "#,
/// )
/// .unwrap();
/// assert_eq!(config.schema.as_deref(), Some("gg"));
/// assert_eq!(config.dialect, Dialect::Postgres);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuilderConfig {
    /// Schema used to qualify table names. `None` means no qualification.
    #[serde(default, deserialize_with = "non_empty")]
    pub schema: Option<String>,
    /// Target dialect.
    #[serde(default)]
    pub dialect: Dialect,
    /// Separator emitted between clause groups (default `"\n"`).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    "\n".to_string()
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            schema: None,
            dialect: Dialect::Default,
            delimiter: default_delimiter(),
        }
    }
}

impl BuilderConfig {
    /// Create a configuration with defaults (no schema, default dialect, newline delimiter).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document with optional `schema`, `dialect` and `delimiter` keys.
    pub fn from_toml_str(raw: &str) -> SqlResult<Self> {
        toml::from_str(raw).map_err(|e| SqlError::config(format!("failed to parse config: {e}")))
    }

    /// Set the schema used to qualify table names. An empty name disables qualification.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        self.schema = (!schema.is_empty()).then_some(schema);
        self
    }

    /// Set the dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the clause delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// `schema.table`, or just `table` when no schema is configured.
    pub fn qualify(&self, table: &str) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{table}"),
            None => table.to_string(),
        }
    }
}
