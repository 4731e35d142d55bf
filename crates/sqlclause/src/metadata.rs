//! Table metadata lookups.
//!
//! Column lists are resolved at render time, never cached by the builder, so a
//! rendered statement always reflects what the provider reports at that moment.

use crate::error::MetadataError;
use std::collections::HashMap;
use std::sync::Arc;

/// Source of column metadata.
pub trait MetadataProvider {
    /// Ordered column names currently defined for `table` in `schema`.
    fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError>;
}

impl<T: MetadataProvider + ?Sized> MetadataProvider for &T {
    fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError> {
        (**self).columns_of(schema, table)
    }
}

impl<T: MetadataProvider + ?Sized> MetadataProvider for Arc<T> {
    fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError> {
        (**self).columns_of(schema, table)
    }
}

/// Column layout of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Schema name. `None` matches lookups for any schema.
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
    /// Column names in definition order.
    pub columns: Vec<String>,
}

impl TableSchema {
    /// Create a table with no schema and no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Restrict this table to one schema.
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Append columns in order.
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Append one column.
    pub fn add_column(&mut self, name: impl Into<String>) {
        self.columns.push(name.into());
    }

    /// Check if this table has a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// In-memory metadata registry.
///
/// # Example
///
/// ```
/// use sqlclause::{MetadataProvider, StaticMetadata, TableSchema};
///
/// let mut meta = StaticMetadata::new();
/// meta.register(TableSchema::new("users").with_columns(&["id", "name"]));
///
/// let cols = meta.columns_of(Some("public"), "users").unwrap();
/// assert_eq!(cols, vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    /// table name -> definitions (one per schema, or a single schema-less one)
    tables: HashMap<String, Vec<TableSchema>>,
}

impl StaticMetadata {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any previous definition for the same schema and name.
    pub fn register(&mut self, table: TableSchema) -> &mut Self {
        let defs = self.tables.entry(table.name.clone()).or_default();
        match defs.iter_mut().find(|t| t.schema == table.schema) {
            Some(existing) => *existing = table,
            None => defs.push(table),
        }
        self
    }

    /// Chainable form of [`register`](Self::register).
    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.register(table);
        self
    }

    /// Find the definition used for a lookup of `schema.table`.
    ///
    /// An exact schema match wins over a schema-less definition.
    pub fn find(&self, schema: Option<&str>, table: &str) -> Option<&TableSchema> {
        let defs = self.tables.get(table)?;
        defs.iter()
            .find(|t| t.schema.is_some() && t.schema.as_deref() == schema)
            .or_else(|| defs.iter().find(|t| t.schema.is_none()))
    }

    /// Number of registered table definitions.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl MetadataProvider for StaticMetadata {
    fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError> {
        self.find(schema, table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| MetadataError::unknown_table(schema, table))
    }
}
