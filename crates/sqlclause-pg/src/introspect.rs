//! Column metadata read from `pg_catalog`.

use crate::client::{IntrospectClient, RowExt};
use crate::error::{PgMetaError, PgMetaResult};
use serde::{Deserialize, Serialize};
use sqlclause::{MetadataError, MetadataProvider};
use std::collections::BTreeMap;

/// Relation filter shared by the fingerprint and the column query.
const RELATION_FILTER: &str = "\
WHERE c.relkind IN ('r', 'p', 'v', 'm', 'f')
  AND a.attnum > 0
  AND NOT a.attisdropped
  AND n.nspname = ANY($1::text[])";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Table,
    PartitionedTable,
    View,
    MaterializedView,
    ForeignTable,
    Other,
}

impl RelationKind {
    fn from_relkind(relkind: i8) -> Self {
        // `relkind` is a "char"; tokio-postgres exposes it as i8.
        match relkind as u8 as char {
            'r' => Self::Table,
            'p' => Self::PartitionedTable,
            'v' => Self::View,
            'm' => Self::MaterializedView,
            'f' => Self::ForeignTable,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default_expr: Option<String>,
    /// `attnum`, 1-based definition order.
    pub ordinal: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    pub kind: RelationKind,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    /// Column names in definition order.
    pub fn column_names(&self) -> Vec<String> {
        let mut columns: Vec<&ColumnInfo> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal);
        columns.into_iter().map(|c| c.name.clone()).collect()
    }
}

/// Snapshot of the relations in a set of schemas.
///
/// Lookups without a schema search `schemas` in order, like a `search_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSchema {
    pub schemas: Vec<String>,
    pub tables: Vec<TableInfo>,
}

impl DbSchema {
    pub fn find_table(&self, schema: &str, table: &str) -> Option<&TableInfo> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == table)
    }

    /// First table named `table` in search order.
    pub fn resolve_table(&self, table: &str) -> Option<&TableInfo> {
        self.schemas
            .iter()
            .find_map(|schema| self.find_table(schema, table))
    }
}

impl MetadataProvider for DbSchema {
    fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError> {
        let found = match schema {
            Some(schema) => self.find_table(schema, table),
            None => self.resolve_table(table),
        };
        found
            .map(TableInfo::column_names)
            .ok_or_else(|| MetadataError::unknown_table(schema, table))
    }
}

/// md5 over every column definition in `schemas`; changes whenever a relation does.
pub async fn schema_fingerprint<C: IntrospectClient + ?Sized>(
    client: &C,
    schemas: &[String],
) -> PgMetaResult<String> {
    let sql = format!(
        r#"
SELECT
  md5(
    COALESCE(
      string_agg(
        concat_ws(
          '|',
          n.nspname,
          c.relname,
          c.relkind::text,
          a.attnum::text,
          a.attname,
          pg_catalog.format_type(a.atttypid, a.atttypmod),
          a.attnotnull::text,
          COALESCE(pg_get_expr(ad.adbin, ad.adrelid), '')
        ),
        E'\n' ORDER BY n.nspname, c.relname, a.attnum
      ),
      ''
    )
  ) AS fingerprint
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
LEFT JOIN pg_catalog.pg_attrdef ad ON ad.adrelid = c.oid AND ad.adnum = a.attnum
{RELATION_FILTER}
"#
    );
    let row = client.query_one(&sql, &[&schemas]).await?;
    row.try_get_column::<String>("fingerprint")
}

/// Load every relation of `schemas` together with the current fingerprint.
pub async fn load_schema<C: IntrospectClient + ?Sized>(
    client: &C,
    schemas: &[String],
) -> PgMetaResult<(DbSchema, String)> {
    let fingerprint = schema_fingerprint(client, schemas).await?;

    let sql = format!(
        r#"
SELECT
  n.nspname AS schema_name,
  c.relname AS table_name,
  c.relkind AS relkind,
  a.attname AS column_name,
  a.attnum::int4 AS ordinal,
  pg_catalog.format_type(a.atttypid, a.atttypmod) AS data_type,
  a.attnotnull AS not_null,
  pg_get_expr(ad.adbin, ad.adrelid) AS default_expr
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
LEFT JOIN pg_catalog.pg_attrdef ad ON ad.adrelid = c.oid AND ad.adnum = a.attnum
{RELATION_FILTER}
ORDER BY n.nspname, c.relname, a.attnum
"#
    );
    let rows = client.query(&sql, &[&schemas]).await?;

    let mut tables: BTreeMap<(String, String), TableInfo> = BTreeMap::new();
    for row in rows {
        let schema_name: String = row.try_get_column("schema_name")?;
        let table_name: String = row.try_get_column("table_name")?;
        let relkind: i8 = row.try_get_column("relkind")?;

        let column = ColumnInfo {
            name: row.try_get_column("column_name")?,
            data_type: row.try_get_column("data_type")?,
            not_null: row.try_get_column("not_null")?,
            default_expr: row.try_get_column("default_expr")?,
            ordinal: row.try_get_column("ordinal")?,
        };

        tables
            .entry((schema_name.clone(), table_name.clone()))
            .or_insert_with(|| TableInfo {
                schema: schema_name,
                name: table_name,
                kind: RelationKind::from_relkind(relkind),
                columns: Vec::new(),
            })
            .columns
            .push(column);
    }

    if tables.is_empty() {
        return Err(PgMetaError::Other(format!(
            "No tables found in schemas {}",
            schemas.join(", ")
        )));
    }

    tracing::debug!(
        target: "sqlclause.metadata",
        schemas = %schemas.join(","),
        tables = tables.len(),
        "loaded catalog schema"
    );

    Ok((
        DbSchema {
            schemas: schemas.to_vec(),
            tables: tables.into_values().collect(),
        },
        fingerprint,
    ))
}
