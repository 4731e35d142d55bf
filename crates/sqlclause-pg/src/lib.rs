//! sqlclause-pg
//!
//! A [`MetadataProvider`](sqlclause::MetadataProvider) backed by the
//! PostgreSQL catalog.
//!
//! Column lists are read from `pg_catalog` into a [`DbSchema`] snapshot,
//! which can be cached in a local directory (default: `./.sqlclause/`) and
//! revalidated by fingerprint on the next start.
//!
//! # Example
//!
//! ```ignore
//! use sqlclause::{MapParams, QueryBuilder};
//! use sqlclause_pg::{SchemaCache, SchemaCacheConfig};
//!
//! let (cache, _) = SchemaCache::load_or_refresh(&client, &SchemaCacheConfig::default()).await?;
//!
//! let mut qb = QueryBuilder::default().with_schema("public");
//! qb.select("users").except("password_hash");
//! let sql = qb.build(&MapParams::new(), &cache.schema)?;
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod introspect;

pub use cache::{SchemaCache, SchemaCacheConfig, SchemaCacheLoad};
pub use client::{IntrospectClient, RowExt};
pub use error::{PgMetaError, PgMetaResult};
pub use introspect::{ColumnInfo, DbSchema, RelationKind, TableInfo, load_schema, schema_fingerprint};
