//! Local JSON snapshot of the catalog, revalidated by fingerprint.

use crate::client::IntrospectClient;
use crate::error::{PgMetaError, PgMetaResult};
use crate::introspect::{DbSchema, load_schema, schema_fingerprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CACHE_VERSION: u32 = 1;

/// Where the snapshot lives and which schemas it covers.
///
/// Defaults to `./.sqlclause/schema.json` over `public`.
#[derive(Debug, Clone)]
pub struct SchemaCacheConfig {
    pub cache_dir: PathBuf,
    pub cache_file_name: String,
    /// Introspected schemas; also the search order for unqualified tables.
    pub schemas: Vec<String>,
}

impl Default for SchemaCacheConfig {
    fn default() -> Self {
        let cache_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".sqlclause");

        Self {
            cache_dir,
            cache_file_name: "schema.json".to_string(),
            schemas: vec!["public".to_string()],
        }
    }
}

impl SchemaCacheConfig {
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_schemas<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemas = schemas.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaCacheLoad {
    /// The file on disk still matched the live fingerprint.
    CacheHit,
    /// The catalog was read again and the file rewritten.
    Refreshed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCache {
    pub version: u32,
    pub retrieved_at: DateTime<Utc>,
    pub schemas: Vec<String>,
    pub fingerprint: String,
    pub schema: DbSchema,
}

impl SchemaCache {
    pub fn new(schema: DbSchema, fingerprint: String) -> Self {
        Self {
            version: CACHE_VERSION,
            retrieved_at: Utc::now(),
            schemas: schema.schemas.clone(),
            fingerprint,
            schema,
        }
    }

    pub fn cache_path(config: &SchemaCacheConfig) -> PathBuf {
        config.cache_dir.join(&config.cache_file_name)
    }

    /// Whether this snapshot was taken for exactly `config.schemas` by this cache format.
    pub fn matches(&self, config: &SchemaCacheConfig) -> bool {
        self.version == CACHE_VERSION && self.schemas == config.schemas
    }

    /// Use the cached snapshot if the live fingerprint still matches, otherwise
    /// reload from the catalog and rewrite the cache file.
    pub async fn load_or_refresh<C: IntrospectClient + ?Sized>(
        client: &C,
        config: &SchemaCacheConfig,
    ) -> PgMetaResult<(Self, SchemaCacheLoad)> {
        let cache_path = Self::cache_path(config);

        match Self::read_from(&cache_path) {
            Ok(cached) if cached.matches(config) => {
                let current_fp = schema_fingerprint(client, &config.schemas).await?;
                if current_fp == cached.fingerprint {
                    tracing::debug!(
                        target: "sqlclause.metadata",
                        path = %cache_path.display(),
                        "schema cache hit"
                    );
                    return Ok((cached, SchemaCacheLoad::CacheHit));
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    target: "sqlclause.metadata",
                    path = %cache_path.display(),
                    error = %e,
                    "schema cache unusable"
                );
            }
        }

        let (schema, fingerprint) = load_schema(client, &config.schemas).await?;
        let refreshed = SchemaCache::new(schema, fingerprint);
        refreshed.write_to(&cache_path)?;
        tracing::debug!(
            target: "sqlclause.metadata",
            path = %cache_path.display(),
            "schema cache refreshed"
        );
        Ok((refreshed, SchemaCacheLoad::Refreshed))
    }

    /// Read a cache file without contacting the database.
    pub fn read_from(path: &Path) -> PgMetaResult<Self> {
        let data = std::fs::read(path)?;
        serde_json::from_slice::<SchemaCache>(&data)
            .map_err(|e| PgMetaError::Serialization(format!("Failed to parse schema cache: {e}")))
    }

    /// Replace the cache file, creating its directory if needed.
    pub fn write_to(&self, path: &Path) -> PgMetaResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(self).map_err(|e| {
            PgMetaError::Serialization(format!("Failed to serialize schema cache: {e}"))
        })?;

        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
