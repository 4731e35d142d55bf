//! Minimal query surface needed for catalog introspection.

use crate::error::{PgMetaError, PgMetaResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Read-only access to `pg_catalog`, over a `Client` or inside a `Transaction`.
#[async_trait::async_trait]
pub trait IntrospectClient: Sync {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PgMetaResult<Vec<Row>>;

    /// Fails unless the catalog query yields exactly one row.
    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PgMetaResult<Row>;
}

#[async_trait::async_trait]
impl IntrospectClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PgMetaResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(PgMetaError::from)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PgMetaResult<Row> {
        tokio_postgres::Client::query_one(self, sql, params)
            .await
            .map_err(PgMetaError::from)
    }
}

#[async_trait::async_trait]
impl<'a> IntrospectClient for tokio_postgres::Transaction<'a> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PgMetaResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(PgMetaError::from)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PgMetaResult<Row> {
        tokio_postgres::Transaction::query_one(self, sql, params)
            .await
            .map_err(PgMetaError::from)
    }
}

/// Typed catalog column reads; a type mismatch names the offending column.
pub trait RowExt {
    fn try_get_column<'a, T>(&'a self, column: &str) -> PgMetaResult<T>
    where
        T: tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<'a, T>(&'a self, column: &str) -> PgMetaResult<T>
    where
        T: tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| PgMetaError::decode(column, e.to_string()))
    }
}
