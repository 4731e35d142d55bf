//! Statement selection and the top-level builder.

use crate::bind::{BoundSql, bind_named};
use crate::config::BuilderConfig;
use crate::delete::DeleteClause;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::insert::InsertClause;
use crate::metadata::MetadataProvider;
use crate::params::ParamSource;
use crate::part::{QueryPart, RenderContext};
use crate::select::SelectClause;
use crate::traits::{ColumnSet, MutationClause};
use crate::update::UpdateClause;

/// Statement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

/// One of the four statement trees.
#[derive(Debug, Clone)]
pub enum Statement {
    Select(SelectClause),
    Insert(InsertClause),
    Update(UpdateClause),
    Delete(DeleteClause),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
        }
    }

    /// Target table; for SELECT, the FROM table if it is one.
    pub fn table(&self) -> Option<&str> {
        match self {
            Statement::Select(s) => s.from_clause().and_then(|f| f.table_name()),
            Statement::Insert(s) => Some(s.table()),
            Statement::Update(s) => Some(s.table()),
            Statement::Delete(s) => Some(s.table()),
        }
    }

    /// Add explicit columns (projections for SELECT).
    ///
    /// DELETE has no column list and fails with [`SqlError::UnsupportedOperation`].
    pub fn columns_mut<I, S>(&mut self, columns: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Statement::Select(s) => {
                s.add_all(columns);
            }
            Statement::Insert(s) => {
                for c in columns {
                    s.add_column(c);
                }
            }
            Statement::Update(s) => {
                for c in columns {
                    s.add_column(c);
                }
            }
            Statement::Delete(_) => {
                return Err(SqlError::unsupported("DELETE has no column list"));
            }
        }
        Ok(self)
    }

    /// Exclude columns from metadata expansion.
    ///
    /// DELETE has no column list and fails with [`SqlError::UnsupportedOperation`].
    pub fn except<I, S>(&mut self, columns: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Statement::Select(s) => {
                s.except_all(columns);
            }
            Statement::Insert(s) => {
                s.except_all(columns);
            }
            Statement::Update(s) => {
                s.except_all(columns);
            }
            Statement::Delete(_) => {
                return Err(SqlError::unsupported("DELETE has no column list to exclude from"));
            }
        }
        Ok(self)
    }
}

impl QueryPart for Statement {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        match self {
            Statement::Select(s) => s.render(ctx),
            Statement::Insert(s) => s.render(ctx),
            Statement::Update(s) => s.render(ctx),
            Statement::Delete(s) => s.render(ctx),
        }
    }
}

/// Holds the configuration and the active statement.
///
/// # Example
///
/// ```
/// use sqlclause::{BuilderConfig, MapParams, QueryBuilder, StaticMetadata, TableSchema};
///
/// let meta = StaticMetadata::new()
///     .with_table(TableSchema::new("users").with_columns(&["id", "name", "password"]));
///
/// let mut qb = QueryBuilder::new(BuilderConfig::new().with_delimiter(" "));
/// qb.select("users").except("password").where_clause().add("id = :id");
///
/// let sql = qb.build(&MapParams::new(), &meta).unwrap();
/// assert_eq!(sql, "SELECT id,name FROM users WHERE (id = :id)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    config: BuilderConfig,
    statement: Option<Statement>,
}

impl QueryBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            statement: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.config = self.config.with_schema(schema);
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.config = self.config.with_dialect(dialect);
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config = self.config.with_delimiter(delimiter);
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }

    /// The active statement, for the dynamic column surface.
    pub fn statement_mut(&mut self) -> SqlResult<&mut Statement> {
        self.statement.as_mut().ok_or(SqlError::NoStatement)
    }

    // ==================== Statement setters ====================

    /// Start a SELECT over `table`.
    pub fn select(&mut self, table: &str) -> &mut SelectClause {
        self.install_select(SelectClause::from_table(table))
    }

    /// Start a SELECT over `table AS alias`.
    pub fn select_as(&mut self, table: &str, alias: &str) -> &mut SelectClause {
        let mut select = SelectClause::new();
        select.from_as(table, alias);
        self.install_select(select)
    }

    /// Start a SELECT of `columns` from `table`.
    pub fn select_columns<I, S>(&mut self, table: &str, columns: I) -> &mut SelectClause
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut select = SelectClause::from_table(table);
        select.add_all(columns);
        self.install_select(select)
    }

    /// Start a SELECT with no FROM yet, e.g. one wrapping a subquery.
    pub fn select_query(&mut self) -> &mut SelectClause {
        self.install_select(SelectClause::new())
    }

    fn install_select(&mut self, select: SelectClause) -> &mut SelectClause {
        match self.statement.insert(Statement::Select(select)) {
            Statement::Select(s) => s,
            _ => unreachable!(),
        }
    }

    pub fn insert(&mut self, table: &str) -> &mut InsertClause {
        self.install_insert(InsertClause::new(table))
    }

    /// INSERT leaving out the generated `id_column`.
    pub fn insert_with_id(&mut self, table: &str, id_column: &str) -> &mut InsertClause {
        self.install_insert(InsertClause::with_id(table, id_column))
    }

    fn install_insert(&mut self, insert: InsertClause) -> &mut InsertClause {
        match self.statement.insert(Statement::Insert(insert)) {
            Statement::Insert(s) => s,
            _ => unreachable!(),
        }
    }

    pub fn update(&mut self, table: &str) -> &mut UpdateClause {
        self.install_update(UpdateClause::new(table))
    }

    /// UPDATE of the row with `id_column = :id_column`.
    pub fn update_with_id(&mut self, table: &str, id_column: &str) -> &mut UpdateClause {
        self.install_update(UpdateClause::with_id(table, id_column))
    }

    fn install_update(&mut self, update: UpdateClause) -> &mut UpdateClause {
        match self.statement.insert(Statement::Update(update)) {
            Statement::Update(s) => s,
            _ => unreachable!(),
        }
    }

    pub fn delete(&mut self, table: &str) -> &mut DeleteClause {
        self.install_delete(DeleteClause::new(table))
    }

    /// DELETE of the row with `id_column = :id_column`.
    pub fn delete_with_id(&mut self, table: &str, id_column: &str) -> &mut DeleteClause {
        self.install_delete(DeleteClause::with_id(table, id_column))
    }

    fn install_delete(&mut self, delete: DeleteClause) -> &mut DeleteClause {
        match self.statement.insert(Statement::Delete(delete)) {
            Statement::Delete(s) => s,
            _ => unreachable!(),
        }
    }

    // ==================== Rendering ====================

    /// Render the active statement to SQL with `:name` placeholders.
    pub fn build(
        &self,
        params: &dyn ParamSource,
        metadata: &dyn MetadataProvider,
    ) -> SqlResult<String> {
        let statement = self.statement.as_ref().ok_or(SqlError::NoStatement)?;
        let ctx = RenderContext::new(&self.config, params, metadata);
        let sql = statement.render(&ctx)?;
        tracing::debug!(
            target: "sqlclause.render",
            kind = statement.kind().as_str(),
            dialect = %self.config.dialect,
            sql_len = sql.len(),
            "rendered statement"
        );
        Ok(sql)
    }

    /// Render, then rewrite placeholders to the dialect's positional markers.
    pub fn build_bound(
        &self,
        params: &dyn ParamSource,
        metadata: &dyn MetadataProvider,
    ) -> SqlResult<BoundSql> {
        let sql = self.build(params, metadata)?;
        bind_named(&sql, self.config.dialect, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{StaticMetadata, TableSchema};
    use crate::params::{MapParams, NoParams};
    use serde_json::json;

    fn meta() -> StaticMetadata {
        StaticMetadata::new()
            .with_table(TableSchema::new("users").with_columns(&["id", "name", "email"]))
    }

    #[test]
    fn test_build_without_statement() {
        let qb = QueryBuilder::default();
        assert!(matches!(qb.build(&NoParams, &meta()), Err(SqlError::NoStatement)));
    }

    #[test]
    fn test_last_statement_wins() {
        let mut qb = QueryBuilder::default().with_delimiter(" ");
        qb.select("users");
        qb.delete_with_id("users", "id");
        assert_eq!(qb.statement().map(Statement::kind), Some(StatementKind::Delete));
        assert_eq!(
            qb.build(&NoParams, &meta()).unwrap(),
            "DELETE FROM users WHERE (id = :id)"
        );
    }

    #[test]
    fn test_dynamic_columns_rejected_for_delete() {
        let mut qb = QueryBuilder::default();
        qb.delete("users");
        let stmt = qb.statement_mut().unwrap();
        assert!(stmt.columns_mut(["name"]).unwrap_err().is_unsupported());
        assert!(stmt.except(["name"]).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_dynamic_columns_for_update() {
        let mut qb = QueryBuilder::default().with_delimiter(" ");
        qb.update_with_id("users", "id");
        qb.statement_mut().unwrap().except(["email"]).unwrap();
        assert_eq!(
            qb.build(&NoParams, &meta()).unwrap(),
            "UPDATE users SET name=:name WHERE (id = :id)"
        );
    }

    #[test]
    fn test_insert_with_id() {
        let mut qb = QueryBuilder::default().with_schema("app").with_delimiter(" ");
        qb.insert_with_id("users", "id");
        assert_eq!(
            qb.build(&NoParams, &meta()).unwrap(),
            "INSERT INTO app.users (name,email) VALUES (:name,:email)"
        );
    }

    #[test]
    fn test_build_bound_postgres() {
        let mut qb = QueryBuilder::default()
            .with_dialect(Dialect::Postgres)
            .with_delimiter(" ");
        qb.select_columns("users", ["id"])
            .where_clause()
            .add("name = :name")
            .or("email = :name");

        let params = MapParams::new().with("name", "Abc");
        let bound = qb.build_bound(&params, &meta()).unwrap();
        assert_eq!(
            bound.sql,
            "SELECT id FROM users WHERE (name = $1) OR (email = $1)"
        );
        assert_eq!(bound.values, vec![json!("Abc")]);
    }
}
