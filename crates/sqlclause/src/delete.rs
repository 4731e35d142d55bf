//! DELETE statements.

use crate::error::{SqlError, SqlResult};
use crate::part::{QueryPart, RenderContext};
use crate::traits::MutationClause;
use crate::where_clause::WhereClause;

/// `DELETE FROM table WHERE ...`
///
/// Rendering fails with [`SqlError::MissingWhere`] unless the WHERE clause
/// produces at least one condition for the given parameters. There is no way
/// to delete a whole table through this type.
#[derive(Debug, Clone)]
pub struct DeleteClause {
    table: String,
    where_clause: Option<WhereClause>,
}

impl DeleteClause {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
        }
    }

    /// Delete the row matching `id_column = :id_column`.
    pub fn with_id(table: impl Into<String>, id_column: impl Into<String>) -> Self {
        let id = id_column.into();
        let mut delete = Self::new(table);
        delete.where_mut().add(format!("{id} = :{id}"));
        delete
    }

    /// The WHERE clause, created empty on first access.
    pub fn where_mut(&mut self) -> &mut WhereClause {
        self.where_clause.get_or_insert_with(WhereClause::new)
    }
}

impl MutationClause for DeleteClause {
    fn table(&self) -> &str {
        &self.table
    }

    fn where_clause(&self) -> Option<&WhereClause> {
        self.where_clause.as_ref()
    }
}

impl QueryPart for DeleteClause {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let condition = match &self.where_clause {
            Some(clause) => clause.render(ctx)?,
            None => String::new(),
        };
        if condition.is_empty() {
            tracing::warn!(
                target: "sqlclause.render",
                table = %self.table,
                "rejected DELETE without WHERE conditions"
            );
            return Err(SqlError::missing_where(&self.table));
        }
        Ok(format!(
            "DELETE FROM {}{}{condition}",
            ctx.qualify(&self.table),
            ctx.delim()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use crate::metadata::StaticMetadata;
    use crate::params::{MapParams, NoParams, ParamSource};

    fn render_with(delete: &DeleteClause, params: &dyn ParamSource) -> SqlResult<String> {
        let config = BuilderConfig::new().with_schema("gg").with_delimiter(" ");
        let meta = StaticMetadata::new();
        delete.render(&RenderContext::new(&config, params, &meta))
    }

    #[test]
    fn test_delete_by_id() {
        let delete = DeleteClause::with_id("items", "id");
        assert_eq!(
            render_with(&delete, &NoParams).unwrap(),
            "DELETE FROM gg.items WHERE (id = :id)"
        );
    }

    #[test]
    fn test_delete_without_where_fails() {
        let err = render_with(&DeleteClause::new("items"), &NoParams).unwrap_err();
        assert!(err.is_missing_where());
    }

    #[test]
    fn test_delete_with_empty_where_fails() {
        let mut delete = DeleteClause::new("items");
        delete.where_mut();
        assert!(render_with(&delete, &NoParams).unwrap_err().is_missing_where());
    }

    #[test]
    fn test_delete_guard_applies_to_rendered_conditions() {
        let mut delete = DeleteClause::new("items");
        delete
            .where_mut()
            .add_if(|p| p.has_value("owner"), "owner = :owner");

        assert!(render_with(&delete, &NoParams).unwrap_err().is_missing_where());

        let params = MapParams::new().with("owner", 7);
        assert_eq!(
            render_with(&delete, &params).unwrap(),
            "DELETE FROM gg.items WHERE (owner = :owner)"
        );
    }
}
