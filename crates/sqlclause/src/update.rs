//! UPDATE statements.

use crate::columns::resolve_columns;
use crate::error::{SqlError, SqlResult};
use crate::part::{QueryPart, RenderContext};
use crate::traits::{ColumnSet, MutationClause};
use crate::where_clause::WhereClause;

/// `UPDATE table SET col=:col,... [WHERE ...]`
#[derive(Debug, Clone)]
pub struct UpdateClause {
    table: String,
    columns: Vec<String>,
    excluded: Vec<String>,
    where_clause: Option<WhereClause>,
}

impl UpdateClause {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            excluded: Vec::new(),
            where_clause: None,
        }
    }

    /// Update the row identified by `id_column`.
    ///
    /// The id column is left out of SET and `id_column = :id_column` is added to WHERE.
    pub fn with_id(table: impl Into<String>, id_column: impl Into<String>) -> Self {
        let id = id_column.into();
        let mut update = Self::new(table);
        update.where_mut().add(format!("{id} = :{id}"));
        update.excluded.push(id);
        update
    }

    /// The WHERE clause, created empty on first access.
    pub fn where_mut(&mut self) -> &mut WhereClause {
        self.where_clause.get_or_insert_with(WhereClause::new)
    }
}

impl MutationClause for UpdateClause {
    fn table(&self) -> &str {
        &self.table
    }

    fn where_clause(&self) -> Option<&WhereClause> {
        self.where_clause.as_ref()
    }
}

impl ColumnSet for UpdateClause {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn excluded(&self) -> &[String] {
        &self.excluded
    }

    fn set_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    fn add_column(&mut self, column: impl Into<String>) -> &mut Self {
        self.columns.push(column.into());
        self
    }

    fn except(&mut self, column: impl Into<String>) -> &mut Self {
        self.excluded.push(column.into());
        self
    }
}

impl QueryPart for UpdateClause {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let columns = resolve_columns(ctx, &self.table, &self.columns, &self.excluded)?;
        if columns.is_empty() {
            return Err(SqlError::EmptyColumnList {
                table: self.table.clone(),
            });
        }

        let sets: Vec<String> = columns.iter().map(|c| format!("{c}=:{c}")).collect();
        let mut sql = format!("UPDATE {} SET {}", ctx.qualify(&self.table), sets.join(","));

        if let Some(clause) = &self.where_clause {
            let text = clause.render(ctx)?;
            if !text.is_empty() {
                sql.push_str(ctx.delim());
                sql.push_str(&text);
            }
        }
        Ok(sql)
    }
}
