//! INSERT statements.

use crate::columns::resolve_columns;
use crate::error::{SqlError, SqlResult};
use crate::part::{QueryPart, RenderContext};
use crate::select::SelectClause;
use crate::traits::{ColumnSet, MutationClause};

/// `INSERT INTO table (cols) VALUES (:cols)` or `INSERT INTO table (cols) SELECT ...`.
#[derive(Debug, Clone)]
pub struct InsertClause {
    table: String,
    columns: Vec<String>,
    excluded: Vec<String>,
    select: Option<SelectClause>,
}

impl InsertClause {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            excluded: Vec::new(),
            select: None,
        }
    }

    /// Insert into a table whose `id_column` is generated by the database.
    pub fn with_id(table: impl Into<String>, id_column: impl Into<String>) -> Self {
        let mut insert = Self::new(table);
        insert.excluded.push(id_column.into());
        insert
    }

    /// Take values from a nested SELECT instead of `:name` placeholders.
    pub fn from_select(&mut self) -> &mut SelectClause {
        self.select.insert(SelectClause::new())
    }
}

impl MutationClause for InsertClause {
    fn table(&self) -> &str {
        &self.table
    }
}

impl ColumnSet for InsertClause {
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

impl QueryPart for InsertClause {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let columns = resolve_columns(ctx, &self.table, &self.columns, &self.excluded)?;
        if columns.is_empty() {
            return Err(SqlError::EmptyColumnList {
                table: self.table.clone(),
            });
        }

        let delim = ctx.delim();
        let mut sql = format!(
            "INSERT INTO {}{delim}({}){delim}",
            ctx.qualify(&self.table),
            columns.join(",")
        );
        match &self.select {
            Some(select) => sql.push_str(&select.render(ctx)?),
            None => {
                let values: Vec<String> = columns.iter().map(|c| format!(":{c}")).collect();
                sql.push_str("VALUES (");
                sql.push_str(&values.join(","));
                sql.push(')');
            }
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use crate::metadata::{StaticMetadata, TableSchema};
    use crate::params::NoParams;

    fn render(insert: &InsertClause) -> SqlResult<String> {
        let config = BuilderConfig::new().with_schema("gg").with_delimiter(" ");
        let meta = StaticMetadata::new()
            .with_table(TableSchema::new("items").with_columns(&["id", "name", "price"]))
            .with_table(TableSchema::new("archive").with_columns(&["id", "name", "price"]));
        insert.render(&RenderContext::new(&config, &NoParams, &meta))
    }

    #[test]
    fn test_insert_all_metadata_columns() {
        let insert = InsertClause::new("items");
        assert_eq!(
            render(&insert).unwrap(),
            "INSERT INTO gg.items (id,name,price) VALUES (:id,:name,:price)"
        );
    }

    #[test]
    fn test_insert_with_generated_id() {
        let insert = InsertClause::with_id("items", "id");
        assert_eq!(
            render(&insert).unwrap(),
            "INSERT INTO gg.items (name,price) VALUES (:name,:price)"
        );
    }

    #[test]
    fn test_explicit_columns() {
        let mut insert = InsertClause::new("items");
        insert
            .set_columns(["name"])
            .add_column("price")
            .except("name");
        assert_eq!(
            render(&insert).unwrap(),
            "INSERT INTO gg.items (name,price) VALUES (:name,:price)"
        );
    }

    #[test]
    fn test_insert_select_has_no_placeholders() {
        let mut insert = InsertClause::new("archive");
        insert
            .from_select()
            .add_all(["id", "name", "price"])
            .from("items")
            .where_clause()
            .add("price > :min_price");
        assert_eq!(
            render(&insert).unwrap(),
            "INSERT INTO gg.archive (id,name,price) SELECT id,name,price FROM gg.items WHERE (price > :min_price)"
        );
    }

    #[test]
    fn test_all_columns_excluded() {
        let mut insert = InsertClause::new("items");
        insert.except_all(["id", "name", "price"]);
        let err = render(&insert).unwrap_err();
        assert!(matches!(err, SqlError::EmptyColumnList { ref table } if table == "items"));
    }
}
