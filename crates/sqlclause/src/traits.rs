use crate::where_clause::WhereClause;

/// Capabilities shared by INSERT, UPDATE and DELETE.
pub trait MutationClause {
    /// Unqualified target table.
    fn table(&self) -> &str;

    /// Attached WHERE clause, if the statement has one.
    fn where_clause(&self) -> Option<&WhereClause> {
        None
    }
}

/// Column list and exclusions of a mutation.
///
/// Implemented by [`InsertClause`](crate::InsertClause) and
/// [`UpdateClause`](crate::UpdateClause). DELETE has no column list and does
/// not implement it.
pub trait ColumnSet {
    /// Explicit columns; when non-empty, used verbatim and exclusions are ignored.
    fn columns(&self) -> &[String];

    /// Names dropped from the metadata column list.
    fn excluded(&self) -> &[String];

    /// Replace the explicit column list.
    fn set_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    /// Append one explicit column.
    fn add_column(&mut self, column: impl Into<String>) -> &mut Self;

    /// Exclude a metadata column.
    fn except(&mut self, column: impl Into<String>) -> &mut Self;

    /// Exclude several metadata columns.
    fn except_all<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        Self: Sized,
    {
        for c in columns {
            self.except(c);
        }
        self
    }
}
