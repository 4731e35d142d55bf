use crate::error::{SqlError, SqlResult};
use crate::params::ParamSource;
use crate::part::{Part, QueryPart, RenderContext};
use crate::where_clause::WhereClause;

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// `{kind} JOIN table [AS alias] ON (c1) AND (c2) ...`
///
/// ON conditions are always joined with `AND`. Rendering fails with
/// [`SqlError::MissingJoinCondition`] when no condition renders.
#[derive(Debug, Clone)]
pub struct JoinClause {
    kind: JoinKind,
    table: String,
    alias: Option<String>,
    on: WhereClause,
}

impl JoinClause {
    pub fn new(kind: JoinKind, table: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            kind,
            table: table.into(),
            alias: alias.map(str::to_string),
            on: WhereClause::on(),
        }
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Add an ON condition.
    pub fn on(&mut self, cond: impl Into<Part>) -> &mut Self {
        self.on.add(cond);
        self
    }

    /// Add an ON condition when `active` is true (decided now).
    pub fn on_when(&mut self, active: bool, cond: impl Into<Part>) -> &mut Self {
        self.on.add_when(active, cond);
        self
    }

    /// Add one of two ON conditions, decided now.
    pub fn on_when_else(
        &mut self,
        active: bool,
        on_true: impl Into<Part>,
        on_false: impl Into<Part>,
    ) -> &mut Self {
        self.on.add_when_else(active, on_true, on_false);
        self
    }

    /// Add an ON condition when `predicate` holds at render time.
    pub fn on_if<F>(&mut self, predicate: F, cond: impl Into<Part>) -> &mut Self
    where
        F: Fn(&dyn ParamSource) -> bool + Send + Sync + 'static,
    {
        self.on.add_if(predicate, cond);
        self
    }

    /// Add one of two ON conditions, chosen at render time.
    pub fn on_if_else<F>(
        &mut self,
        predicate: F,
        on_true: impl Into<Part>,
        on_false: impl Into<Part>,
    ) -> &mut Self
    where
        F: Fn(&dyn ParamSource) -> bool + Send + Sync + 'static,
    {
        self.on.add_if_else(predicate, on_true, on_false);
        self
    }
}

impl QueryPart for JoinClause {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let mut out = format!("{} {}", self.kind.as_str(), ctx.qualify(&self.table));
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            out.push_str(alias);
        }
        let on = self.on.render(ctx)?;
        if on.is_empty() {
            let table = ctx.qualify(&self.table);
            tracing::warn!(
                target: "sqlclause.render",
                table = %table,
                "refusing to render JOIN without an ON condition"
            );
            return Err(SqlError::missing_join_condition(table));
        }
        out.push(' ');
        out.push_str(&on);
        Ok(out)
    }
}
