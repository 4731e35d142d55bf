//! SELECT statements.
//!
//! A [`SelectClause`] is configured through `&mut self` builder methods and
//! rendered as:
//!
//! ```text
//! SELECT [paging] projections
//! FROM source [AS alias]
//! {INNER|LEFT|RIGHT} JOIN table [AS alias] ON (...)
//! WHERE (...)
//! GROUP BY ... / ORDER BY ...
//! [paging]
//! ```
//!
//! with the configured delimiter between clause groups. Wildcard targets
//! ([`SelectClause::all_from`]) are expanded against metadata on every render.

mod join;

pub use join::{JoinClause, JoinKind};

use crate::after_where::{AfterWhere, GroupByClause, OrderByClause, PageRequest, PagingClause};
use crate::columns::{self, AliasMap};
use crate::error::{SqlError, SqlResult};
use crate::part::{Part, QueryPart, RenderContext};
use crate::where_clause::WhereClause;

/// Source of a FROM clause.
#[derive(Debug, Clone)]
pub enum FromSource {
    Table(String),
    Subquery(Box<SelectClause>),
}

/// `FROM source [AS alias]`
#[derive(Debug, Clone)]
pub struct FromClause {
    source: FromSource,
    alias: Option<String>,
}

impl FromClause {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            source: FromSource::Table(table.into()),
            alias: None,
        }
    }

    pub fn subquery(select: SelectClause) -> Self {
        Self {
            source: FromSource::Subquery(Box::new(select)),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn source(&self) -> &FromSource {
        &self.source
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Table name when the source is a table.
    pub fn table_name(&self) -> Option<&str> {
        match &self.source {
            FromSource::Table(t) => Some(t),
            FromSource::Subquery(_) => None,
        }
    }
}

impl QueryPart for FromClause {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let mut out = String::from("FROM ");
        match &self.source {
            FromSource::Table(table) => out.push_str(&ctx.qualify(table)),
            FromSource::Subquery(select) => {
                out.push('(');
                out.push_str(&select.render(ctx)?);
                out.push(')');
            }
        }
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            out.push_str(alias);
        }
        Ok(out)
    }
}

/// One entry of the projection list.
#[derive(Debug, Clone)]
enum Projection {
    Part(Part),
    Subquery {
        select: Box<SelectClause>,
        alias: Option<String>,
    },
}

impl Projection {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        match self {
            Projection::Part(part) => part.render(ctx),
            Projection::Subquery { select, alias } => {
                let mut out = format!("{}({})", ctx.delim(), select.render(ctx)?);
                if let Some(alias) = alias {
                    out.push_str(" AS ");
                    out.push_str(alias);
                }
                Ok(out)
            }
        }
    }
}

/// SELECT statement tree.
#[derive(Debug, Clone, Default)]
pub struct SelectClause {
    aliases: AliasMap,
    all_from_main: bool,
    all_from: Vec<String>,
    excluded: Vec<String>,
    projections: Vec<Projection>,
    from: Option<FromClause>,
    joins: Vec<JoinClause>,
    where_clause: Option<WhereClause>,
    after_where: Vec<AfterWhere>,
    paging: Option<PagingClause>,
}

impl SelectClause {
    /// Create an empty SELECT.
    pub fn new() -> Self {
        Self::default()
    }

    /// SELECT over `table`, with the fallback column list until something is projected.
    pub fn from_table(table: impl Into<String>) -> Self {
        let mut select = Self::new();
        select.from(table);
        select
    }

    // ==================== Projections ====================

    /// Add a projection (column, expression or conditional part).
    pub fn add(&mut self, projection: impl Into<Part>) -> &mut Self {
        self.projections.push(Projection::Part(projection.into()));
        self
    }

    /// Add `expr AS name`.
    pub fn add_as(&mut self, expr: &str, name: &str) -> &mut Self {
        self.add(format!("{expr} AS {name}"))
    }

    /// Add several literal projections.
    pub fn add_all<I, S>(&mut self, projections: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for p in projections {
            self.add(p.into());
        }
        self
    }

    /// Expand every column of the FROM table (`alias.column` or `table.column`).
    pub fn all_from_main(&mut self) -> &mut Self {
        self.all_from_main = true;
        self
    }

    /// Expand every column of `target`, an alias or a table name.
    pub fn all_from(&mut self, target: impl Into<String>) -> &mut Self {
        let target = target.into();
        if !self.all_from.contains(&target) {
            self.all_from.push(target);
        }
        self
    }

    /// Exclude a column from wildcard expansion and from the metadata fallback.
    ///
    /// `column`, `alias.column` and `table.column` are all accepted.
    pub fn except(&mut self, column: impl Into<String>) -> &mut Self {
        self.excluded.push(column.into());
        self
    }

    pub fn except_all<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a nested SELECT projection and return it for configuration.
    pub fn subquery(&mut self) -> &mut SelectClause {
        self.push_subquery(None)
    }

    /// Add a nested SELECT projection rendered as `(...) AS alias`.
    pub fn subquery_as(&mut self, alias: impl Into<String>) -> &mut SelectClause {
        self.push_subquery(Some(alias.into()))
    }

    fn push_subquery(&mut self, alias: Option<String>) -> &mut SelectClause {
        self.projections.push(Projection::Subquery {
            select: Box::default(),
            alias,
        });
        match self.projections.last_mut() {
            Some(Projection::Subquery { select, .. }) => select,
            _ => unreachable!(),
        }
    }

    // ==================== FROM / JOIN ====================

    /// Select from `table`.
    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.from = Some(FromClause::table(table));
        self
    }

    /// Select from `table AS alias`.
    pub fn from_as(&mut self, table: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        let table = table.into();
        let alias = alias.into();
        self.aliases.register(alias.clone(), table.clone());
        self.from = Some(FromClause::table(table).with_alias(alias));
        self
    }

    /// Select from a nested SELECT, optionally aliased, and return it for configuration.
    pub fn from_select(&mut self, alias: Option<&str>) -> &mut SelectClause {
        let mut from = FromClause::subquery(SelectClause::new());
        from.alias = alias.map(str::to_string);
        match &mut self.from.insert(from).source {
            FromSource::Subquery(select) => select,
            FromSource::Table(_) => unreachable!(),
        }
    }

    /// Add a join and return it for configuring ON conditions.
    pub fn join(&mut self, kind: JoinKind, table: &str, alias: Option<&str>) -> &mut JoinClause {
        if let Some(alias) = alias {
            self.aliases.register(alias, table);
        }
        let i = self.joins.len();
        self.joins.push(JoinClause::new(kind, table, alias));
        &mut self.joins[i]
    }

    /// Add `INNER JOIN table [AS alias] ON (on)`.
    pub fn inner_join(&mut self, table: &str, alias: Option<&str>, on: impl Into<Part>) -> &mut Self {
        self.join(JoinKind::Inner, table, alias).on(on);
        self
    }

    /// Add `LEFT JOIN table [AS alias] ON (on)`.
    pub fn left_join(&mut self, table: &str, alias: Option<&str>, on: impl Into<Part>) -> &mut Self {
        self.join(JoinKind::Left, table, alias).on(on);
        self
    }

    /// Add `RIGHT JOIN table [AS alias] ON (on)`.
    pub fn right_join(&mut self, table: &str, alias: Option<&str>, on: impl Into<Part>) -> &mut Self {
        self.join(JoinKind::Right, table, alias).on(on);
        self
    }

    // ==================== WHERE / after WHERE ====================

    /// The WHERE clause, created empty on first access.
    pub fn where_clause(&mut self) -> &mut WhereClause {
        self.where_clause.get_or_insert_with(WhereClause::new)
    }

    /// Replace the WHERE clause.
    pub fn set_where(&mut self, clause: WhereClause) -> &mut Self {
        self.where_clause = Some(clause);
        self
    }

    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after_where
            .push(AfterWhere::GroupBy(GroupByClause::new(columns)));
        self
    }

    /// `ORDER BY` ascending on every column.
    pub fn order_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after_where
            .push(AfterWhere::OrderBy(OrderByClause::new(columns)));
        self
    }

    /// `ORDER BY` with a descending flag per column.
    pub fn order_by_with<I, S>(&mut self, columns: I, descs: &[bool]) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after_where
            .push(AfterWhere::OrderBy(OrderByClause::with_descs(columns, descs)));
        self
    }

    /// Append a pre-built ORDER BY.
    pub fn order(&mut self, clause: OrderByClause) -> &mut Self {
        self.after_where.push(AfterWhere::OrderBy(clause));
        self
    }

    /// Limit the result to `page_size` rows starting at `offset`.
    pub fn page(&mut self, offset: u64, page_size: u32) -> &mut Self {
        self.paging = Some(PagingClause::new(offset, page_size));
        self
    }

    pub fn page_request(&mut self, request: PageRequest) -> &mut Self {
        self.paging = Some(request.into());
        self
    }

    // ==================== Introspection ====================

    pub fn from_clause(&self) -> Option<&FromClause> {
        self.from.as_ref()
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    pub fn paging(&self) -> Option<&PagingClause> {
        self.paging.as_ref()
    }

    /// Wildcard targets in expansion order, the FROM table first when enabled.
    fn wildcard_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        if self.all_from_main {
            if let Some(from) = &self.from {
                if let Some(table) = from.table_name() {
                    targets.push(from.alias().unwrap_or(table));
                }
            }
        }
        for target in &self.all_from {
            if !targets.contains(&target.as_str()) {
                targets.push(target);
            }
        }
        targets
    }

    fn render_projections(&self, ctx: &RenderContext<'_>) -> SqlResult<Vec<String>> {
        let targets = self.wildcard_targets();
        if targets.is_empty() && self.projections.is_empty() {
            return match &self.from {
                Some(from) => match from.table_name() {
                    Some(table) => {
                        columns::unqualified_columns(ctx, from.alias(), table, &self.excluded)
                    }
                    None => Ok(Vec::new()),
                },
                None => Ok(Vec::new()),
            };
        }

        let mut items = Vec::new();
        for target in targets {
            items.extend(columns::expand_all_from(
                ctx,
                &self.aliases,
                target,
                &self.excluded,
            )?);
        }
        for projection in &self.projections {
            let text = projection.render(ctx)?;
            if !text.is_empty() {
                items.push(text);
            }
        }

        if items.is_empty() {
            let table = self
                .from
                .as_ref()
                .and_then(FromClause::table_name)
                .unwrap_or_default();
            return Err(SqlError::EmptyColumnList {
                table: table.to_string(),
            });
        }
        Ok(items)
    }
}

impl QueryPart for SelectClause {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let dialect = ctx.dialect();
        let delim = ctx.delim();

        let mut sql = String::from("SELECT ");
        if dialect.paging_before_columns() {
            if let Some(paging) = &self.paging {
                sql.push_str(&paging.render(ctx)?);
                sql.push(' ');
            }
        }

        sql.push_str(&self.render_projections(ctx)?.join(","));

        if let Some(from) = &self.from {
            sql.push_str(delim);
            sql.push_str(&from.render(ctx)?);
        }

        for join in &self.joins {
            sql.push_str(delim);
            sql.push_str(&join.render(ctx)?);
        }

        if let Some(clause) = &self.where_clause {
            let text = clause.render(ctx)?;
            if !text.is_empty() {
                sql.push_str(delim);
                sql.push_str(&text);
            }
        }

        for clause in &self.after_where {
            sql.push_str(delim);
            sql.push_str(&clause.render(ctx)?);
        }

        if !dialect.paging_before_columns() {
            if let Some(paging) = &self.paging {
                sql.push_str(delim);
                sql.push_str(&paging.render(ctx)?);
            }
        }

        Ok(sql)
    }
}
