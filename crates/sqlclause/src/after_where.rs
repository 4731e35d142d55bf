//! GROUP BY, ORDER BY and paging.

use crate::error::{SqlError, SqlResult};
use crate::part::{QueryPart, RenderContext};

/// `GROUP BY a,b`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupByClause {
    columns: Vec<String>,
}

impl GroupByClause {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, column: impl Into<String>) -> &mut Self {
        self.columns.push(column.into());
        self
    }
}

impl QueryPart for GroupByClause {
    fn render(&self, _ctx: &RenderContext<'_>) -> SqlResult<String> {
        Ok(format!("GROUP BY {}", self.columns.join(",")))
    }
}

/// `ORDER BY a,b DESC`
///
/// Directions are kept parallel to the columns; a column without a matching
/// flag sorts ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderByClause {
    columns: Vec<String>,
    descs: Vec<bool>,
}

impl OrderByClause {
    /// Ascending order on every column.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            descs: Vec::new(),
        }
    }

    /// Columns with per-column descending flags.
    pub fn with_descs<I, S>(columns: I, descs: &[bool]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            descs: descs.to_vec(),
            ..Self::new(columns)
        }
    }

    pub fn asc(&mut self, column: impl Into<String>) -> &mut Self {
        self.push(column.into(), false)
    }

    pub fn desc(&mut self, column: impl Into<String>) -> &mut Self {
        self.push(column.into(), true)
    }

    fn push(&mut self, column: String, desc: bool) -> &mut Self {
        // pad pending flags so the new one lines up with its column
        self.descs.resize(self.columns.len(), false);
        self.columns.push(column);
        self.descs.push(desc);
        self
    }
}

impl QueryPart for OrderByClause {
    fn render(&self, _ctx: &RenderContext<'_>) -> SqlResult<String> {
        let items: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                if self.descs.get(i).copied().unwrap_or(false) {
                    format!("{col} DESC")
                } else {
                    col.clone()
                }
            })
            .collect();
        Ok(format!("ORDER BY {}", items.join(",")))
    }
}

/// Clauses placed after WHERE, rendered in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterWhere {
    GroupBy(GroupByClause),
    OrderBy(OrderByClause),
}

impl QueryPart for AfterWhere {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        match self {
            AfterWhere::GroupBy(c) => c.render(ctx),
            AfterWhere::OrderBy(c) => c.render(ctx),
        }
    }
}

/// Page number and size, converted to a row offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number.
    pub page: u64,
    pub size: u32,
}

impl PageRequest {
    pub fn of(page: u64, size: u32) -> Self {
        Self { page, size }
    }

    /// Zero-based row offset of the first row on this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(u64::from(self.size))
    }
}

/// Row window; its text and position depend on the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingClause {
    pub offset: u64,
    pub page_size: u32,
}

impl PagingClause {
    pub fn new(offset: u64, page_size: u32) -> Self {
        Self { offset, page_size }
    }
}

impl From<PageRequest> for PagingClause {
    fn from(req: PageRequest) -> Self {
        Self::new(req.offset(), req.size)
    }
}

impl QueryPart for PagingClause {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        if self.page_size == 0 {
            return Err(SqlError::InvalidPaging(
                "page size must be positive".to_string(),
            ));
        }
        Ok(ctx.dialect().paging(self.offset, self.page_size))
    }
}
