//! Renderable tree nodes.
//!
//! Every node of a statement tree implements [`QueryPart`]. Rendering is a
//! read-only walk: nodes never mutate themselves, so one tree can be rendered
//! any number of times, from several threads, against different parameters.

use crate::config::BuilderConfig;
use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::metadata::MetadataProvider;
use crate::params::ParamSource;
use crate::where_clause::WhereClause;
use std::fmt;
use std::sync::Arc;

/// Everything a node needs while rendering.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    config: &'a BuilderConfig,
    params: &'a dyn ParamSource,
    metadata: &'a dyn MetadataProvider,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        config: &'a BuilderConfig,
        params: &'a dyn ParamSource,
        metadata: &'a dyn MetadataProvider,
    ) -> Self {
        Self {
            config,
            params,
            metadata,
        }
    }

    pub fn config(&self) -> &'a BuilderConfig {
        self.config
    }

    pub fn params(&self) -> &'a dyn ParamSource {
        self.params
    }

    pub fn metadata(&self) -> &'a dyn MetadataProvider {
        self.metadata
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// Clause delimiter.
    pub fn delim(&self) -> &'a str {
        &self.config.delimiter
    }

    /// Schema-qualified table name.
    pub fn qualify(&self, table: &str) -> String {
        self.config.qualify(table)
    }

    /// Current metadata columns of `table` in the configured schema.
    pub fn columns_of(&self, table: &str) -> SqlResult<Vec<String>> {
        let schema = self.config.schema.as_deref();
        let columns = self.metadata.columns_of(schema, table)?;
        tracing::trace!(
            target: "sqlclause.metadata",
            schema = schema.unwrap_or("-"),
            table,
            columns = columns.len(),
            "resolved table columns"
        );
        Ok(columns)
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

/// A node that renders itself to SQL text.
pub trait QueryPart {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String>;
}

/// Render-time predicate over the bound parameters.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&dyn ParamSource) -> SqlResult<bool> + Send + Sync>);

impl Predicate {
    /// Wrap an infallible predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn ParamSource) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |params: &dyn ParamSource| -> SqlResult<bool> {
            Ok(f(params))
        }))
    }

    /// Wrap a predicate that may fail, e.g. on an unbound parameter.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&dyn ParamSource) -> SqlResult<bool> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// True when `name` is bound.
    pub fn has_value(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |params: &dyn ParamSource| params.has_value(&name))
    }

    /// True when `name` is bound to boolean `true`; fails if `name` is unbound.
    pub fn is_true(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::fallible(move |params: &dyn ParamSource| params.is_true(&name))
    }

    pub fn evaluate(&self, params: &dyn ParamSource) -> SqlResult<bool> {
        (self.0)(params)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Picks one of two parts at render time.
#[derive(Debug, Clone)]
pub struct Conditional {
    predicate: Predicate,
    on_true: Option<Box<Part>>,
    on_false: Option<Box<Part>>,
}

impl Conditional {
    /// A conditional with no branches; renders empty until one is set.
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            on_true: None,
            on_false: None,
        }
    }

    /// Part rendered when the predicate holds.
    pub fn then(mut self, part: impl Into<Part>) -> Self {
        self.on_true = Some(Box::new(part.into()));
        self
    }

    /// Part rendered when the predicate does not hold.
    pub fn otherwise(mut self, part: impl Into<Part>) -> Self {
        self.on_false = Some(Box::new(part.into()));
        self
    }
}

impl QueryPart for Conditional {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let branch = if self.predicate.evaluate(ctx.params())? {
            &self.on_true
        } else {
            &self.on_false
        };
        match branch {
            Some(part) => part.render(ctx),
            None => Ok(String::new()),
        }
    }
}

/// Leaf and composite fragments usable as conditions and projections.
#[derive(Debug, Clone)]
pub enum Part {
    /// Literal SQL text, rendered verbatim.
    Static(String),
    /// Render-time branch.
    Conditional(Conditional),
    /// Nested condition group, rendered without a keyword.
    Group(WhereClause),
    /// `column IN (:param)`.
    In { column: String, param: String },
    /// `left` followed by the dialect's concatenation of `terms`.
    Concat { left: String, terms: Vec<String> },
}

impl Part {
    pub fn raw(sql: impl Into<String>) -> Self {
        Part::Static(sql.into())
    }
}

impl QueryPart for Part {
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        match self {
            Part::Static(sql) => Ok(sql.clone()),
            Part::Conditional(cond) => cond.render(ctx),
            Part::Group(group) => group.render_body(ctx),
            Part::In { column, param } => Ok(ctx.dialect().in_list(column, param)),
            Part::Concat { left, terms } => Ok(format!("{left}{}", ctx.dialect().concat(terms))),
        }
    }
}

impl From<&str> for Part {
    fn from(sql: &str) -> Self {
        Part::Static(sql.to_string())
    }
}

impl From<String> for Part {
    fn from(sql: String) -> Self {
        Part::Static(sql)
    }
}

impl From<Conditional> for Part {
    fn from(cond: Conditional) -> Self {
        Part::Conditional(cond)
    }
}

impl From<WhereClause> for Part {
    fn from(group: WhereClause) -> Self {
        Part::Group(group)
    }
}
