//! WHERE / ON condition lists.
//!
//! Children are rendered individually parenthesized and joined by the clause
//! delimiter plus one conjunction shared by the whole clause. The conjunction
//! is whatever the last call to [`WhereClause::and`], [`WhereClause::or`] or
//! [`WhereClause::set_conjunction`] chose; mixing per pair needs a nested
//! group (see [`WhereClause::add_group`]).

use crate::error::SqlResult;
use crate::part::{Conditional, Part, Predicate, QueryPart, RenderContext};
use crate::params::ParamSource;

/// Operator placed between consecutive conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Where,
    On,
}

impl Keyword {
    fn as_str(self) -> &'static str {
        match self {
            Keyword::Where => "WHERE",
            Keyword::On => "ON",
        }
    }
}

/// Ordered list of conditions rendered as `WHERE (...) AND (...)`.
#[derive(Debug, Clone)]
pub struct WhereClause {
    keyword: Keyword,
    children: Vec<Part>,
    conj: Conjunction,
}

impl Default for WhereClause {
    fn default() -> Self {
        Self::new()
    }
}

impl WhereClause {
    /// Create an empty WHERE clause.
    pub fn new() -> Self {
        Self {
            keyword: Keyword::Where,
            children: Vec::new(),
            conj: Conjunction::And,
        }
    }

    /// Create an empty ON clause (join conditions).
    pub fn on() -> Self {
        Self {
            keyword: Keyword::On,
            ..Self::new()
        }
    }

    /// Create a clause from literal conditions.
    pub fn from_conditions<I, S>(conds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut clause = Self::new();
        clause.add_all(conds);
        clause
    }

    /// Set the conjunction for the whole clause.
    pub fn set_conjunction(&mut self, conj: Conjunction) -> &mut Self {
        self.conj = conj;
        self
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conj
    }

    /// Add a condition (literal text, conditional, or nested group).
    pub fn add(&mut self, cond: impl Into<Part>) -> &mut Self {
        self.children.push(cond.into());
        self
    }

    /// Add several literal conditions.
    pub fn add_all<I, S>(&mut self, conds: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children
            .extend(conds.into_iter().map(|c| Part::Static(c.into())));
        self
    }

    /// Switch the clause to AND and add a condition.
    pub fn and(&mut self, cond: impl Into<Part>) -> &mut Self {
        self.conj = Conjunction::And;
        self.add(cond)
    }

    /// Switch the clause to OR and add a condition.
    pub fn or(&mut self, cond: impl Into<Part>) -> &mut Self {
        self.conj = Conjunction::Or;
        self.add(cond)
    }

    /// Add a nested group rendered as one parenthesized condition.
    pub fn add_group(&mut self, group: WhereClause) -> &mut Self {
        self.add(Part::Group(group))
    }

    /// Add `cond` only when `active` is true (decided now, not at render time).
    pub fn add_when(&mut self, active: bool, cond: impl Into<Part>) -> &mut Self {
        if active {
            self.add(cond);
        }
        self
    }

    /// Add one of two conditions, decided now.
    pub fn add_when_else(
        &mut self,
        active: bool,
        on_true: impl Into<Part>,
        on_false: impl Into<Part>,
    ) -> &mut Self {
        if active {
            self.add(on_true)
        } else {
            self.add(on_false)
        }
    }

    /// Add `cond` when `predicate` holds for the parameters at render time.
    pub fn add_if<F>(&mut self, predicate: F, cond: impl Into<Part>) -> &mut Self
    where
        F: Fn(&dyn ParamSource) -> bool + Send + Sync + 'static,
    {
        self.add(Conditional::new(Predicate::new(predicate)).then(cond))
    }

    /// Add one of two conditions, chosen at render time.
    pub fn add_if_else<F>(
        &mut self,
        predicate: F,
        on_true: impl Into<Part>,
        on_false: impl Into<Part>,
    ) -> &mut Self
    where
        F: Fn(&dyn ParamSource) -> bool + Send + Sync + 'static,
    {
        self.add(
            Conditional::new(Predicate::new(predicate))
                .then(on_true)
                .otherwise(on_false),
        )
    }

    /// Add a pre-built conditional.
    pub fn add_conditional(&mut self, cond: Conditional) -> &mut Self {
        self.add(cond)
    }

    /// Add `column IN (:param)`.
    pub fn add_in(&mut self, column: impl Into<String>, param: impl Into<String>) -> &mut Self {
        self.add(Part::In {
            column: column.into(),
            param: param.into(),
        })
    }

    /// Add `left` followed by the dialect's concatenation of `terms`.
    pub fn add_concat<S: Into<String>>(
        &mut self,
        left: impl Into<String>,
        terms: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.add(Part::Concat {
            left: left.into(),
            terms: terms.into_iter().map(Into::into).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Render the conditions without the leading keyword.
    ///
    /// Children that render to empty text (an unmatched conditional) are
    /// skipped along with their conjunction.
    pub fn render_body(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let mut out = String::new();
        let mut n = 0usize;
        for child in &self.children {
            let text = child.render(ctx)?;
            if text.is_empty() {
                continue;
            }
            if n > 0 {
                out.push_str(ctx.delim());
                out.push_str(self.conj.as_str());
                out.push(' ');
            }
            out.push('(');
            out.push_str(&text);
            out.push(')');
            n += 1;
        }
        Ok(out)
    }
}

impl QueryPart for WhereClause {
    /// Renders to empty text when no condition produced output.
    fn render(&self, ctx: &RenderContext<'_>) -> SqlResult<String> {
        let body = self.render_body(ctx)?;
        if body.is_empty() {
            return Ok(body);
        }
        Ok(format!("{} {}", self.keyword.as_str(), body))
    }
}
