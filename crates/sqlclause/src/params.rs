//! Named parameter sources.
//!
//! A [`ParamSource`] answers two questions at render time: whether a name is
//! bound, and what its value is. Conditional fragments use the former, and
//! [`bind_named`](crate::bind_named) uses the latter to turn `:name`
//! placeholders into positional values.

use crate::error::{SqlError, SqlResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only source of named parameter values.
pub trait ParamSource {
    /// Whether a value is bound for `name`.
    fn has_value(&self, name: &str) -> bool;

    /// The value bound for `name`, or [`SqlError::UnknownParameter`].
    fn value_of(&self, name: &str) -> SqlResult<Value>;

    /// The value bound for `name` when it is a boolean `true`.
    ///
    /// Fails with [`SqlError::UnknownParameter`] when the name is unbound.
    fn is_true(&self, name: &str) -> SqlResult<bool> {
        Ok(matches!(self.value_of(name)?, Value::Bool(true)))
    }

    /// Whether `name` is bound to something other than JSON `null`.
    fn has_non_null(&self, name: &str) -> bool {
        self.value_of(name).is_ok_and(|v| !v.is_null())
    }
}

impl<T: ParamSource + ?Sized> ParamSource for &T {
    fn has_value(&self, name: &str) -> bool {
        (**self).has_value(name)
    }

    fn value_of(&self, name: &str) -> SqlResult<Value> {
        (**self).value_of(name)
    }
}

impl<T: ParamSource + ?Sized> ParamSource for Arc<T> {
    fn has_value(&self, name: &str) -> bool {
        (**self).has_value(name)
    }

    fn value_of(&self, name: &str) -> SqlResult<Value> {
        (**self).value_of(name)
    }
}

/// In-memory parameter map.
///
/// # Example
///
/// ```
/// use sqlclause::{MapParams, ParamSource};
///
/// let params = MapParams::new().with("name", "Abc").with("is_active", true);
/// assert!(params.has_value("name"));
/// assert!(!params.has_value("secret"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapParams {
    values: BTreeMap<String, Value>,
}

impl MapParams {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Chainable form of [`add_value`](Self::add_value).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_value(name, value);
        self
    }

    /// Remove a binding, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Names of all bound parameters, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParamSource for MapParams {
    fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn value_of(&self, name: &str) -> SqlResult<Value> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| SqlError::unknown_parameter(name))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A parameter source with nothing bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParams;

impl ParamSource for NoParams {
    fn has_value(&self, _name: &str) -> bool {
        false
    }

    fn value_of(&self, name: &str) -> SqlResult<Value> {
        Err(SqlError::unknown_parameter(name))
    }
}
