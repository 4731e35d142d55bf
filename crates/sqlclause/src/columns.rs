//! Column resolution against live metadata.

use crate::error::SqlResult;
use crate::part::RenderContext;

/// Compute the final column list of a table.
///
/// A non-empty `explicit` list is used as given; exclusions do not apply to it.
/// Otherwise the table's metadata columns are fetched (in metadata order) and
/// every name present in `excluded` is dropped. Duplicates are removed in both
/// cases, keeping the first occurrence.
pub fn resolve_columns(
    ctx: &RenderContext<'_>,
    table: &str,
    explicit: &[String],
    excluded: &[String],
) -> SqlResult<Vec<String>> {
    let columns = if explicit.is_empty() {
        ctx.columns_of(table)?
            .into_iter()
            .filter(|c| !excluded.contains(c))
            .collect()
    } else {
        explicit.to_vec()
    };
    Ok(dedup(columns))
}

fn dedup(columns: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(columns.len());
    for col in columns {
        if !out.contains(&col) {
            out.push(col);
        }
    }
    out
}

/// Alias → table registrations of a SELECT, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    entries: Vec<(String, String)>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` for `table`. Re-registering an alias rebinds it in place.
    pub fn register(&mut self, alias: impl Into<String>, table: impl Into<String>) {
        let alias = alias.into();
        let table = table.into();
        match self.entries.iter_mut().find(|(a, _)| *a == alias) {
            Some(entry) => entry.1 = table,
            None => self.entries.push((alias, table)),
        }
    }

    /// Table registered for `alias`.
    pub fn table_of(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, t)| t.as_str())
    }

    /// First alias registered for `table`.
    pub fn alias_of(&self, table: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, t)| t == table)
            .map(|(a, _)| a.as_str())
    }

    /// Split a wildcard target into `(alias, table)`.
    ///
    /// The target is looked up as an alias first; otherwise it is taken as a
    /// table name and its first registered alias, if any, is used.
    pub fn resolve<'a>(&'a self, target: &'a str) -> (Option<&'a str>, &'a str) {
        match self.table_of(target) {
            Some(table) => (Some(target), table),
            None => (self.alias_of(target), target),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `column` of `table` (known as `alias`) matches an exclusion rule.
///
/// Rules may name the bare column, `alias.column` or `table.column`.
pub fn is_excluded(excluded: &[String], alias: Option<&str>, table: &str, column: &str) -> bool {
    excluded.iter().any(|rule| {
        rule == column
            || alias.is_some_and(|a| qualifies(rule, a, column))
            || qualifies(rule, table, column)
    })
}

fn qualifies(rule: &str, prefix: &str, column: &str) -> bool {
    rule.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|col| col == column)
}

/// Bare metadata columns of `table` (known as `alias`) that no exclusion rule matches.
///
/// Unlike [`resolve_columns`], rules may also name `alias.column` or `table.column`.
pub fn unqualified_columns(
    ctx: &RenderContext<'_>,
    alias: Option<&str>,
    table: &str,
    excluded: &[String],
) -> SqlResult<Vec<String>> {
    let columns = ctx
        .columns_of(table)?
        .into_iter()
        .filter(|col| !is_excluded(excluded, alias, table, col))
        .collect();
    Ok(dedup(columns))
}

/// Expand a "select all from" target into qualified projections.
///
/// Produces `target.column` for each metadata column of the underlying table
/// that no exclusion rule matches.
pub fn expand_all_from(
    ctx: &RenderContext<'_>,
    aliases: &AliasMap,
    target: &str,
    excluded: &[String],
) -> SqlResult<Vec<String>> {
    let (alias, table) = aliases.resolve(target);
    let columns = ctx.columns_of(table)?;
    Ok(columns
        .iter()
        .filter(|col| !is_excluded(excluded, alias, table, col))
        .map(|col| format!("{target}.{col}"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use crate::metadata::{StaticMetadata, TableSchema};
    use crate::params::NoParams;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn meta() -> StaticMetadata {
        StaticMetadata::new()
            .with_table(TableSchema::new("test_items").with_columns(&[
                "id",
                "name",
                "is_active",
                "secret",
                "remarks",
            ]))
            .with_table(TableSchema::new("test_join").with_columns(&["id", "t_id", "description"]))
    }

    #[test]
    fn test_resolve_from_metadata_minus_excluded() {
        let config = BuilderConfig::new();
        let meta = meta();
        let ctx = RenderContext::new(&config, &NoParams, &meta);

        let cols = resolve_columns(&ctx, "test_items", &[], &strings(&["secret", "id"])).unwrap();
        assert_eq!(cols, strings(&["name", "is_active", "remarks"]));
    }

    #[test]
    fn test_explicit_list_ignores_exclusions() {
        let config = BuilderConfig::new();
        let meta = meta();
        let ctx = RenderContext::new(&config, &NoParams, &meta);

        let cols = resolve_columns(
            &ctx,
            "test_items",
            &strings(&["name", "secret", "name"]),
            &strings(&["secret"]),
        )
        .unwrap();
        assert_eq!(cols, strings(&["name", "secret"]));
    }

    #[test]
    fn test_unknown_table_fails() {
        let config = BuilderConfig::new();
        let meta = meta();
        let ctx = RenderContext::new(&config, &NoParams, &meta);

        let err = resolve_columns(&ctx, "nope", &[], &[]).unwrap_err();
        assert!(err.is_metadata());
    }

    #[test]
    fn test_alias_map_resolution() {
        let mut aliases = AliasMap::new();
        aliases.register("t", "test_items");
        aliases.register("t2", "test_items");
        aliases.register("tj", "test_join");

        assert_eq!(aliases.resolve("t"), (Some("t"), "test_items"));
        assert_eq!(aliases.resolve("test_items"), (Some("t"), "test_items"));
        assert_eq!(aliases.resolve("other"), (None, "other"));

        aliases.register("t", "test_join");
        assert_eq!(aliases.resolve("t"), (Some("t"), "test_join"));
    }

    #[test]
    fn test_alias_shadowing_a_table_name() {
        let mut aliases = AliasMap::new();
        aliases.register("test_join", "test_items");
        aliases.register("j", "test_join");

        // the alias wins over the real table of the same name
        assert_eq!(aliases.resolve("test_join"), (Some("test_join"), "test_items"));
    }

    #[test]
    fn test_exclusion_forms() {
        let rules = strings(&["secret", "t.is_active", "test_items.remarks"]);
        assert!(is_excluded(&rules, Some("t"), "test_items", "secret"));
        assert!(is_excluded(&rules, Some("t"), "test_items", "is_active"));
        assert!(is_excluded(&rules, Some("t"), "test_items", "remarks"));
        assert!(!is_excluded(&rules, Some("t"), "test_items", "name"));
        assert!(!is_excluded(&rules, Some("x"), "other", "is_active"));
    }

    #[test]
    fn test_unqualified_columns_honour_every_rule_form() {
        let config = BuilderConfig::new();
        let meta = meta();
        let ctx = RenderContext::new(&config, &NoParams, &meta);

        let rules = strings(&["t.secret", "test_items.remarks", "id"]);
        let cols = unqualified_columns(&ctx, Some("t"), "test_items", &rules).unwrap();
        assert_eq!(cols, strings(&["name", "is_active"]));

        let cols = unqualified_columns(&ctx, None, "test_items", &rules).unwrap();
        assert_eq!(cols, strings(&["name", "is_active", "secret"]));
    }

    #[test]
    fn test_expand_all_from() {
        let config = BuilderConfig::new();
        let meta = meta();
        let ctx = RenderContext::new(&config, &NoParams, &meta);
        let mut aliases = AliasMap::new();
        aliases.register("tj", "test_join");

        let cols = expand_all_from(&ctx, &aliases, "tj", &strings(&["tj.id", "test_join.t_id"])).unwrap();
        assert_eq!(cols, strings(&["tj.description"]));

        let cols = expand_all_from(&ctx, &aliases, "test_join", &strings(&["tj.id"])).unwrap();
        assert_eq!(cols, strings(&["test_join.t_id", "test_join.description"]));
    }
}
