//! Named placeholder binding.
//!
//! Rendered statements carry `:name` placeholders. [`bind_named`] rewrites
//! them to the dialect's positional markers and collects the bound values in
//! marker order, ready to hand to a driver.
//!
//! Text inside single-quoted literals and double-quoted identifiers is left
//! alone, as are `::type` casts.

use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::params::ParamSource;
use serde::Serialize;
use serde_json::Value;

/// SQL with positional markers and the values they refer to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundSql {
    /// Rewritten SQL.
    pub sql: String,
    /// Values in positional order.
    pub values: Vec<Value>,
    /// Parameter name of each entry in `values`.
    pub names: Vec<String>,
}

enum Token<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Split `sql` into plain text and `:name` placeholders.
fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                // a doubled quote closes and reopens, which this loop handles as two literals
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                i += 1;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' if bytes.get(i + 1).copied().is_some_and(is_ident_start) => {
                if start < i {
                    tokens.push(Token::Text(&sql[start..i]));
                }
                let name_start = i + 1;
                let mut end = name_start;
                while end < bytes.len() && is_ident_char(bytes[end]) {
                    end += 1;
                }
                tokens.push(Token::Placeholder(&sql[name_start..end]));
                start = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        tokens.push(Token::Text(&sql[start..]));
    }
    tokens
}

/// Distinct placeholder names in order of first occurrence.
///
/// ```
/// let names = sqlclause::placeholder_names("a = :a AND b = ':x' AND c::int = :a OR d = :d");
/// assert_eq!(names, vec!["a", "d"]);
/// ```
pub fn placeholder_names(sql: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokenize(sql) {
        if let Token::Placeholder(name) = token {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Rewrite `:name` placeholders to positional markers and collect their values.
///
/// PostgreSQL markers are numbered and a repeated name reuses its number;
/// other dialects use `?` and repeat the value for every occurrence.
/// Fails with [`SqlError::UnknownParameter`](crate::SqlError::UnknownParameter)
/// when a name is not bound.
pub fn bind_named(sql: &str, dialect: Dialect, params: &dyn ParamSource) -> SqlResult<BoundSql> {
    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut names: Vec<String> = Vec::new();

    for token in tokenize(sql) {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Placeholder(name) => {
                let reuse = match dialect {
                    Dialect::Postgres => names.iter().position(|n| n == name),
                    Dialect::Default | Dialect::SqlServer => None,
                };
                let index = match reuse {
                    Some(pos) => pos + 1,
                    None => {
                        values.push(params.value_of(name)?);
                        names.push(name.to_string());
                        values.len()
                    }
                };
                out.push_str(&dialect.positional_marker(index));
            }
        }
    }

    Ok(BoundSql {
        sql: out,
        values,
        names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MapParams;
    use serde_json::json;

    #[test]
    fn test_placeholder_names_skip_quotes_and_casts() {
        let sql = r#"SELECT ':no', "col:x", created::date FROM t WHERE a = :a AND 'it''s :no' = :b_2"#;
        assert_eq!(placeholder_names(sql), vec!["a", "b_2"]);
    }

    #[test]
    fn test_colon_without_name_is_text() {
        assert!(placeholder_names("SELECT a : b, :1").is_empty());
    }

    #[test]
    fn test_bind_postgres_reuses_numbers() {
        let params = MapParams::new().with("id", 7).with("name", "Abc");
        let bound = bind_named(
            "WHERE id = :id OR parent = :id AND name = :name",
            Dialect::Postgres,
            &params,
        )
        .unwrap();
        assert_eq!(bound.sql, "WHERE id = $1 OR parent = $1 AND name = $2");
        assert_eq!(bound.values, vec![json!(7), json!("Abc")]);
        assert_eq!(bound.names, vec!["id", "name"]);
    }

    #[test]
    fn test_bind_question_marks_repeat_values() {
        let params = MapParams::new().with("id", 7).with("name", "Abc");
        let bound = bind_named(
            "WHERE id = :id OR parent = :id AND name = :name",
            Dialect::Default,
            &params,
        )
        .unwrap();
        assert_eq!(bound.sql, "WHERE id = ? OR parent = ? AND name = ?");
        assert_eq!(bound.values, vec![json!(7), json!(7), json!("Abc")]);
        assert_eq!(bound.names, vec!["id", "id", "name"]);
    }

    #[test]
    fn test_bind_unknown_parameter() {
        let err = bind_named("WHERE id = :id", Dialect::Postgres, &MapParams::new()).unwrap_err();
        assert!(err.is_unknown_parameter());
    }

    #[test]
    fn test_placeholder_at_end_and_unterminated_quote() {
        assert_eq!(placeholder_names("x = :tail"), vec!["tail"]);
        assert!(placeholder_names("x = ':open").is_empty());
    }
}
