//! # sqlclause
//!
//! A builder for parameterized SQL statements whose column lists come from
//! table metadata at render time.
//!
//! ## Features
//!
//! - **Statement trees**: SELECT / INSERT / UPDATE / DELETE built once, rendered many times
//! - **Metadata-aware columns**: wildcard expansion and exclusions resolved per render
//! - **Conditional fragments**: include a condition only when a parameter is bound
//! - **Dialects**: paging and concatenation snippets for PostgreSQL, SQL Server and generic SQL
//! - **Safe defaults**: DELETE requires a rendered WHERE; INSERT/UPDATE require columns
//! - **Named placeholders**: `:name` in the output, rewritten to `$n` / `?` on request
//!
//! ## Example
//!
//! ```
//! use sqlclause::{BuilderConfig, MapParams, QueryBuilder, StaticMetadata, TableSchema};
//!
//! let meta = StaticMetadata::new()
//!     .with_table(TableSchema::new("items").with_columns(&["id", "name", "secret"]));
//!
//! let mut qb = QueryBuilder::new(BuilderConfig::new().with_schema("app").with_delimiter(" "));
//! let select = qb.select_as("items", "i");
//! select.all_from_main().except("i.secret");
//! select
//!     .where_clause()
//!     .add_if(|p| p.has_value("name"), "i.name = :name");
//!
//! let sql = qb.build(&MapParams::new(), &meta).unwrap();
//! assert_eq!(sql, "SELECT i.id,i.name FROM app.items AS i");
//!
//! let params = MapParams::new().with("name", "Abc");
//! let sql = qb.build(&params, &meta).unwrap();
//! assert_eq!(sql, "SELECT i.id,i.name FROM app.items AS i WHERE (i.name = :name)");
//! ```

pub mod after_where;
pub mod bind;
pub mod columns;
pub mod config;
pub mod delete;
pub mod dialect;
pub mod error;
pub mod insert;
pub mod metadata;
pub mod params;
pub mod part;
pub mod select;
pub mod statement;
pub mod traits;
pub mod update;
pub mod where_clause;

pub use after_where::{AfterWhere, GroupByClause, OrderByClause, PageRequest, PagingClause};
pub use bind::{BoundSql, bind_named, placeholder_names};
pub use columns::{AliasMap, resolve_columns, unqualified_columns};
pub use config::BuilderConfig;
pub use delete::DeleteClause;
pub use dialect::Dialect;
pub use error::{MetadataError, SqlError, SqlResult};
pub use insert::InsertClause;
pub use metadata::{MetadataProvider, StaticMetadata, TableSchema};
pub use params::{MapParams, NoParams, ParamSource};
pub use part::{Conditional, Part, Predicate, QueryPart, RenderContext};
pub use select::{FromClause, FromSource, JoinClause, JoinKind, SelectClause};
pub use statement::{QueryBuilder, Statement, StatementKind};
pub use traits::{ColumnSet, MutationClause};
pub use update::UpdateClause;
pub use where_clause::{Conjunction, WhereClause};
