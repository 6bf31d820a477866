//! # pg-querygen
//!
//! Parameterized SQL generation and thin data access for PostgreSQL-style
//! positional-placeholder drivers.
//!
//! Structured descriptions of data operations (select, count, insert,
//! update, delete, raw templated queries) compile into SQL text plus a
//! positionally-ordered value list (`$1`, `$2`, ...), ready for execution.
//!
//! ## Features
//!
//! - **Condition compilation**: key → scalar becomes `col = $n`, key → list
//!   becomes `col IN ($n, ...)`, with contiguous placeholder numbering from
//!   any offset
//! - **Statement building**: select / count / multi-row insert / update /
//!   delete over a schema-qualified table; mutating statements return their
//!   affected rows via `RETURNING *`
//! - **Named templates**: `:name` tokens in raw SQL rewritten to positional
//!   placeholders, with arrays expanded into `IN` lists
//! - **Value-expression mappings**: per-column transforms wrap placeholders
//!   in SQL expressions (e.g. `ST_GeomFromText($3)`) without touching bound
//!   values
//! - **Thin DAO layer**: metadata-driven per-table access over a sqlx pool,
//!   with optional snake_case → lowerCamelCase row keys
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pg_querygen::{Conditions, Database, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::builder("postgres://localhost/blog")
//!         .camel_case_keys(true)
//!         .build();
//!     let db = Database::connect(config).await?;
//!
//!     let articles = db.dao("blog", "articles")?;
//!
//!     // SELECT * FROM blog.articles AS articles WHERE published = $1
//!     let live = articles
//!         .find(&Conditions::new().eq("published", true))
//!         .await?;
//!
//!     // Raw templated query: arrays expand into IN lists.
//!     let named = serde_json::json!({
//!         "titles": ["First post", "Second post"]
//!     });
//!     let rows = db
//!         .raw_query_with(
//!             "SELECT * FROM blog.articles WHERE article_title IN (:titles)",
//!             named.as_object().unwrap(),
//!         )
//!         .await?;
//!
//!     let _ = (live, rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Query generation without a database
//!
//! The compiler layer is synchronous and side-effect-free; it can be used on
//! its own to produce `{text, values}` pairs for any positional-placeholder
//! driver:
//!
//! ```rust
//! use pg_querygen::{Conditions, QueryBuilder, TableMetadata};
//!
//! let qb = QueryBuilder::new(TableMetadata::new("blog", "articles"));
//! let query = qb.select_query_where(&Conditions::new().eq("article_id", 1));
//!
//! assert_eq!(
//!     query.text,
//!     "SELECT * FROM blog.articles AS articles WHERE article_id = $1"
//! );
//! assert_eq!(query.values, vec![serde_json::json!(1)]);
//! ```

pub mod conditions;
pub mod config;
pub mod dao;
pub mod db;
pub mod error;
pub mod executor;
pub mod mapping;
pub mod metadata;
pub mod sql;

// Re-export main types for convenience
pub use conditions::{ConditionValue, Conditions, Record};
pub use config::{DatabaseConfig, DatabaseConfigBuilder, MetadataSource};
pub use dao::Dao;
pub use db::Database;
pub use error::{QueryGenError, Result};
pub use mapping::{PropertyMappings, PropertyTransform};
pub use metadata::{ColumnMetadata, DatabaseMetadata, TableMetadata};
pub use sql::{
    ClauseOptions, ParameterizedQuery, QueryBuilder, ValueMode, build_condition_clause,
    rewrite_named_template,
};
