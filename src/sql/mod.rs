//! SQL generation: condition clauses, full statements, named templates

pub mod condition;
pub mod query;
pub mod template;

pub use condition::{ClauseOptions, ValueMode, build_condition_clause};
pub use query::QueryBuilder;
pub use template::rewrite_named_template;

/// A fully-bound query: SQL text plus positionally-ordered values
///
/// Invariant: the number of `$n` placeholders in `text` equals
/// `values.len()`, and `$i` refers to `values[i - 1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterizedQuery {
    pub text: String,
    pub values: Vec<serde_json::Value>,
}

impl ParameterizedQuery {
    pub fn new(text: impl Into<String>, values: Vec<serde_json::Value>) -> Self {
        Self {
            text: text.into(),
            values,
        }
    }
}
