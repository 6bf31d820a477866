//! Condition clause compilation
//!
//! Turns a [`Conditions`] set into a WHERE- or SET-style clause fragment with
//! `$n` placeholders and an aligned value list. Placeholder numbering is
//! contiguous, 1-based, and starts after a caller-supplied offset so the
//! fragment can be spliced after an earlier clause in the same statement.

use serde_json::Value;

use crate::conditions::{ConditionValue, Conditions};
use crate::mapping::PropertyMappings;
use crate::sql::ParameterizedQuery;

/// How a placeholder becomes a SQL value expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMode {
    /// Emit the bare `$n` placeholder
    #[default]
    Placeholder,
    /// Pass the placeholder through the property mapping for the column
    Mapped,
}

/// Formatting options for a condition clause
#[derive(Debug, Clone)]
pub struct ClauseOptions {
    /// Token joining consecutive fragments (without surrounding spaces)
    pub separator: &'static str,
    /// Whether a space precedes the separator (`a = $1 AND b` vs `a = $1, b`)
    pub space_before_separator: bool,
    /// Placeholders already consumed by a preceding clause in the statement
    pub index_offset: usize,
    pub value_mode: ValueMode,
}

impl Default for ClauseOptions {
    fn default() -> Self {
        Self {
            separator: "AND",
            space_before_separator: true,
            index_offset: 0,
            value_mode: ValueMode::Placeholder,
        }
    }
}

impl ClauseOptions {
    /// AND-joined WHERE clause starting after `index_offset` placeholders
    pub fn where_clause(index_offset: usize) -> Self {
        Self {
            index_offset,
            ..Self::default()
        }
    }

    /// Comma-joined SET list with mapped value expressions
    pub fn set_clause() -> Self {
        Self {
            separator: ",",
            space_before_separator: false,
            index_offset: 0,
            value_mode: ValueMode::Mapped,
        }
    }
}

/// Compile a conditions set into a clause fragment
///
/// Scalar entries become `col = $n`, list entries become
/// `col IN ($n, $n+1, ...)` with one placeholder per element. The returned
/// value list aligns 1:1 with the emitted placeholders, numbered contiguously
/// from `options.index_offset + 1`.
pub fn build_condition_clause(
    conditions: &Conditions,
    mappings: &PropertyMappings,
    options: &ClauseOptions,
) -> ParameterizedQuery {
    let mut fragments: Vec<String> = Vec::with_capacity(conditions.len());
    let mut values: Vec<Value> = Vec::new();
    let mut next_index = options.index_offset + 1;

    // Source object handed to property transforms in mapped mode.
    let source = match options.value_mode {
        ValueMode::Mapped if !mappings.is_empty() => Some(conditions.to_value()),
        _ => None,
    };

    for (column, value) in conditions.iter() {
        match value {
            ConditionValue::Scalar(scalar) => {
                let expr = value_expression(column, next_index, &source, mappings);
                fragments.push(format!("{column} = {expr}"));
                values.push(scalar.clone());
                next_index += 1;
            }
            ConditionValue::List(items) => {
                let mut placeholders = Vec::with_capacity(items.len());
                for item in items {
                    placeholders.push(value_expression(column, next_index, &source, mappings));
                    values.push(item.clone());
                    next_index += 1;
                }
                fragments.push(format!("{column} IN ({})", placeholders.join(", ")));
            }
        }
    }

    let joint = format!(
        "{}{} ",
        if options.space_before_separator { " " } else { "" },
        options.separator
    );

    ParameterizedQuery::new(fragments.join(&joint), values)
}

fn value_expression(
    column: &str,
    index: usize,
    source: &Option<Value>,
    mappings: &PropertyMappings,
) -> String {
    let placeholder = format!("${index}");
    match source {
        Some(source) => mappings.expression(column, source, &placeholder),
        None => placeholder,
    }
}
