//! Named-parameter template rewriting
//!
//! Rewrites SQL text containing `:name` tokens into positional-placeholder
//! form. Array values expand to a comma-joined run of fresh placeholders (the
//! template author writes `IN (:name)`); scalars take a single placeholder.
//! One global counter is threaded through the scan, so indices increase
//! monotonically in token order and the value list aligns with them.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::sql::ParameterizedQuery;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+)").unwrap())
}

/// Rewrite `:name` tokens into `$n` placeholders with an aligned value list
///
/// Each occurrence of a token binds a fresh placeholder, including repeats of
/// the same name. A token whose name has no entry in `named_values`, or one
/// directly preceded by another colon (a PostgreSQL `::type` cast), is left
/// verbatim.
pub fn rewrite_named_template(
    template: &str,
    named_values: &serde_json::Map<String, Value>,
) -> ParameterizedQuery {
    let mut text = String::with_capacity(template.len());
    let mut values: Vec<Value> = Vec::new();
    let mut next_index = 1usize;
    let mut cursor = 0usize;

    for capture in token_pattern().captures_iter(template) {
        let token = capture.get(0).unwrap();
        let name = capture.get(1).unwrap().as_str();

        text.push_str(&template[cursor..token.start()]);
        cursor = token.end();

        let is_cast = token.start() > 0 && template.as_bytes()[token.start() - 1] == b':';
        match named_values.get(name) {
            Some(value) if !is_cast => match value {
                Value::Array(items) => {
                    let mut placeholders = Vec::with_capacity(items.len());
                    for item in items {
                        placeholders.push(format!("${next_index}"));
                        values.push(item.clone());
                        next_index += 1;
                    }
                    text.push_str(&placeholders.join(", "));
                }
                scalar => {
                    text.push_str(&format!("${next_index}"));
                    values.push(scalar.clone());
                    next_index += 1;
                }
            },
            _ => text.push_str(token.as_str()),
        }
    }
    text.push_str(&template[cursor..]);

    ParameterizedQuery::new(text, values)
}
