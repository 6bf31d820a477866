//! Per-column value-expression transforms
//!
//! A mapping lets a caller wrap a placeholder in a SQL expression (for
//! example `ST_GeomFromText($3)`) instead of emitting it bare. Mappings are
//! consulted only in mapped value-expression mode (SET lists and insert
//! tuples); a column without an entry falls through to the bare placeholder.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A transform from `(source_object, placeholder)` to a SQL expression
pub type PropertyTransform = Box<dyn Fn(&Value, &str) -> String + Send + Sync>;

/// Optional column → transform mapping
#[derive(Default)]
pub struct PropertyMappings {
    transforms: HashMap<String, PropertyTransform>,
}

impl PropertyMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform for a column
    pub fn with<F>(mut self, column: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Value, &str) -> String + Send + Sync + 'static,
    {
        self.transforms.insert(column.into(), Box::new(transform));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// SQL expression for a placeholder bound to `column`
    ///
    /// Applies the registered transform when one exists, otherwise returns
    /// the placeholder unchanged.
    pub fn expression(&self, column: &str, source: &Value, placeholder: &str) -> String {
        match self.transforms.get(column) {
            Some(transform) => transform(source, placeholder),
            None => placeholder.to_string(),
        }
    }
}

impl fmt::Debug for PropertyMappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut columns: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        columns.sort_unstable();
        f.debug_struct("PropertyMappings")
            .field("columns", &columns)
            .finish()
    }
}
