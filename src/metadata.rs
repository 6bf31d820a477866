//! Database metadata: table identities loadable from a JSON document
//!
//! Metadata identifies the tables a [`crate::Database`] may hand out DAOs
//! for. It can be supplied inline as a JSON value or read from a file. The
//! query compiler itself only consumes the table identity (schema + name);
//! column entries are informational.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Identity of a table: schema-qualified name, aliased as the table name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Schema the table lives in
    pub schema: String,
    /// Table name, also used as the alias in FROM clauses
    pub name: String,
    /// Known columns (informational, may be empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Schema-qualified table reference: `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// FROM clause body with the table aliased to its own name
    pub fn from_clause(&self) -> String {
        format!("{} AS {}", self.qualified_name(), self.name)
    }
}

/// A column entry in the metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// PostgreSQL type name as recorded in the metadata document
    #[serde(default, rename = "dataType", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// The full metadata document: every table known to the database layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
}

impl DatabaseMetadata {
    /// Parse metadata from an in-memory JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a metadata JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Look up a table by schema and name
    pub fn table(&self, schema: &str, name: &str) -> Option<&TableMetadata> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }
}
