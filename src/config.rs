//! Configuration for the database layer
//!
//! Provides a builder pattern for configuring connection, metadata source,
//! and row-key transformation.

use std::path::PathBuf;

/// Where the database metadata document comes from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetadataSource {
    /// No metadata: DAOs are constructed unchecked
    #[default]
    None,
    /// Inline JSON value
    Inline(serde_json::Value),
    /// JSON file read at connect time
    File(PathBuf),
}

/// Configuration for a [`crate::Database`]
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Source of the table metadata document
    pub metadata: MetadataSource,
    /// Whether returned row keys are transformed snake_case → lowerCamelCase
    pub camel_case_keys: bool,
}

impl DatabaseConfig {
    /// Create a new configuration builder
    pub fn builder(database_url: impl Into<String>) -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::new(database_url)
    }
}

/// Builder for DatabaseConfig
#[derive(Debug)]
pub struct DatabaseConfigBuilder {
    database_url: String,
    metadata: MetadataSource,
    camel_case_keys: bool,
}

impl DatabaseConfigBuilder {
    /// Create a new builder with the database URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            metadata: MetadataSource::None,
            camel_case_keys: false,
        }
    }

    /// Supply the metadata document inline
    pub fn metadata(mut self, document: serde_json::Value) -> Self {
        self.metadata = MetadataSource::Inline(document);
        self
    }

    /// Read the metadata document from a JSON file at connect time
    pub fn metadata_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata = MetadataSource::File(path.into());
        self
    }

    /// Enable or disable snake_case → lowerCamelCase row keys (default: false)
    pub fn camel_case_keys(mut self, enabled: bool) -> Self {
        self.camel_case_keys = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DatabaseConfig {
        DatabaseConfig {
            database_url: self.database_url,
            metadata: self.metadata,
            camel_case_keys: self.camel_case_keys,
        }
    }
}
