//! Database façade: connection pool, metadata, raw queries
//!
//! `Database` owns the pool and the loaded metadata document and hands out
//! per-table [`Dao`]s. Raw queries go through the named-template rewriter
//! before execution.

use heck::ToLowerCamelCase;
use sqlx::PgPool;

use crate::conditions::Record;
use crate::config::{DatabaseConfig, MetadataSource};
use crate::dao::Dao;
use crate::error::{QueryGenError, Result};
use crate::executor::fetch_rows;
use crate::mapping::PropertyMappings;
use crate::metadata::{DatabaseMetadata, TableMetadata};
use crate::sql::rewrite_named_template;

/// Entry point for data access: pool + configuration + metadata
pub struct Database {
    pool: PgPool,
    config: DatabaseConfig,
    metadata: Option<DatabaseMetadata>,
}

impl Database {
    /// Connect to the database and load metadata per the configuration
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        let pool = PgPool::connect(&config.database_url).await.map_err(|e| {
            QueryGenError::connection(format!("database connection failed: {e}"))
        })?;
        Self::from_pool(pool, config)
    }

    /// Build a database from an existing pool
    ///
    /// Use this when the pool is shared with other parts of the application.
    pub fn from_pool(pool: PgPool, config: DatabaseConfig) -> Result<Self> {
        let metadata = match &config.metadata {
            MetadataSource::None => None,
            MetadataSource::Inline(document) => {
                Some(DatabaseMetadata::from_value(document.clone())?)
            }
            MetadataSource::File(path) => Some(DatabaseMetadata::from_file(path)?),
        };

        Ok(Self {
            pool,
            config,
            metadata,
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Loaded metadata, when a source was configured
    pub fn metadata(&self) -> Option<&DatabaseMetadata> {
        self.metadata.as_ref()
    }

    /// Get a DAO for a table
    ///
    /// When metadata was configured the table must appear in it; without
    /// metadata the identity is taken as given.
    pub fn dao(&self, schema: &str, table: &str) -> Result<Dao<'_>> {
        Ok(Dao::new(self, self.table_metadata(schema, table)?))
    }

    /// Get a DAO with per-column value-expression mappings
    pub fn dao_with_mappings(
        &self,
        schema: &str,
        table: &str,
        mappings: PropertyMappings,
    ) -> Result<Dao<'_>> {
        Ok(Dao::with_mappings(
            self,
            self.table_metadata(schema, table)?,
            mappings,
        ))
    }

    /// Execute a raw SQL string with no named parameters
    pub async fn raw_query(&self, sql: &str) -> Result<Vec<Record>> {
        self.raw_query_with(sql, &Record::new()).await
    }

    /// Execute a raw SQL template with `:name` parameters
    ///
    /// The template is rewritten to positional-placeholder form before it
    /// reaches the driver.
    pub async fn raw_query_with(
        &self,
        sql: &str,
        named_values: &Record,
    ) -> Result<Vec<Record>> {
        let query = rewrite_named_template(sql, named_values);
        let rows = fetch_rows(&self.pool, &query).await?;
        Ok(self.finalize_rows(rows))
    }

    fn table_metadata(&self, schema: &str, table: &str) -> Result<TableMetadata> {
        match &self.metadata {
            Some(metadata) => metadata
                .table(schema, table)
                .cloned()
                .ok_or_else(|| QueryGenError::table_not_found(format!("{schema}.{table}"))),
            None => Ok(TableMetadata::new(schema, table)),
        }
    }

    /// Apply the configured row-key transform to a result set
    pub(crate) fn finalize_rows(&self, rows: Vec<Record>) -> Vec<Record> {
        if !self.config.camel_case_keys {
            return rows;
        }
        rows.into_iter().map(camel_case_record).collect()
    }
}

fn camel_case_record(record: Record) -> Record {
    record
        .into_iter()
        .map(|(key, value)| (key.to_lower_camel_case(), value))
        .collect()
}
