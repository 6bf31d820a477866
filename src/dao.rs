//! Per-table data access
//!
//! A `Dao` pairs a [`QueryBuilder`] with the database executor. Mutating
//! calls return the rows produced by `RETURNING *`. When the table's
//! metadata declares column types, those types travel with each statement
//! so null values bind with the right parameter type.

use std::collections::HashMap;

use crate::conditions::{Conditions, Record};
use crate::db::Database;
use crate::error::Result;
use crate::executor::fetch_rows_typed;
use crate::mapping::PropertyMappings;
use crate::metadata::TableMetadata;
use crate::sql::QueryBuilder;
use crate::sql::query::unified_columns;

/// Data access object for one table
pub struct Dao<'a> {
    db: &'a Database,
    builder: QueryBuilder,
}

impl<'a> Dao<'a> {
    pub(crate) fn new(db: &'a Database, table: TableMetadata) -> Self {
        Self {
            db,
            builder: QueryBuilder::new(table),
        }
    }

    pub(crate) fn with_mappings(
        db: &'a Database,
        table: TableMetadata,
        mappings: PropertyMappings,
    ) -> Self {
        Self {
            db,
            builder: QueryBuilder::with_mappings(table, mappings),
        }
    }

    /// The query builder backing this DAO
    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Select every row of the table
    pub async fn find_all(&self) -> Result<Vec<Record>> {
        self.run(self.builder.select_query(), &[]).await
    }

    /// Select rows matching the conditions
    pub async fn find(&self, conditions: &Conditions) -> Result<Vec<Record>> {
        let null_types = condition_null_types(self.builder.table(), &[conditions]);
        self.run(self.builder.select_query_where(conditions), &null_types)
            .await
    }

    /// Select the first row matching the conditions, if any
    pub async fn find_one(&self, conditions: &Conditions) -> Result<Option<Record>> {
        let rows = self.find(conditions).await?;
        Ok(rows.into_iter().next())
    }

    /// Count every row of the table
    pub async fn count(&self) -> Result<i64> {
        let rows = fetch_rows_typed(self.db.pool(), &self.builder.select_count_query(), &[]).await?;
        Ok(extract_count(&rows))
    }

    /// Count rows matching the conditions
    pub async fn count_where(&self, conditions: &Conditions) -> Result<i64> {
        let query = self.builder.select_count_query_where(conditions);
        let null_types = condition_null_types(self.builder.table(), &[conditions]);
        let rows = fetch_rows_typed(self.db.pool(), &query, &null_types).await?;
        Ok(extract_count(&rows))
    }

    /// Insert records and return the created rows
    pub async fn create(&self, records: &[Record]) -> Result<Vec<Record>> {
        let query = self.builder.insert_query(records)?;
        let null_types = insert_null_types(self.builder.table(), records);
        self.run(query, &null_types).await
    }

    /// Update matching rows and return them
    pub async fn update(
        &self,
        updated_values: &Conditions,
        conditions: &Conditions,
    ) -> Result<Vec<Record>> {
        // SET values bind first, WHERE values after them.
        let null_types = condition_null_types(self.builder.table(), &[updated_values, conditions]);
        self.run(self.builder.update_query(updated_values, conditions), &null_types)
            .await
    }

    /// Delete matching rows and return them
    pub async fn delete(&self, conditions: &Conditions) -> Result<Vec<Record>> {
        let null_types = condition_null_types(self.builder.table(), &[conditions]);
        self.run(self.builder.delete_query(conditions), &null_types)
            .await
    }

    async fn run(
        &self,
        query: crate::sql::ParameterizedQuery,
        null_types: &[Option<String>],
    ) -> Result<Vec<Record>> {
        let rows = fetch_rows_typed(self.db.pool(), &query, null_types).await?;
        Ok(self.db.finalize_rows(rows))
    }
}

fn extract_count(rows: &[Record]) -> i64 {
    rows.first()
        .and_then(|row| row.get("count"))
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(0)
}

/// Declared column types from the table's metadata
fn declared_types(table: &TableMetadata) -> HashMap<&str, &str> {
    table
        .columns
        .iter()
        .filter_map(|c| c.data_type.as_deref().map(|t| (c.name.as_str(), t)))
        .collect()
}

/// Type hints for clause values, one per placeholder, in clause order
fn condition_null_types(table: &TableMetadata, groups: &[&Conditions]) -> Vec<Option<String>> {
    let types = declared_types(table);
    if types.is_empty() {
        return Vec::new();
    }

    let mut hints = Vec::new();
    for conditions in groups {
        for (column, value) in conditions.iter() {
            let hint = types.get(column.as_str()).map(|t| (*t).to_string());
            hints.extend(std::iter::repeat_n(hint, value.placeholder_count()));
        }
    }
    hints
}

/// Type hints for an insert's row-major value layout
fn insert_null_types(table: &TableMetadata, records: &[Record]) -> Vec<Option<String>> {
    let types = declared_types(table);
    if types.is_empty() {
        return Vec::new();
    }

    let columns = unified_columns(records);
    let mut hints = Vec::with_capacity(records.len() * columns.len());
    for _ in records {
        for column in &columns {
            hints.push(types.get(column).map(|t| (*t).to_string()));
        }
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ColumnMetadata;
    use serde_json::{Value, json};

    fn typed_table() -> TableMetadata {
        TableMetadata {
            schema: "public".to_string(),
            name: "articles".to_string(),
            columns: vec![
                ColumnMetadata {
                    name: "article_id".to_string(),
                    data_type: Some("bigint".to_string()),
                },
                ColumnMetadata {
                    name: "published".to_string(),
                    data_type: Some("boolean".to_string()),
                },
                ColumnMetadata {
                    name: "article_title".to_string(),
                    data_type: None,
                },
            ],
        }
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    // ==== NULL type hints ====

    #[test]
    fn test_insert_null_types_follow_row_major_layout() {
        let records = vec![
            record(json!({"article_id": 1, "published": true})),
            record(json!({"article_id": 2})),
        ];

        let hints = insert_null_types(&typed_table(), &records);
        assert_eq!(
            hints,
            vec![
                Some("bigint".to_string()),
                Some("boolean".to_string()),
                Some("bigint".to_string()),
                // Null-filled slot for the second record still carries the
                // column's declared type.
                Some("boolean".to_string()),
            ]
        );
    }

    #[test]
    fn test_condition_null_types_one_hint_per_placeholder() {
        let set = Conditions::new().eq("published", Value::Null);
        let filter = Conditions::new()
            .one_of("article_id", vec![1, 2])
            .eq("article_title", "x");

        let hints = condition_null_types(&typed_table(), &[&set, &filter]);
        assert_eq!(
            hints,
            vec![
                Some("boolean".to_string()),
                Some("bigint".to_string()),
                Some("bigint".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_no_hints_without_declared_types() {
        let table = TableMetadata::new("public", "articles");
        let records = vec![record(json!({"article_id": 1}))];

        assert!(insert_null_types(&table, &records).is_empty());
        let filter = Conditions::new().eq("article_id", 1);
        assert!(condition_null_types(&table, &[&filter]).is_empty());
    }
}
