//! Statement builder: select / count / insert / update / delete
//!
//! Composes condition clause fragments into complete statements for one
//! table. Mutating statements always end with `RETURNING *` so the caller
//! gets the affected rows without a follow-up read; read statements never do.

use serde_json::Value;

use crate::conditions::{Conditions, Record};
use crate::error::{QueryGenError, Result};
use crate::mapping::PropertyMappings;
use crate::metadata::TableMetadata;
use crate::sql::ParameterizedQuery;
use crate::sql::condition::{ClauseOptions, build_condition_clause};

/// Builds parameterized statements for a single table
///
/// Holds only immutable configuration; every call allocates its own buffers,
/// so a builder can be shared freely across threads.
pub struct QueryBuilder {
    table: TableMetadata,
    mappings: PropertyMappings,
}

impl QueryBuilder {
    pub fn new(table: TableMetadata) -> Self {
        Self {
            table,
            mappings: PropertyMappings::new(),
        }
    }

    pub fn with_mappings(table: TableMetadata, mappings: PropertyMappings) -> Self {
        Self { table, mappings }
    }

    pub fn table(&self) -> &TableMetadata {
        &self.table
    }

    /// `SELECT * FROM schema.table AS table`
    pub fn select_query(&self) -> ParameterizedQuery {
        ParameterizedQuery::new(
            format!("SELECT * FROM {}", self.table.from_clause()),
            Vec::new(),
        )
    }

    /// `SELECT COUNT(*) as count FROM schema.table AS table`
    pub fn select_count_query(&self) -> ParameterizedQuery {
        ParameterizedQuery::new(
            format!("SELECT COUNT(*) as count FROM {}", self.table.from_clause()),
            Vec::new(),
        )
    }

    /// Select with a WHERE clause when the conditions carry values
    pub fn select_query_where(&self, conditions: &Conditions) -> ParameterizedQuery {
        self.filtered(self.select_query(), conditions)
    }

    /// Count with a WHERE clause when the conditions carry values
    pub fn select_count_query_where(&self, conditions: &Conditions) -> ParameterizedQuery {
        self.filtered(self.select_count_query(), conditions)
    }

    /// Multi-row insert over the unified column set
    ///
    /// The column set is the union of keys across all records in first-seen
    /// order; a record missing a key binds `null` for that column.
    /// Placeholders are laid out row-major, one contiguous block per record.
    pub fn insert_query(&self, records: &[Record]) -> Result<ParameterizedQuery> {
        if records.is_empty() {
            return Err(QueryGenError::EmptyInsert);
        }

        let columns = unified_columns(records);

        let mut tuples = Vec::with_capacity(records.len());
        let mut values = Vec::with_capacity(records.len() * columns.len());

        for (row, record) in records.iter().enumerate() {
            let source = Value::Object(record.clone());
            let mut exprs = Vec::with_capacity(columns.len());
            for (col, column) in columns.iter().enumerate() {
                let placeholder = format!("${}", col + 1 + columns.len() * row);
                exprs.push(self.mappings.expression(column, &source, &placeholder));
                // Mappings rewrite the SQL expression only; the bound value
                // is always the raw record value.
                values.push(record.get(*column).cloned().unwrap_or(Value::Null));
            }
            tuples.push(format!("({})", exprs.join(", ")));
        }

        Ok(ParameterizedQuery::new(
            format!(
                "INSERT INTO {} ({}) VALUES {} RETURNING *",
                self.table.qualified_name(),
                columns.join(", "),
                tuples.join(", ")
            ),
            values,
        ))
    }

    /// `UPDATE schema.table SET ... [WHERE ...] RETURNING *`
    ///
    /// The SET list compiles in mapped value-expression mode; the WHERE
    /// clause numbering continues after the SET list's placeholders.
    pub fn update_query(
        &self,
        updated_values: &Conditions,
        conditions: &Conditions,
    ) -> ParameterizedQuery {
        let set = build_condition_clause(
            updated_values,
            &self.mappings,
            &ClauseOptions::set_clause(),
        );
        let where_clause = build_condition_clause(
            conditions,
            &self.mappings,
            &ClauseOptions::where_clause(set.values.len()),
        );

        let base = format!(
            "UPDATE {} SET {}",
            self.table.qualified_name(),
            set.text
        );
        let mut values = set.values;
        values.extend(where_clause.values.iter().cloned());

        ParameterizedQuery::new(append_where(base, &where_clause, true), values)
    }

    /// `DELETE FROM schema.table [WHERE ...] RETURNING *`
    pub fn delete_query(&self, conditions: &Conditions) -> ParameterizedQuery {
        let where_clause = build_condition_clause(
            conditions,
            &self.mappings,
            &ClauseOptions::default(),
        );
        let base = format!("DELETE FROM {}", self.table.qualified_name());
        let values = where_clause.values.clone();

        ParameterizedQuery::new(append_where(base, &where_clause, true), values)
    }

    fn filtered(&self, base: ParameterizedQuery, conditions: &Conditions) -> ParameterizedQuery {
        let where_clause = build_condition_clause(
            conditions,
            &self.mappings,
            &ClauseOptions::default(),
        );
        let mut values = base.values;
        values.extend(where_clause.values.iter().cloned());

        ParameterizedQuery::new(append_where(base.text, &where_clause, false), values)
    }
}

/// Append ` WHERE <clause>` when the clause carries at least one value, and
/// ` RETURNING *` for mutating statements
/// Union of record keys in first-seen order
///
/// Determines both the insert column list and the row-major value layout,
/// so callers attributing bound values to columns must use the same order.
pub(crate) fn unified_columns(records: &[Record]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }
    columns
}

fn append_where(base: String, clause: &ParameterizedQuery, returning: bool) -> String {
    let mut text = base;
    if !clause.values.is_empty() {
        text.push_str(" WHERE ");
        text.push_str(&clause.text);
    }
    if returning {
        text.push_str(" RETURNING *");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(TableMetadata::new("s", "t"))
    }

    fn record(value: serde_json::Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("record helper expects an object"),
        }
    }

    // ==================== Select ====================

    #[test]
    fn test_select() {
        let query = builder().select_query();

        assert_eq!(query.text, "SELECT * FROM s.t AS t");
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_select_count() {
        let query = builder().select_count_query();

        assert_eq!(query.text, "SELECT COUNT(*) as count FROM s.t AS t");
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_select_with_conditions() {
        let query = builder().select_query_where(&Conditions::new().eq("article_id", 1));

        assert_eq!(query.text, "SELECT * FROM s.t AS t WHERE article_id = $1");
        assert_eq!(query.values, vec![json!(1)]);
    }

    #[test]
    fn test_select_with_empty_conditions_has_no_where() {
        let query = builder().select_query_where(&Conditions::new());

        assert_eq!(query.text, "SELECT * FROM s.t AS t");
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_select_with_list_condition() {
        let query = builder()
            .select_query_where(&Conditions::new().one_of("title", vec!["x", "y"]));

        assert_eq!(query.text, "SELECT * FROM s.t AS t WHERE title IN ($1, $2)");
        assert_eq!(query.values, vec![json!("x"), json!("y")]);
    }

    #[test]
    fn test_select_count_with_conditions() {
        let query =
            builder().select_count_query_where(&Conditions::new().eq("published", true));

        assert_eq!(
            query.text,
            "SELECT COUNT(*) as count FROM s.t AS t WHERE published = $1"
        );
        assert_eq!(query.values, vec![json!(true)]);
    }

    #[test]
    fn test_select_never_returns_rows_via_returning() {
        let query = builder().select_query_where(&Conditions::new().eq("id", 1));
        assert!(!query.text.contains("RETURNING"));
    }

    // ==================== Insert ====================

    #[test]
    fn test_insert_single_record() {
        let records = vec![record(json!({"a": 1, "b": 2}))];
        let query = builder().insert_query(&records).unwrap();

        assert_eq!(
            query.text,
            "INSERT INTO s.t (a, b) VALUES ($1, $2) RETURNING *"
        );
        assert_eq!(query.values, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_insert_unified_columns_with_null_fill() {
        let records = vec![record(json!({"a": 1, "b": 2})), record(json!({"a": 3}))];
        let query = builder().insert_query(&records).unwrap();

        assert_eq!(
            query.text,
            "INSERT INTO s.t (a, b) VALUES ($1, $2), ($3, $4) RETURNING *"
        );
        assert_eq!(query.values, vec![json!(1), json!(2), json!(3), Value::Null]);
    }

    #[test]
    fn test_insert_column_union_first_seen_order() {
        let records = vec![
            record(json!({"b": 1})),
            record(json!({"a": 2, "c": 3})),
            record(json!({"b": 4, "a": 5})),
        ];
        let query = builder().insert_query(&records).unwrap();

        assert_eq!(
            query.text,
            "INSERT INTO s.t (b, a, c) VALUES ($1, $2, $3), ($4, $5, $6), ($7, $8, $9) RETURNING *"
        );
        assert_eq!(
            query.values,
            vec![
                json!(1),
                Value::Null,
                Value::Null,
                Value::Null,
                json!(2),
                json!(3),
                json!(4),
                json!(5),
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_insert_empty_fails() {
        let result = builder().insert_query(&[]);
        assert!(matches!(result, Err(QueryGenError::EmptyInsert)));
    }

    #[test]
    fn test_insert_applies_mapped_expression_but_binds_raw_value() {
        let mappings = PropertyMappings::new()
            .with("location", |_, p| format!("ST_GeomFromText({p})"));
        let qb = QueryBuilder::with_mappings(TableMetadata::new("s", "t"), mappings);

        let records = vec![record(json!({"name": "hq", "location": "POINT(1 2)"}))];
        let query = qb.insert_query(&records).unwrap();

        assert_eq!(
            query.text,
            "INSERT INTO s.t (name, location) VALUES ($1, ST_GeomFromText($2)) RETURNING *"
        );
        assert_eq!(query.values, vec![json!("hq"), json!("POINT(1 2)")]);
    }

    // ==================== Update ====================

    #[test]
    fn test_update() {
        let query = builder().update_query(
            &Conditions::new().eq("title", "x"),
            &Conditions::new().eq("id", 1),
        );

        assert_eq!(
            query.text,
            "UPDATE s.t SET title = $1 WHERE id = $2 RETURNING *"
        );
        assert_eq!(query.values, vec![json!("x"), json!(1)]);
    }

    #[test]
    fn test_update_where_numbering_continues_after_set() {
        let query = builder().update_query(
            &Conditions::new().eq("title", "x").eq("body", "y"),
            &Conditions::new().eq("id", 1).one_of("status", vec!["a", "b"]),
        );

        assert_eq!(
            query.text,
            "UPDATE s.t SET title = $1, body = $2 WHERE id = $3 AND status IN ($4, $5) RETURNING *"
        );
        assert_eq!(
            query.values,
            vec![json!("x"), json!("y"), json!(1), json!("a"), json!("b")]
        );
    }

    #[test]
    fn test_unconditional_update_keeps_returning() {
        let query =
            builder().update_query(&Conditions::new().eq("title", "x"), &Conditions::new());

        assert_eq!(query.text, "UPDATE s.t SET title = $1 RETURNING *");
        assert_eq!(query.values, vec![json!("x")]);
    }

    #[test]
    fn test_update_with_mapped_set_expression() {
        let mappings = PropertyMappings::new()
            .with("location", |_, p| format!("ST_GeomFromText({p})"));
        let qb = QueryBuilder::with_mappings(TableMetadata::new("s", "t"), mappings);

        let query = qb.update_query(
            &Conditions::new().eq("location", "POINT(0 0)"),
            &Conditions::new().eq("location", "POINT(1 1)"),
        );

        // Mapped mode covers the SET list only; the WHERE clause stays bare.
        assert_eq!(
            query.text,
            "UPDATE s.t SET location = ST_GeomFromText($1) WHERE location = $2 RETURNING *"
        );
        assert_eq!(query.values, vec![json!("POINT(0 0)"), json!("POINT(1 1)")]);
    }

    // ==================== Delete ====================

    #[test]
    fn test_delete() {
        let query = builder().delete_query(&Conditions::new().eq("id", 1));

        assert_eq!(query.text, "DELETE FROM s.t WHERE id = $1 RETURNING *");
        assert_eq!(query.values, vec![json!(1)]);
    }

    #[test]
    fn test_unconditional_delete_keeps_returning() {
        let query = builder().delete_query(&Conditions::new());

        assert_eq!(query.text, "DELETE FROM s.t RETURNING *");
        assert!(query.values.is_empty());
    }
}
