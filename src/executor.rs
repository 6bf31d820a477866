//! Query execution against a PostgreSQL pool
//!
//! Binds the JSON values of a [`ParameterizedQuery`] onto a sqlx query and
//! decodes result rows back into JSON objects by inspecting each column's
//! PostgreSQL type. The compiler never sees this layer; it only promises a
//! well-formed `{text, values}` pair.

use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::{Column, Row, TypeInfo};

use crate::conditions::Record;
use crate::error::Result;
use crate::sql::ParameterizedQuery;

/// Execute a query and decode every row into a JSON object
pub async fn fetch_rows(pool: &PgPool, query: &ParameterizedQuery) -> Result<Vec<Record>> {
    fetch_rows_typed(pool, query, &[]).await
}

/// Execute a query with per-value type hints for SQL NULLs
///
/// `null_types` runs parallel to `query.values` (it may be shorter or
/// empty) and names the declared column type behind each value, so a JSON
/// null binds with that parameter type instead of TEXT. Non-null values
/// ignore their hint; sqlx infers their type from the bound Rust value.
pub async fn fetch_rows_typed(
    pool: &PgPool,
    query: &ParameterizedQuery,
    null_types: &[Option<String>],
) -> Result<Vec<Record>> {
    tracing::debug!(
        sql = %query.text,
        params = query.values.len(),
        "executing query"
    );

    let mut prepared = sqlx::query(&query.text);
    for (index, value) in query.values.iter().enumerate() {
        let null_type = null_types.get(index).and_then(|t| t.as_deref());
        prepared = bind_json(prepared, value, null_type);
    }

    let rows = prepared.fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_record).collect())
}

/// Parameter type a SQL NULL binds with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NullKind {
    Int,
    Float,
    Bool,
    TimestampTz,
    Timestamp,
    Date,
    Uuid,
    Json,
    Text,
}

/// Map a declared column type to a NULL parameter type
///
/// Accepts both DDL spellings and internal names (`bigint`, `int8`).
/// Unknown or missing types fall back to text.
fn null_kind(data_type: Option<&str>) -> NullKind {
    let normalized = data_type.map(str::to_lowercase);
    match normalized.as_deref() {
        Some(
            "smallint" | "int2" | "integer" | "int" | "int4" | "bigint" | "int8" | "serial"
            | "bigserial",
        ) => NullKind::Int,
        Some("real" | "float4" | "double precision" | "float8" | "numeric" | "decimal") => {
            NullKind::Float
        }
        Some("boolean" | "bool") => NullKind::Bool,
        Some("timestamptz" | "timestamp with time zone") => NullKind::TimestampTz,
        Some("timestamp" | "timestamp without time zone") => NullKind::Timestamp,
        Some("date") => NullKind::Date,
        Some("uuid") => NullKind::Uuid,
        Some("json" | "jsonb") => NullKind::Json,
        _ => NullKind::Text,
    }
}

fn bind_null<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    data_type: Option<&str>,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match null_kind(data_type) {
        NullKind::Int => query.bind(None::<i64>),
        NullKind::Float => query.bind(None::<f64>),
        NullKind::Bool => query.bind(None::<bool>),
        NullKind::TimestampTz => query.bind(None::<chrono::DateTime<chrono::Utc>>),
        NullKind::Timestamp => query.bind(None::<chrono::NaiveDateTime>),
        NullKind::Date => query.bind(None::<chrono::NaiveDate>),
        NullKind::Uuid => query.bind(None::<uuid::Uuid>),
        NullKind::Json => query.bind(None::<Value>),
        NullKind::Text => query.bind(None::<String>),
    }
}

/// Bind a JSON scalar with a type-appropriate encoding
fn bind_json<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    value: &'q Value,
    null_type: Option<&str>,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match value {
        Value::Null => bind_null(query, null_type),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        // Arrays and objects travel as JSONB.
        other => query.bind(other),
    }
}

fn row_to_record(row: &PgRow) -> Record {
    let mut record = Record::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name());
        record.insert(column.name().to_string(), value);
    }
    record
}

/// Decode one column into JSON by PostgreSQL type name
///
/// Unknown types fall back to a textual read, then NULL.
fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
        "INT2" => int_value(row.try_get::<Option<i16>, _>(index).ok().flatten().map(i64::from)),
        "INT4" => int_value(row.try_get::<Option<i32>, _>(index).ok().flatten().map(i64::from)),
        "INT8" => int_value(row.try_get::<Option<i64>, _>(index).ok().flatten()),
        "FLOAT4" => float_value(
            row.try_get::<Option<f32>, _>(index)
                .ok()
                .flatten()
                .map(f64::from),
        ),
        "FLOAT8" => float_value(row.try_get::<Option<f64>, _>(index).ok().flatten()),
        "NUMERIC" => float_value(
            row.try_get::<Option<rust_decimal::Decimal>, _>(index)
                .ok()
                .flatten()
                .and_then(|d| d.to_f64()),
        ),
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .ok()
            .flatten()
            .map(|dt| Value::String(dt.to_rfc3339()))
            .unwrap_or(Value::Null),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|dt| Value::String(dt.and_utc().to_rfc3339()))
            .unwrap_or(Value::Null),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(index)
            .ok()
            .flatten()
            .map(|u| Value::String(u.to_string()))
            .unwrap_or(Value::Null),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(index)
            .ok()
            .flatten()
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

fn int_value(value: Option<i64>) -> Value {
    value
        .map(|i| Value::Number(serde_json::Number::from(i)))
        .unwrap_or(Value::Null)
}

fn float_value(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
