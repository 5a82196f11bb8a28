//! Dynamic row codec
//!
//! The dispatch is deliberately untyped: no per-table row structs exist, the
//! schema lives in the database. Rows travel as JSON objects (column name to
//! scalar value) and statement parameters travel as JSON scalars, so the
//! conversion in both directions lives here.
//!
//! Decoding is driven by the driver's reported column type. Anything the
//! match does not know is attempted as text and otherwise reported as null,
//! never as a decode error: one odd column must not poison a whole row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo, ValueRef};

/// A single result row: column name -> JSON scalar.
pub type JsonRow = Map<String, Value>;

/// Converts a driver row into a JSON object, one entry per column.
pub fn row_to_json(row: &MySqlRow) -> JsonRow {
    let mut out = Map::with_capacity(row.columns().len());
    for col in row.columns() {
        let value = column_to_value(row, col.ordinal(), col.type_info().name());
        out.insert(col.name().to_string(), value);
    }
    out
}

fn column_to_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(_) => {}
        Err(_) => return Value::Null,
    }

    match type_name {
        "BOOLEAN" => row
            .try_get::<bool, _>(index)
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<i64, _>(index)
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::Null),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "YEAR" => row
            .try_get::<u64, _>(index)
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::Null),
        "FLOAT" => float_value(row.try_get::<f32, _>(index).map(f64::from)),
        "DOUBLE" => float_value(row.try_get::<f64, _>(index)),
        // Kept as a string to preserve precision, as the MySQL text protocol does.
        "DECIMAL" => row
            .try_get::<Decimal, _>(index)
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
        "DATE" => row
            .try_get::<NaiveDate, _>(index)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        "TIME" => row
            .try_get::<NaiveTime, _>(index)
            .map(|t| Value::String(t.format("%H:%M:%S").to_string()))
            .unwrap_or(Value::Null),
        "DATETIME" => row
            .try_get::<NaiveDateTime, _>(index)
            .map(|dt| Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),
        "TIMESTAMP" => row
            .try_get::<DateTime<Utc>, _>(index)
            .map(|dt| Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),
        "JSON" => row.try_get::<Value, _>(index).unwrap_or(Value::Null),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned()))
            .unwrap_or(Value::Null),
        // CHAR, VARCHAR, TEXT variants, ENUM, SET and anything unforeseen
        _ => row
            .try_get::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

fn float_value(value: Result<f64, sqlx::Error>) -> Value {
    value
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Binds one JSON scalar as a statement parameter.
///
/// Arrays and objects are bound as their JSON text; MySQL has no richer
/// representation to offer them through a plain placeholder.
pub fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else {
                // Finite by construction: serde_json numbers are never NaN.
                query.bind(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        other => query.bind(other.to_string()),
    }
}
