//! Resource services - generic CRUD endpoints over the managed tables
//!
//! Every handler resolves the path's table name against the closed registry
//! first (unknown names are 404, no SQL is ever built from arbitrary path
//! input) and then delegates to the store. Row identifiers taken from the
//! URL are bound as strings; MySQL coerces them against numeric key columns.

use crate::core::{AppError, AppState};
use crate::store::{InsertBody, Table};
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

fn resolve(table: &str) -> Result<Table, AppError> {
    Table::from_name(table).ok_or_else(|| {
        warn!("Rejected unknown table '{table}'");
        AppError::not_found("Unknown table")
    })
}

fn require_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::bad_request("Body must be a JSON object")),
    }
}

/// Splits the legacy `{data, params}` wire form out of a request body.
///
/// A body carrying an object `data` and a non-empty string `params` is the
/// explicit mode: `params` is the comma-separated column list and `data`
/// supplies the values in its own key order. Anything else is a plain
/// field -> value object.
fn parse_insert_body(body: Value) -> Result<InsertBody, AppError> {
    let map = require_object(body)?;

    let explicit = match (map.get("data"), map.get("params")) {
        (Some(Value::Object(data)), Some(Value::String(params))) if !params.is_empty() => {
            Some((data.clone(), params.clone()))
        }
        _ => None,
    };

    if let Some((data, params)) = explicit {
        let columns: Vec<String> = params
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        let values: Vec<Value> = data.into_iter().map(|(_, v)| v).collect();

        Ok(InsertBody::Explicit { columns, values })
    } else {
        Ok(InsertBody::Row(map))
    }
}

#[instrument(skip(state), fields(table = %table))]
pub async fn list_rows(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
) -> Result<Json<Value>, AppError> {
    let table = resolve(&table)?;
    let rows = state.store.list(table.name()).await?;
    debug!("Listed {} rows", rows.len());
    Ok(Json(json!({ "ok": true, "data": rows })))
}

#[instrument(skip(state), fields(table = %table, id = %id))]
pub async fn get_row(
    State(state): State<Arc<AppState>>,
    Path((table, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let table = resolve(&table)?;
    let row = state.store.get(table.name(), &Value::String(id)).await?;
    if row.is_none() {
        debug!("Row not found");
    }
    // An absent row is data: null, not an error
    Ok(Json(json!({ "ok": true, "data": row })))
}

#[instrument(skip(state, body), fields(table = %table))]
pub async fn create_row(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let table = resolve(&table)?;
    let body = parse_insert_body(body)?;
    let outcome = state.store.insert(table.name(), body).await?;
    info!("Inserted row {}", outcome.last_insert_id);
    Ok(Json(json!({
        "ok": true,
        "inserted_id": outcome.last_insert_id,
        "affected_rows": outcome.rows_affected,
    })))
}

#[instrument(skip(state, body), fields(table = %table))]
pub async fn update_row(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let table = resolve(&table)?;
    let data = require_object(body)?;
    let outcome = state.store.update(table.name(), data).await?;
    info!("Updated {} rows", outcome.rows_affected);
    Ok(Json(json!({
        "ok": true,
        "affected_rows": outcome.rows_affected,
    })))
}

#[instrument(skip(state), fields(table = %table, id = %id))]
pub async fn delete_row(
    State(state): State<Arc<AppState>>,
    Path((table, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let table = resolve(&table)?;
    let outcome = state.store.remove(table.name(), &Value::String(id)).await?;
    // Zero affected rows is a successful no-op, not an error
    info!("Deleted {} rows", outcome.rows_affected);
    Ok(Json(json!({
        "ok": true,
        "affected_rows": outcome.rows_affected,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bodies_parse_as_rows() {
        let body = parse_insert_body(json!({"nombre": "caja", "peso": 2})).unwrap();
        match body {
            InsertBody::Row(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("nombre"), Some(&json!("caja")));
            }
            other => panic!("expected Row, got {other:?}"),
        }
    }

    #[test]
    fn data_params_bodies_parse_as_explicit() {
        let body = parse_insert_body(json!({
            "params": "nombre, ciudad",
            "data": {"nombre": "central", "ciudad": "Quito"},
        }))
        .unwrap();

        match body {
            InsertBody::Explicit { columns, values } => {
                assert_eq!(columns, vec!["nombre", "ciudad"]);
                assert_eq!(values, vec![json!("central"), json!("Quito")]);
            }
            other => panic!("expected Explicit, got {other:?}"),
        }
    }

    #[test]
    fn empty_params_falls_back_to_plain_mode() {
        let body = parse_insert_body(json!({"params": "", "data": {"a": 1}})).unwrap();
        assert!(matches!(body, InsertBody::Row(_)));
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(parse_insert_body(json!([1, 2, 3])).is_err());
        assert!(parse_insert_body(json!("nope")).is_err());
        assert!(parse_insert_body(Value::Null).is_err());
    }
}
