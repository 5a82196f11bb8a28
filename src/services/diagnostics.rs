//! Diagnostic services - liveness, connectivity check, table sampling

use crate::core::{AppError, AppState};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Tables exposed through /testdb/{table}.
const SAMPLE_TABLES: [&str; 3] = ["usuarios", "bodegas", "items"];

/// Root endpoint - service is up
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

/// Service status. Never touches the database.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "service": "mysql-service",
        "port": state.service_port,
    }))
}

/// Connectivity check: a neutral `SELECT 1` through the pool, no tables
/// involved. Failures come back as 500 with the driver message.
#[instrument(skip(state))]
pub async fn db_ping(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.query("SELECT 1 AS ok", &[]).await {
        Ok(rows) => {
            let ok = rows
                .first()
                .and_then(|row| row.get("ok"))
                .and_then(Value::as_i64)
                == Some(1);
            debug!("MySQL connectivity check passed");
            Json(json!({ "ok": ok })).into_response()
        }
        Err(err) => {
            error!("MySQL connectivity check failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// First 5 rows of one of the sample tables.
#[instrument(skip(state), fields(table = %table))]
pub async fn sample_table(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !SAMPLE_TABLES.contains(&table.as_str()) {
        return Err(AppError::not_found("Unknown test table"));
    }

    let sql = format!("SELECT * FROM `{table}` LIMIT 5");
    let rows = state.store.query(&sql, &[]).await?;
    debug!("Sampled {} rows", rows.len());

    Ok(Json(json!({
        "ok": true,
        "table": table,
        "rows": rows,
    })))
}
