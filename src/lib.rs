//! mysql-service library - exposes the main modules for the binary and tests

pub mod core;
pub mod services;
pub mod store;

// Re-export the main types to simplify imports
pub use crate::core::{AppError, AppState, Config};

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Creates the application's main router.
///
/// Diagnostic routes are registered before the generic `{table}` captures;
/// axum gives static segments priority, so /health and friends are never
/// shadowed by a table name.
pub fn create_router(state: Arc<AppState>) -> Router {
    use services::*;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/db-ping", get(db_ping))
        .route("/testdb/{table}", get(sample_table))
        .merge(configure_resource_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Generic CRUD routes over the managed tables
fn configure_resource_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/{table}", get(list_rows).post(create_row).put(update_row))
        .route("/{table}/{id}", get(get_row).delete(delete_row))
}
