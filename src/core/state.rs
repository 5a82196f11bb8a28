//! Application state shared across all routes
//!
//! The pool is built once (in `main` or in a test harness) and injected
//! here; nothing in the crate reaches for a global connection handle.

use crate::store::MysqlStore;
use sqlx::MySqlPool;

pub struct AppState {
    /// Generic CRUD dispatch over the managed tables
    pub store: MysqlStore,

    /// Port the service listens on, reported by /health
    pub service_port: u16,
}

impl AppState {
    /// Creates the state from a ready connection pool.
    ///
    /// # Arguments
    /// * `pool` - shared MySQL connection pool
    /// * `service_port` - port the HTTP listener is bound to
    pub fn new(pool: MySqlPool, service_port: u16) -> Self {
        Self {
            store: MysqlStore::new(pool),
            service_port,
        }
    }
}
