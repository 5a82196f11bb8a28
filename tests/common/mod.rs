use axum_test::TestServer;
use mysql_service::core::AppState;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_SERVICE_PORT: u16 = 3001;

/// Creates a lazy pool pointing at a port nothing listens on.
///
/// No connection is attempted until an endpoint actually touches the
/// database, so tests of the non-DB paths run without any MySQL around,
/// and tests of the failure paths fail fast.
pub fn unreachable_pool() -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy("mysql://root:@127.0.0.1:9/cubicaje")
        .expect("valid database url")
}

/// Creates an AppState for tests
pub fn create_test_state(pool: MySqlPool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_SERVICE_PORT))
}

/// Creates a TestServer wrapping the full application router
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = mysql_service::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}
