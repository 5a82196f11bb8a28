use mysql_service::core::config::MAX_CONNECTIONS;
use mysql_service::{AppState, Config, create_router};
use sqlx::mysql::MySqlPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    config.log_info();

    // Lazy pool: the service comes up even when MySQL is down, and /db-ping
    // reports the real connectivity state.
    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy(&config.database_url())?;

    let state = Arc::new(AppState::new(pool, config.service_port));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.service_port));
    let listener = TcpListener::bind(addr).await?;
    info!("Mysql service online in port {}", config.service_port);

    axum::serve(listener, app).await?;

    Ok(())
}
