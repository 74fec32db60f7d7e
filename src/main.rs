use anyhow::Result;
use arena_api::{connect_with_retry, create_router, AppConfig};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in development; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber to log to stdout
    tracing_subscriber::fmt::init();
    tracing::info!("Starting Arena API server...");

    let config = AppConfig::from_env()?;

    let pool = connect_with_retry(&config.database).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app = create_router(&config, pool)?;

    // Get optional bind endpoint from environment
    let endpoint = env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    info!("Starting at endpoint:{}", endpoint);
    info!("Starting Arena API server v{}...", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
