mod postgres_repository;

pub use postgres_repository::{create_postgres_repository, PostgresRepository};

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connects a PostgreSQL pool, retrying while the database comes up.
///
/// Deployments routinely start the API before PostgreSQL finishes booting;
/// each attempt that fails is logged and retried after a short pause, up to
/// `retry_count` attempts.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!(attempt, "connected to PostgreSQL");
                return Ok(pool);
            }
            Err(err) if attempt < config.retry_count => {
                tracing::warn!(attempt, error = %err, "database not ready, retrying");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Err(err) => {
                return Err(anyhow::anyhow!(
                    "could not connect to PostgreSQL after {attempt} attempts: {err}"
                ));
            }
        }
    }
}
