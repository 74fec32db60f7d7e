// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::env;

use handlers::{add_score, get_rank, get_user, get_weekly_scores, list_users};
use handlers::{health_check, metrics_handler, record_http_metrics, root_handler};
use handlers::{register_user, request_otp, verify_otp};

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod error;
mod handlers;
mod infrastructure;
mod services;

// Hoist up only the public symbol(s)
pub use error::{ApiError, ApiResult, ErrorBody};

pub use config::*;

pub use services::{RankingService, VerificationService, OTP_CODE_LEN};

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    connect_with_retry, // ---
    create_noop_metrics,
    create_postgres_repository,
    create_prom_metrics,
    PostgresRepository,
};

/// Build the HTTP router with metrics implementation determined by environment variables.
///
/// The database pool is passed in explicitly; there is no global engine
/// state. The caller owns pool creation and migrations.
pub fn create_router(config: &AppConfig, pool: PgPool) -> Result<Router> {
    // ---
    // Determine metrics implementation from environment
    let metrics_type = env::var("ARENA_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    // Create infrastructure dependencies
    let repository = create_postgres_repository(pool.clone());
    let clock = domain::create_system_clock();
    let notifier = domain::create_log_notifier();

    // Wire the workflow services
    let verification = VerificationService::new(
        repository.clone(),
        repository.clone(),
        clock.clone(),
        notifier,
        &config.otp,
    );
    let ranking = RankingService::new(repository.clone(), clock);

    // Build application state with all dependencies
    let app_state = AppState::new(verification, ranking, repository, metrics, pool);

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/register", post(register_user))
        .route("/request-otp/{phone}", post(request_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/scores", post(add_score))
        .route("/scores/rank/{user_id}", get(get_rank))
        .route("/scores/weekly/{user_id}", get(get_weekly_scores))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            record_http_metrics,
        ))
        .with_state(app_state);

    Ok(router)
}
