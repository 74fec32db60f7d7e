//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains the
//! workflow services, the user directory, the metrics implementation, and
//! the database pool used by the health probe.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use crate::domain::{MetricsPtr, UserDirectoryPtr};
use crate::services::{RankingService, VerificationService};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application. Handlers depend on the workflow services and storage
/// abstractions held here, never on concrete implementations, and the
/// state is built once at startup and never mutated.
///
/// # Fields
///
/// - `verification`: registration / OTP issuance / verification workflow
/// - `ranking`: score submission / daily rank / weekly aggregation workflow
/// - `users`: user directory, for the plain lookup endpoints
/// - `metrics`: metrics implementation (Prometheus or no-op)
/// - `pool`: PostgreSQL pool, used directly only by the health probe
#[derive(Clone)]
pub(crate) struct AppState {
    verification: Arc<VerificationService>,
    ranking: Arc<RankingService>,
    users: UserDirectoryPtr,
    metrics: MetricsPtr,
    pool: PgPool,
}

impl AppState {
    // ---

    pub fn new(
        verification: Arc<VerificationService>,
        ranking: Arc<RankingService>,
        users: UserDirectoryPtr,
        metrics: MetricsPtr,
        pool: PgPool,
    ) -> Self {
        // ---
        AppState {
            verification,
            ranking,
            users,
            metrics,
            pool,
        }
    }

    /// Get a reference to the verification workflow.
    pub(crate) fn verification(&self) -> &VerificationService {
        // ---
        &self.verification
    }

    /// Get a reference to the ranking workflow.
    pub(crate) fn ranking(&self) -> &RankingService {
        // ---
        &self.ranking
    }

    /// Get a reference to the user directory.
    pub(crate) fn users(&self) -> &UserDirectoryPtr {
        // ---
        &self.users
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the database pool.
    pub(crate) fn pool(&self) -> &PgPool {
        // ---
        &self.pool
    }
}
