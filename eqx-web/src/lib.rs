//! eqx-web library - Equinox banking dashboard service
//!
//! Serves the dashboard pages (sign-in, home, verification workflow) and
//! their JSON API. Exposed as a library so integration tests can drive the
//! router directly.

pub mod api;
pub mod error;
pub mod identity;
pub mod store;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use eqx_common::config::AppConfig;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::identity::SessionIdentityProvider;
use crate::store::{ProfileStore, SqliteProfileStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Identity provider (sessions, sign-in/sign-up)
    pub identity: Arc<SessionIdentityProvider>,
    /// Profile store adapter
    pub store: Arc<dyn ProfileStore>,
    /// Resolved startup configuration
    pub config: Arc<AppConfig>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Wire the adapters from an initialized pool and resolved config
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let identity = Arc::new(SessionIdentityProvider::new(
            db.clone(),
            config.session_ttl_minutes,
        ));
        let store: Arc<dyn ProfileStore> = Arc::new(SqliteProfileStore::new(db.clone()));
        Self {
            db,
            identity,
            store,
            config: Arc::new(config),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// HTML pages handle their own auth gating (redirects); API routes answer
/// 401 JSON when the session is missing. /health and /sign-in are public.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    // JSON API
    let api = Router::new()
        .route("/api/auth/sign-up", post(api::auth::sign_up))
        .route("/api/auth/sign-in", post(api::auth::sign_in))
        .route("/api/auth/sign-out", post(api::auth::sign_out))
        .route("/api/verification/form", get(api::verification::form))
        .route("/api/verification/status", get(api::verification::status))
        .route("/api/verification/submit", post(api::verification::submit));

    // HTML pages
    let pages = Router::new()
        .route("/", get(api::ui::home_page))
        .route("/sign-in", get(api::ui::sign_in_page))
        .route("/verification", get(api::ui::verification_loader_page))
        .route("/verification/details", get(api::ui::verification_details_page));

    Router::new()
        .merge(api)
        .merge(pages)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
