//! API module
//!
//! HTTP API endpoints, middleware and the shared handler state.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::repository::postgres::{
    PgCartRepository, PgProductCatalog, PgSessionRepository, PgUserRepository,
};
use crate::repository::{CartRepository, ProductCatalog, SessionRepository, UserRepository};
use crate::services::{CartService, UserProfileService};

pub use routes::{create_router, public_router};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ProductCatalog>,
    pub sessions: Arc<dyn SessionRepository>,
    pub carts: CartService,
    pub profiles: UserProfileService,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        carts: Arc<dyn CartRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            carts: CartService::new(carts, catalog.clone()),
            profiles: UserProfileService::new(users, catalog.clone()),
            catalog,
            sessions,
        }
    }

    /// State backed by PostgreSQL adapters sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgProductCatalog::new(pool.clone())),
            Arc::new(PgCartRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgSessionRepository::new(pool)),
        )
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Layers run last-added first: logging -> auth -> handler
    let protected_routes = create_router().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::auth_middleware,
    ));

    let api_routes = public_router()
        .merge(protected_routes)
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
