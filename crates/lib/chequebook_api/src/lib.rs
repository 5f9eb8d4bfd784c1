//! # chequebook_api
//!
//! HTTP API library for the cheque book reorder service.

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use chequebook_core::store::ChequebookStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, customers, fallback, health, subscriptions, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend.
    pub store: Arc<dyn ChequebookStore>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
///
/// Delegates to `chequebook_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    chequebook_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new().route(routes::POST_AUTH_LOGIN, post(auth::login_handler));

    // Identity is optional
    let optional = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::optional_auth,
        ));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_USERS, get(users::list_users_handler))
        .route(routes::GET_CUSTOMER, get(customers::customer_handler))
        .route(
            routes::GET_SUBSCRIPTIONS,
            get(subscriptions::list_subscriptions_handler),
        )
        .route(
            routes::GET_SUBSCRIPTIONS_BY_STATUS,
            get(subscriptions::list_subscriptions_by_status_handler),
        )
        .route(routes::POST_SUBSCRIBE, post(subscriptions::subscribe_handler))
        .route(
            routes::PUT_SUBSCRIPTION,
            put(subscriptions::update_subscription_handler),
        )
        .route(
            routes::PUT_UNSUBSCRIBE,
            put(subscriptions::unsubscribe_handler),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(optional)
        .merge(protected)
        .fallback(fallback::route_not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
