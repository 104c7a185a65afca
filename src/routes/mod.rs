//! Route definitions for the storesync API.

pub mod clients;
pub mod dashboard;
pub mod executions;
pub mod health;
pub mod stores;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router with all API routes.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(e) => {
            tracing::warn!(
                frontend_url = %state.config.frontend_url,
                error = %e,
                "Invalid FRONTEND_URL, allowing any origin"
            );
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

    let api_routes = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/dashboard/current", get(dashboard::current))
        .route("/dashboard/refresh", post(dashboard::refresh))
        .route("/clients", get(clients::list))
        .route("/stores", get(stores::list))
        .route("/executions/today", get(executions::today))
        .route("/executions/history", get(executions::history));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api_routes)
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn fallback() -> crate::errors::AppError {
    crate::errors::AppError::NotFound("route".to_string())
}
