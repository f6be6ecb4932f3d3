//! Route definitions for the Rentora API

mod auth;
mod booking;
mod dashboard;
mod property;

pub use auth::auth_routes;
pub use booking::booking_routes;
pub use dashboard::dashboard_routes;
pub use property::property_routes;

use axum::{routing::get, Json, Router};

use crate::state::AppState;

/// Assemble the full API router (without transport-level layers)
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(property_routes())
        .merge(booking_routes())
        .merge(dashboard_routes())
        .with_state(state)
}

async fn root() -> &'static str {
    "Rentora API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
