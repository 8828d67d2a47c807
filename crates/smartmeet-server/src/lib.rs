//! # smartmeet-server
//!
//! Axum JSON API over the invite store, renderer and transports. Handlers
//! stay thin: validate input, call the store or a transport, map errors to
//! status codes.

#![deny(unsafe_code)]

pub mod errors;
pub mod health;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use errors::ApiError;
pub use state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/templates/generate", post(routes::templates::generate))
        .route("/api/templates/available", get(routes::templates::available))
        .route("/api/templates", get(routes::templates::list))
        .route("/api/templates/{id}", get(routes::templates::get))
        .route("/api/templates/{id}", patch(routes::templates::update))
        .route("/api/templates/{id}", delete(routes::templates::delete))
        .route("/api/distributions/email", post(routes::distributions::send_email))
        .route(
            "/api/distributions/messaging",
            post(routes::distributions::send_messaging),
        )
        .route("/api/distributions", get(routes::distributions::list))
        .route("/api/contacts", get(routes::directory::list_contacts))
        .route("/api/contacts", post(routes::directory::create_contact))
        .route("/api/organizations", get(routes::directory::list_organizations))
        .route(
            "/api/organizations",
            post(routes::directory::create_organization),
        )
        .route("/api/auth", post(routes::directory::auth))
        .route("/api/meetings", get(routes::meetings::list))
        .route("/api/meetings", post(routes::meetings::create))
        .route("/api/meetings/upcoming", get(routes::meetings::upcoming))
        .route("/api/meetings/{id}", get(routes::meetings::get))
        .route("/api/dashboard/stats", get(routes::dashboard::stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
