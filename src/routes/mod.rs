//! HTTP routes for Athena
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod chat;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{middleware::client_ip::client_id_middleware, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat_routes = Router::new()
        .route(
            "/api/chat",
            post(chat::chat).fallback(chat::method_not_allowed),
        )
        .layer(middleware::from_fn(client_id_middleware));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(chat_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
