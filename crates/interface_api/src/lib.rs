//! HTTP API Layer
//!
//! REST surface over the claim processing pipeline using Axum.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//!
//! let app = create_router(pipeline, ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use claims_pipeline::ClaimsPipeline;

use crate::config::ApiConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ClaimsPipeline>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(pipeline: Arc<ClaimsPipeline>, config: ApiConfig) -> Router {
    let state = AppState { pipeline, config };

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/ready", get(handlers::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(handlers::submit_claim))
        .route("/:id", get(handlers::get_claim));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1/claims", claims_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
