//! HTTP API Layer
//!
//! This crate exposes the claims core over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims and analytics
//! - **Middleware**: Request-id propagation, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//!
//! let app = create_router(service, ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderName,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_claims::ClaimService;

use crate::config::ApiConfig;
use crate::handlers::{analytics, claims, health};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClaimService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Claims service wired to its storage and audit adapters
/// * `config` - API configuration
pub fn create_router(service: Arc<ClaimService>, config: ApiConfig) -> Router {
    let state = AppState { service, config };
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Public routes
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/", post(claims::create_claim).get(claims::list_claims))
        .route("/:id", get(claims::get_claim).put(claims::update_claim))
        .route("/:id/status", put(claims::update_status))
        .route("/:id/risk", post(claims::recompute_risk))
        .route("/:id/activity", get(claims::get_activity))
        .route("/:id/progress", get(claims::get_progress));

    // Analytics routes
    let analytics_routes = Router::new()
        .route("/stats", get(analytics::get_stats))
        .route("/patterns", get(analytics::get_patterns));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/analytics", analytics_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
