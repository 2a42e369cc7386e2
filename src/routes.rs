//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{key}`     - Short link redirect
//! - `GET  /p/{key}`   - Short link preview
//! - `GET  /health`    - Health check: store and cache
//! - `POST /rpc/json`  - JSON-RPC API
//! - `GET  /api/stats` - Record counts
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, preview_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with every route and the tracing layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{key}", get(redirect_handler))
        .route("/p/{key}", get(preview_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service: [`router`] with trailing slashes trimmed.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
