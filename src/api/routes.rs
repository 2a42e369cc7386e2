//! API route configuration.

use crate::api::handlers::{rpc_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Programmatic endpoints.
///
/// # Endpoints
///
/// - `POST /rpc/json`  - JSON-RPC access to every service operation
/// - `GET  /api/stats` - record counts by allocation path
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/rpc/json", post(rpc_handler))
        .route("/api/stats", get(stats_handler))
}
