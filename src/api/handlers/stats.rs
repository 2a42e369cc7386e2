//! Handler for record counts.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the number of generated and static records.
///
/// # Endpoint
///
/// `GET /api/stats`
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let generated = state.url_service.count(false).await?;
    let static_aliases = state.url_service.count(true).await?;

    Ok(Json(StatsResponse {
        generated,
        static_aliases,
        total: generated + static_aliases,
    }))
}
