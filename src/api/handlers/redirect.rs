//! Handlers for short key redirect and preview.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;

use crate::api::dto::preview::PreviewResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its URL.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// Resolution goes through [`crate::application::services::UrlService::get_url`],
/// so cache hits (positive or negative) never reach the database.
///
/// # Errors
///
/// Returns 404 Not Found if the key is invalid or unknown.
/// Returns 500 if the store is unavailable on a cache miss.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = resolve(&state, &key).await?;
    Ok(Redirect::temporary(&url))
}

/// Shows where a short key leads without redirecting.
///
/// # Endpoint
///
/// `GET /p/{key}`
///
/// # Response
///
/// ```json
/// {
///   "key": "debian",
///   "url": "http://www.debian.org/",
///   "short_url": "https://s.example.com/debian"
/// }
/// ```
pub async fn preview_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PreviewResponse>, AppError> {
    let url = resolve(&state, &key).await?;

    Ok(Json(PreviewResponse {
        short_url: state.short_url(&key),
        key,
        url,
    }))
}

async fn resolve(state: &AppState, key: &str) -> Result<String, AppError> {
    state
        .url_service
        .get_url(key)
        .await?
        .ok_or_else(|| AppError::not_found("Short link not found", json!({ "key": key })))
}
