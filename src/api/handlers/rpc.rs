//! JSON-RPC endpoint exposing the service operations.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::debug;

use crate::api::dto::rpc::{RpcError, RpcRequest, RpcResponse};
use crate::state::AppState;

/// Dispatches a JSON-RPC call to [`crate::application::services::UrlService`].
///
/// # Endpoint
///
/// `POST /rpc/json`
///
/// # Methods
///
/// | method              | params          | result            |
/// |---------------------|-----------------|-------------------|
/// | `add_url`           | `[url]`         | key               |
/// | `add_static_url`    | `[url, key]`    | key               |
/// | `update_static_url` | `[url, key]`    | key               |
/// | `get_url`           | `[key]`         | url or `null`     |
/// | `count`             | `[is_static?]`  | number            |
///
/// Always answers 200; failures are reported in the `error` member. When an
/// alias is unavailable, `error.alternate_key` holds the key that was issued
/// instead.
///
/// # Example
///
/// ```json
/// {"method": "add_static_url", "params": ["http://www.debian.org/", "debian"], "id": 1}
/// ```
pub async fn rpc_handler(
    State(state): State<AppState>,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    debug!(method = %request.method, "JSON-RPC call");

    let response = match dispatch(&state, &request.method, &request.params).await {
        Ok(result) => RpcResponse::success(request.id, result),
        Err(error) => RpcResponse::failure(request.id, error),
    };

    Json(response)
}

async fn dispatch(state: &AppState, method: &str, params: &[Value]) -> Result<Value, RpcError> {
    let service = &state.url_service;

    match method {
        "add_url" => {
            let url = string_param(params, 0, "url")?;
            Ok(json!(service.add_url(url).await?))
        }
        "add_static_url" => {
            let url = string_param(params, 0, "url")?;
            let key = string_param(params, 1, "key")?;
            Ok(json!(service.add_static_url(url, key).await?))
        }
        "update_static_url" => {
            let url = string_param(params, 0, "url")?;
            let key = string_param(params, 1, "key")?;
            Ok(json!(service.update_static_url(url, key).await?))
        }
        "get_url" => {
            let key = string_param(params, 0, "key")?;
            Ok(json!(service.get_url(key).await?))
        }
        "count" => {
            let is_static = match params.first() {
                None | Some(Value::Null) => false,
                Some(Value::Bool(b)) => *b,
                Some(_) => return Err(RpcError::invalid_params("is_static must be a boolean")),
            };
            Ok(json!(service.count(is_static).await?))
        }
        other => Err(RpcError::method_not_found(other)),
    }
}

fn string_param<'a>(params: &'a [Value], index: usize, name: &str) -> Result<&'a str, RpcError> {
    params
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::invalid_params(format!("missing string parameter {name:?}")))
}
