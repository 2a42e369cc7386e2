//! JSON-RPC envelope types.
//!
//! Requests follow `{"method": ..., "params": [...], "id": ...}`; every
//! response carries both `result` and `error`, exactly one of them non-null.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::services::ServiceError;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub id: Value,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: &'static str,
    pub message: String,
    /// Generated key issued in place of an unavailable alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_key: Option<String>,
}

impl RpcError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            alternate_key: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new("method_not_found", format!("unknown method {method:?}"))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new("invalid_params", message)
    }
}

impl From<ServiceError> for RpcError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::InvalidUrl { .. } => Self::new("invalid_url", message),
            ServiceError::StaticAliasUnavailable { alternate_key, .. } => Self {
                code: "alias_unavailable",
                message,
                alternate_key,
            },
            ServiceError::UpdateConflict { .. } => Self::new("update_failed", message),
            ServiceError::Unavailable(_) => Self::new("unavailable", message),
        }
    }
}
