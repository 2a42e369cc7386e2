//! DTO for the link preview endpoint.

use serde::Serialize;

/// Where a short key leads, without following it.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub key: String,
    pub url: String,
    pub short_url: String,
}
