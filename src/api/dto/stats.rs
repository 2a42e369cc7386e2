//! DTO for the record count endpoint.

use serde::Serialize;

/// Number of stored records by allocation path.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub generated: i64,
    #[serde(rename = "static")]
    pub static_aliases: i64,
    pub total: i64,
}
