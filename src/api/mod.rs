//! HTTP API layer.
//!
//! Translates HTTP and JSON-RPC requests into [`crate::application::services::UrlService`]
//! calls and service errors into protocol responses.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - request tracing
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
