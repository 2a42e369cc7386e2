//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations by coordinating the codec, the
//! repository and the cache, and expose a transport-neutral API to the
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - key allocation, alias management and resolution

pub mod services;
