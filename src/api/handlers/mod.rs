//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod rpc;
pub mod stats;

pub use health::health_handler;
pub use redirect::{preview_handler, redirect_handler};
pub use rpc::rpc_handler;
pub use stats::stats_handler;
