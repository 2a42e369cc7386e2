//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the storage and cache interfaces.
//!
//! # Modules
//!
//! - [`cache`] - Redis, in-process and no-op caches
//! - [`persistence`] - PostgreSQL and in-memory repositories

pub mod cache;
pub mod persistence;
