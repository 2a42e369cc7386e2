//! Helper functions shared across layers.
//!
//! - [`url_validator`] - long URL validation

pub mod url_validator;
