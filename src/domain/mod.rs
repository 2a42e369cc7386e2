//! Domain layer: the key codec, entities and repository interfaces.
//!
//! - [`codec`] - identifier/key bijection over a configurable alphabet
//! - [`entities`] - stored record types
//! - [`repositories`] - storage trait implemented by the infrastructure layer
//!
//! The domain layer has no dependencies on infrastructure or presentation.

pub mod codec;
pub mod entities;
pub mod repositories;

pub use codec::{CodecError, DEFAULT_ALPHABET, KeyCodec};
