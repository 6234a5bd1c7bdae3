//! Greenlight core: the request/response JSON codec and pure domain logic.
//!
//! Nothing in this crate touches HTTP or the database, so every module can be
//! tested in isolation.

pub mod decode;
pub mod envelope;
pub mod error;
pub mod movie;
pub mod runtime;
pub mod types;
pub mod validation;
