//! Domain model structs.
//!
//! Each submodule holds a `FromRow` + `Serialize` entity struct matching the
//! database row. Request DTOs live in `greenlight_core`.

pub mod movie;
