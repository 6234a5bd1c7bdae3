pub mod movie;

use greenlight_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Fallback for requests that match no route.
pub async fn not_found() -> AppError {
    AppError::NotFound("the requested resource could not be found".into())
}

/// Parse an `{id}` path segment. Anything that is not an integer >= 1 is
/// treated as a missing resource rather than a bad request.
pub fn read_id_param(raw: &str) -> AppResult<DbId> {
    match raw.parse::<DbId>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound(
            "the requested resource could not be found".into(),
        )),
    }
}
