//! Route definitions for the `/movies` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// POST   /                                  -> create
/// GET    /{id}                              -> show
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(movie::create))
        .route(
            "/{id}",
            get(movie::show).put(movie::update).delete(movie::delete),
        )
}
