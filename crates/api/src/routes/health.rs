use axum::extract::State;
use axum::routing::get;
use axum::Router;
use greenlight_core::envelope::Envelope;

use crate::error::AppResult;
use crate::response::{ok_json, JsonResponse};
use crate::state::AppState;

/// GET /v1/healthcheck
///
/// Reports availability, the configured environment, and the build version.
async fn healthcheck(State(state): State<AppState>) -> AppResult<JsonResponse> {
    let envelope = Envelope::new()
        .with("status", "available")?
        .with("environment", state.config.env.as_str())?
        .with("version", env!("CARGO_PKG_VERSION"))?;
    Ok(ok_json(&envelope)?)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(healthcheck))
}
