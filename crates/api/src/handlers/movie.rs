//! Handlers for the `/movies` resource.

use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use greenlight_core::envelope::Envelope;
use greenlight_core::error::CoreError;
use greenlight_core::movie::{validate_movie, MovieInput};
use greenlight_core::types::DbId;
use greenlight_core::validation::Validator;
use greenlight_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::extract::StrictJson;
use crate::handlers::read_id_param;
use crate::response::{encode_json, ok_json, JsonResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

fn validate(input: &MovieInput) -> AppResult<()> {
    let mut v = Validator::new();
    validate_movie(&mut v, input);
    Ok(v.finish()?)
}

/// POST /v1/movies
pub async fn create(
    State(state): State<AppState>,
    StrictJson(input): StrictJson<MovieInput>,
) -> AppResult<JsonResponse> {
    validate(&input)?;

    let movie = MovieRepo::insert(&state.pool, &input).await?;
    tracing::info!(movie_id = movie.id, title = %movie.title, "Movie created");

    let location = HeaderValue::try_from(format!("/v1/movies/{}", movie.id))
        .map_err(|e| AppError::InternalError(format!("invalid Location header: {e}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);

    let envelope = Envelope::single("movie", &movie)?;
    Ok(encode_json(StatusCode::CREATED, &envelope, Some(headers))?)
}

/// GET /v1/movies/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<JsonResponse> {
    let id = read_id_param(&raw_id)?;
    let movie = MovieRepo::get(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(ok_json(&Envelope::single("movie", &movie)?)?)
}

/// PUT /v1/movies/{id}
///
/// Replaces every editable field. The write is rejected with 409 if the movie
/// changed between the read and the write.
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    StrictJson(input): StrictJson<MovieInput>,
) -> AppResult<JsonResponse> {
    let id = read_id_param(&raw_id)?;
    let mut movie = MovieRepo::get(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    validate(&input)?;
    movie.apply(input);

    let movie = MovieRepo::update(&state.pool, &movie)
        .await?
        .ok_or(AppError::Core(CoreError::EditConflict { entity: "Movie", id }))?;
    tracing::info!(movie_id = movie.id, version = movie.version, "Movie updated");

    Ok(ok_json(&Envelope::single("movie", &movie)?)?)
}

/// DELETE /v1/movies/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<JsonResponse> {
    let id = read_id_param(&raw_id)?;
    if !MovieRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(movie_id = id, "Movie deleted");

    Ok(ok_json(&Envelope::single(
        "message",
        "movie successfully deleted",
    )?)?)
}
