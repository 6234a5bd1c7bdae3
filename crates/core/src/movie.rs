//! Movie input shape and its validation rules.

use chrono::Datelike;
use serde::Deserialize;

use crate::validation::{unique, Validator};

/// Earliest year a movie can have been released.
pub const MIN_YEAR: i32 = 1888;
pub const MAX_TITLE_BYTES: usize = 500;
pub const MAX_GENRES: usize = 5;

/// Request body accepted when creating or replacing a movie.
///
/// Missing keys fall back to zero values so that "not provided" is reported
/// by [`validate_movie`] rather than as a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovieInput {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
}

/// Run every movie rule against `input`, recording failures in `v`.
pub fn validate_movie(v: &mut Validator, input: &MovieInput) {
    let current_year = chrono::Utc::now().year();

    v.check(!input.title.is_empty(), "title", "must be provided");
    v.check(
        input.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(input.year != 0, "year", "must be provided");
    v.check(input.year >= MIN_YEAR, "year", "must not be before 1888");
    v.check(input.year <= current_year, "year", "must not be in the future");

    v.check(input.runtime != 0, "runtime", "must be provided");
    v.check(input.runtime > 0, "runtime", "must be a positive integer");

    v.check(
        !input.genres.is_empty(),
        "genres",
        "must contain at least 1 genre",
    );
    v.check(
        input.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        unique(&input.genres),
        "genres",
        "must not contain duplicate values",
    );
}
