//! Movie entity model.

use greenlight_core::movie::MovieInput;
use greenlight_core::runtime::Runtime;
use greenlight_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A movie row from the `movies` table.
///
/// `created_at` is internal bookkeeping and never leaves the server. Zero
/// `year`/`runtime` and empty `genres` are omitted from responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    #[serde(skip)]
    pub created_at: Timestamp,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[sqlx(try_from = "i32")]
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    pub version: i32,
}

impl Movie {
    /// Replace every client-editable field with the values from `input`.
    pub fn apply(&mut self, input: MovieInput) {
        self.title = input.title;
        self.year = input.year;
        self.runtime = Runtime::from(input.runtime);
        self.genres = input.genres;
    }
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}
