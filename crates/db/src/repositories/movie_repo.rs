//! Repository for the `movies` table.

use greenlight_core::movie::MovieInput;
use greenlight_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::Movie;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, title, year, runtime, genres, version";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie, returning the created row.
    pub async fn insert(pool: &PgPool, input: &MovieInput) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, year, runtime, genres)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(input.year)
            .bind(input.runtime)
            .bind(&input.genres)
            .fetch_one(pool)
            .await
    }

    /// Find a movie by ID.
    ///
    /// IDs below 1 can never match and short-circuit without a query.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        if id < 1 {
            return Ok(None);
        }
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write every editable field of `movie` back, bumping its version.
    ///
    /// The write only applies if the stored version still equals
    /// `movie.version`. Returns `None` when it does not (the row was changed
    /// or deleted since it was read).
    pub async fn update(pool: &PgPool, movie: &Movie) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = $3,
                year = $4,
                runtime = $5,
                genres = $6,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(movie.id)
            .bind(movie.version)
            .bind(&movie.title)
            .bind(movie.year)
            .bind(movie.runtime.minutes())
            .bind(&movie.genres)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a movie by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        if id < 1 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
