//! Integration tests for the `/v1/movies` endpoints.
//!
//! Tests that never reach the database run against a lazy pool; the CRUD
//! tests get a fresh migrated database from `#[sqlx::test]`.

mod common;

use axum::http::header::LOCATION;
use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, build_test_app, content_type, get, lazy_pool, send};
use serde_json::json;
use sqlx::PgPool;

const CASABLANCA: &str =
    r#"{"title":"Casablanca","year":1942,"runtime":102,"genres":["drama","romance"]}"#;

async fn create_movie(pool: &PgPool, body: &str) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = send(app, Method::POST, "/v1/movies", body.to_string()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["movie"].clone()
}

// ---------------------------------------------------------------------------
// Decode failures: 400 with a classified message
// ---------------------------------------------------------------------------

async fn post_expecting_400(body: &str) -> String {
    let app = build_test_app(lazy_pool());
    let response = send(app, Method::POST, "/v1/movies", body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&response), "application/json");
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    json["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn unknown_key_is_named_in_error() {
    let message = post_expecting_400(r#"{"title":"Casablanca","foo":"bar"}"#).await;
    assert_eq!(message, r#"body contains unknown field "foo""#);
}

#[tokio::test]
async fn first_failure_in_the_body_is_reported() {
    let message = post_expecting_400(r#"{"year":"oops","foo":"bar"}"#).await;
    assert_eq!(message, r#"body contains incorrect JSON type for field "year""#);

    let message = post_expecting_400(r#"{"foo":"bar","year":"oops"}"#).await;
    assert_eq!(message, r#"body contains unknown field "foo""#);
}

#[tokio::test]
async fn wrong_type_names_the_field() {
    let message = post_expecting_400(r#"{"title":"Casablanca","year":"1942"}"#).await;
    assert_eq!(message, r#"body contains incorrect JSON type for field "year""#);
}

#[tokio::test]
async fn top_level_array_is_wrong_type() {
    let message = post_expecting_400(r#"["Casablanca"]"#).await;
    assert!(message.starts_with("body contains incorrect JSON type (at character "));
}

#[tokio::test]
async fn malformed_body_reports_offset() {
    let message = post_expecting_400(r#"{"title": "Casablanca",}"#).await;
    assert!(message.starts_with("body contains badly formatted JSON (at character "));
}

#[tokio::test]
async fn truncated_body_is_badly_formed() {
    let message = post_expecting_400(r#"{"title": "Casa"#).await;
    assert_eq!(message, "body contains badly formatted JSON");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let message = post_expecting_400("").await;
    assert_eq!(message, "body must not be empty");
}

#[tokio::test]
async fn second_value_is_rejected() {
    let message = post_expecting_400(r#"{"title":"Casablanca"} {"title":"Heat"}"#).await;
    assert_eq!(message, "body must only contain a single JSON value");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let body = format!(r#"{{"title":"{}"}}"#, "a".repeat(1_048_576));
    let message = post_expecting_400(&body).await;
    assert_eq!(message, "body must not be larger than 1048576 bytes");
}

// ---------------------------------------------------------------------------
// Validation failures: 422 with a field map
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_movie_returns_field_errors() {
    let app = build_test_app(lazy_pool());
    let body = r#"{"title":"","year":1000,"runtime":-1,"genres":["drama","drama"]}"#;
    let response = send(app, Method::POST, "/v1/movies", body.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["title"], "must be provided");
    assert_eq!(json["error"]["year"], "must not be before 1888");
    assert_eq!(json["error"]["runtime"], "must be a positive integer");
    assert_eq!(json["error"]["genres"], "must not contain duplicate values");
}

// ---------------------------------------------------------------------------
// Id parsing: anything that is not a positive integer is a 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    for uri in ["/v1/movies/abc", "/v1/movies/0", "/v1/movies/-1"] {
        let app = build_test_app(lazy_pool());
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {uri}");
    }
}

// ---------------------------------------------------------------------------
// CRUD against a real database
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_returns_201_with_location(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send(app, Method::POST, "/v1/movies", CASABLANCA.to_string()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[LOCATION].to_str().unwrap().to_string();

    let json = body_json(response).await;
    let movie = &json["movie"];
    let id = movie["id"].as_i64().unwrap();
    assert_eq!(location, format!("/v1/movies/{id}"));
    assert_eq!(movie["title"], "Casablanca");
    assert_eq!(movie["year"], 1942);
    assert_eq!(movie["runtime"], "102 mins");
    assert_eq!(movie["genres"], json!(["drama", "romance"]));
    assert_eq!(movie["version"], 1);
    assert!(movie.get("created_at").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn show_returns_pretty_envelope(pool: PgPool) {
    let created = create_movie(&pool, CASABLANCA).await;
    let id = created["id"].as_i64().unwrap();

    let app = build_test_app(pool);
    let response = get(app, &format!("/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response).await;
    let text = std::str::from_utf8(&bytes).unwrap();
    assert!(text.starts_with("{\n\t\"movie\": {\n\t\t\"id\": "));
    assert!(text.contains("\t\t\"runtime\": \"102 mins\",\n"));
    assert!(text.ends_with("}\n"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn show_missing_movie_is_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/v1/movies/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_replaces_fields_and_bumps_version(pool: PgPool) {
    let created = create_movie(&pool, CASABLANCA).await;
    let id = created["id"].as_i64().unwrap();

    let app = build_test_app(pool);
    let body = r#"{"title":"Casablanca","year":1942,"runtime":103,"genres":["drama"]}"#;
    let response = send(app, Method::PUT, &format!("/v1/movies/{id}"), body.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movie"]["runtime"], "103 mins");
    assert_eq!(json["movie"]["genres"], json!(["drama"]));
    assert_eq!(json["movie"]["version"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_with_unknown_key_leaves_movie_untouched(pool: PgPool) {
    let created = create_movie(&pool, CASABLANCA).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/v1/movies/{id}");

    let app = build_test_app(pool.clone());
    let body = r#"{"title":"Casablanca","rating":5}"#;
    let response = send(app, Method::PUT, &uri, body.to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = build_test_app(pool);
    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json["movie"]["version"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_missing_movie_is_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send(app, Method::PUT, "/v1/movies/999", CASABLANCA.to_string()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_then_show_is_404(pool: PgPool) {
    let created = create_movie(&pool, CASABLANCA).await;
    let uri = format!("/v1/movies/{}", created["id"].as_i64().unwrap());

    let app = build_test_app(pool.clone());
    let response = send(app, Method::DELETE, &uri, "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "movie successfully deleted");

    let app = build_test_app(pool.clone());
    assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND);

    let app = build_test_app(pool);
    let response = send(app, Method::DELETE, &uri, "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
