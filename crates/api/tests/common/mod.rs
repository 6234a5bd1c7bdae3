#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use greenlight_api::config::ServerConfig;
use greenlight_api::router::build_app_router;
use greenlight_api::state::AppState;

/// Config for router tests. Nothing here opens a connection by itself; the
/// pool handed to [`build_test_app`] decides whether a database is used.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        env: "testing".to_string(),
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        database_url: "postgres://greenlight@127.0.0.1:1/unused".to_string(),
        db_max_connections: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A pool that never connects unless a query is actually run.
///
/// For tests whose requests are answered before reaching the database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy(&test_config().database_url)
        .expect("lazy pool URL must parse")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn send(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get("content-type")
        .expect("missing content-type")
        .to_str()
        .unwrap()
}
