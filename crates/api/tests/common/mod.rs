//! Shared helpers for the api integration tests.
//!
//! The moments app is built over a lazily-connecting MongoDB client;
//! only flows that fail before reaching the store are exercised here,
//! everything touching live data belongs to the deployment smoke
//! tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use keepsake_api::config::{MomentsConfig, TimelineConfig};
use keepsake_api::state::{MomentsState, TimelineState, TimerState};
use keepsake_api::{routes, server};
use keepsake_core::timer::parse_start;
use tower::ServiceExt;

pub fn timer_app() -> Router {
    let start = parse_start("2025-03-06T18:00:00Z").unwrap();
    server::with_middleware(routes::timer::router().with_state(TimerState { start }))
}

pub fn timeline_app() -> Router {
    let config = TimelineConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        api_base_url: String::new(),
        cards_list_path: "/api/cards".to_string(),
        card_by_id_path_template: "/api/cards/{id}".to_string(),
        images_path: "/api/images".to_string(),
        timer_path: "/api/timer".to_string(),
        request_timeout_ms: 6000,
        cache_ttl_ms: 45_000,
        max_moments: 500,
        batch_size: 16,
        max_retries: 2,
        timer_sync_interval_ms: 20_000,
        static_dir: "does-not-exist".to_string(),
    };
    let state = TimelineState {
        config: Arc::new(config.clone()),
    };
    server::with_middleware(routes::timeline::router(&config.static_dir).with_state(state))
}

/// Build the moments app against a client that never actually
/// connects. Tests must stay on validation paths that reject the
/// request before any store round trip.
pub async fn moments_app() -> Router {
    let config = MomentsConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        mongo_uri: "mongodb://127.0.0.1:27017/?serverSelectionTimeoutMS=100".to_string(),
        mongo_db_name: "keepsake_test".to_string(),
        photostock_base_url: Some("http://photostock:8000".to_string()),
        photostock_timeout_ms: 2000,
    };

    let db = keepsake_db::connect(&config.mongo_uri, &config.mongo_db_name)
        .await
        .expect("the driver connects lazily");
    let moments = keepsake_db::moments_collection(&db);
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.photostock_timeout_ms))
        .build()
        .unwrap();

    let state = MomentsState {
        db,
        moments,
        config: Arc::new(config),
        http,
    };
    server::with_middleware(routes::moments::router().with_state(state))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    payload: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert the uniform error envelope and return its message.
pub async fn assert_error_envelope(
    response: Response<Body>,
    status: StatusCode,
    code: &str,
) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], code, "unexpected envelope: {json}");
    json["error"]["message"].as_str().unwrap_or_default().to_string()
}
