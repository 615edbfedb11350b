//! Integration tests for the timeline shell service.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get, timeline_app};

#[tokio::test]
async fn health_names_the_service() {
    let response = get(timeline_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "timeline-ui");
}

#[tokio::test]
async fn home_embeds_shell_and_config() {
    let response = get(timeline_app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/html"))
    );

    let html = body_text(response).await;
    assert!(html.contains("window.__TIMELINE_CONFIG__="));
    assert!(html.contains("\"cardsListPath\":\"/api/cards\""));
    assert!(html.contains("id=\"timeline-app\""));
    assert!(html.contains("timeline-app.mjs"));
}

#[tokio::test]
async fn static_mount_absent_without_directory() {
    let response = get(timeline_app(), "/static/timeline.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
