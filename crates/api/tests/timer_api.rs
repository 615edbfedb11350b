//! Integration tests for the timer service.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get, timer_app};

#[tokio::test]
async fn health_returns_ok() {
    let response = get(timer_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn time_reports_elapsed_breakdown() {
    let response = get(timer_app(), "/time").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["since"], "2025-03-06T18:00:00.000Z");
    assert!(json["now"].as_str().unwrap().ends_with('Z'));
    assert!(json["totalSeconds"].as_i64().unwrap() > 0);

    let elapsed = &json["elapsed"];
    for field in ["years", "days", "hours", "minutes", "seconds"] {
        assert!(
            elapsed[field].as_i64().is_some(),
            "missing elapsed field {field}"
        );
    }
    assert!(elapsed["hours"].as_i64().unwrap() < 24);
    assert!(elapsed["minutes"].as_i64().unwrap() < 60);
    assert!(elapsed["seconds"].as_i64().unwrap() < 60);
}

#[tokio::test]
async fn view_renders_requested_theme() {
    let response = get(timer_app(), "/view?theme=dark").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-theme=\"dark\""));
}

#[tokio::test]
async fn view_falls_back_to_light_theme() {
    for uri in ["/view", "/view?theme=neon"] {
        let response = get(timer_app(), uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("data-theme=\"light\""));
    }
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(timer_app(), "/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let response = get(timer_app(), "/health").await;
    let request_id = response.headers().get("x-request-id");
    assert!(request_id.is_some(), "missing x-request-id header");
}
