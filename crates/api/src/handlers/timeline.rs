//! Handlers for the timeline shell service.

use axum::Json;
use axum::extract::State;
use axum::response::Html;

use crate::state::TimelineState;
use crate::views;

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "timeline-ui" }))
}

/// GET /
pub async fn home(State(state): State<TimelineState>) -> Html<String> {
    Html(views::timeline::timeline_page(&state.config))
}
