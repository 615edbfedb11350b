//! Handlers for the timer service.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Html;
use chrono::Utc;
use keepsake_core::timer::{Elapsed, elapsed_since, to_iso_millis};
use serde::{Deserialize, Serialize};

use crate::state::TimerState;
use crate::views;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePayload {
    pub since: String,
    pub now: String,
    pub elapsed: Elapsed,
    pub total_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct ThemeParams {
    pub theme: Option<String>,
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /time
pub async fn get_time(State(state): State<TimerState>) -> Json<TimePayload> {
    let now = Utc::now();
    let (elapsed, total_seconds) = elapsed_since(state.start, now);

    Json(TimePayload {
        since: to_iso_millis(state.start),
        now: to_iso_millis(now),
        elapsed,
        total_seconds,
    })
}

/// GET /view?theme=
///
/// Unknown themes fall back to light.
pub async fn view(Query(params): Query<ThemeParams>) -> Html<String> {
    let theme = match params.theme.as_deref().map(str::trim).map(str::to_lowercase) {
        Some(ref theme) if theme == "dark" => "dark",
        _ => "light",
    };
    Html(views::timer::timer_view_page(theme))
}
