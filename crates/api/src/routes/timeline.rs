//! Route definitions for the timeline shell service.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::handlers::timeline;
use crate::state::TimelineState;

/// Timeline service routes.
///
/// ```text
/// GET /health   -> health
/// GET /         -> home (HTML shell)
/// GET /static/* -> static assets, when the directory exists
/// ```
pub fn router(static_dir: &str) -> Router<TimelineState> {
    let mut router = Router::new()
        .route("/health", get(timeline::health))
        .route("/", get(timeline::home));

    if Path::new(static_dir).is_dir() {
        router = router.nest_service("/static", ServeDir::new(static_dir));
    }

    router
}
