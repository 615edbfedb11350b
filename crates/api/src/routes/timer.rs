//! Route definitions for the timer service.

use axum::Router;
use axum::routing::get;

use crate::handlers::timer;
use crate::state::TimerState;

/// Timer service routes.
///
/// ```text
/// GET /health  -> health
/// GET /time    -> get_time
/// GET /view    -> view (?theme)
/// ```
pub fn router() -> Router<TimerState> {
    Router::new()
        .route("/health", get(timer::health))
        .route("/time", get(timer::get_time))
        .route("/view", get(timer::view))
}
