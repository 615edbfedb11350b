//! Route definitions for the photostock service.

use axum::Router;
use axum::routing::get;

use crate::handlers::stock;
use crate::state::StockState;

/// Photostock service routes.
///
/// ```text
/// GET /images/{image}  -> get_image (?display)
/// ```
pub fn router() -> Router<StockState> {
    Router::new().route("/images/{image}", get(stock::get_image))
}
