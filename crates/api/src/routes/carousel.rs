//! Route definitions for the carousel service.

use axum::Router;
use axum::routing::get;

use crate::handlers::carousel;
use crate::state::CarouselState;

/// Carousel service routes.
///
/// ```text
/// GET /carousel        -> carousel_image (?random)
/// GET /carousel/view   -> carousel_view (?random, refresh)
/// ```
pub fn router() -> Router<CarouselState> {
    Router::new()
        .route("/carousel", get(carousel::carousel_image))
        .route("/carousel/view", get(carousel::carousel_view))
}
