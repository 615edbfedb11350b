//! Route definitions for the moments service.
//!
//! The `/api/v1/moments` and `/view` paths are legacy aliases; both
//! spellings behave identically.

use axum::Router;
use axum::routing::get;

use crate::handlers::{media, moments};
use crate::state::MomentsState;

/// Moments service routes.
///
/// ```text
/// GET    /health                  -> health (MongoDB ping)
/// POST   /api/v1/cards            -> create_moment
/// GET    /api/v1/cards            -> list_moments (?limit, order, cursor, from, to, visibility)
/// GET    /api/v1/cards/{id}       -> get_moment
/// PATCH  /api/v1/cards/{id}       -> update_moment
/// DELETE /api/v1/cards/{id}       -> delete_moment
/// GET    /cards/view              -> view_moment (?random)
/// GET    /cards/view/{id}         -> view_moment_by_id
/// GET    /media/{filename}        -> proxy_media
/// ```
pub fn router() -> Router<MomentsState> {
    Router::new()
        .route("/health", get(moments::health))
        .route(
            "/api/v1/cards",
            get(moments::list_moments).post(moments::create_moment),
        )
        .route(
            "/api/v1/moments",
            get(moments::list_moments).post(moments::create_moment),
        )
        .route(
            "/api/v1/cards/{id}",
            get(moments::get_moment)
                .patch(moments::update_moment)
                .delete(moments::delete_moment),
        )
        .route(
            "/api/v1/moments/{id}",
            get(moments::get_moment)
                .patch(moments::update_moment)
                .delete(moments::delete_moment),
        )
        .route("/cards/view", get(moments::view_moment))
        .route("/view", get(moments::view_moment))
        .route("/cards/view/{id}", get(moments::view_moment_by_id))
        .route("/view/{id}", get(moments::view_moment_by_id))
        .route("/media/{filename}", get(media::proxy_media))
}
