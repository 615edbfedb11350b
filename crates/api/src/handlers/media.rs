//! Media reverse-proxy: streams photostock responses through the
//! moments service so card pages can reference same-origin URLs.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use keepsake_core::error::CoreError;
use keepsake_core::images::resolve_stock_name;

use crate::error::AppError;
use crate::state::MomentsState;

/// GET /media/{filename}
///
/// Resolve the filename to its photostock basename and stream the
/// upstream response, propagating status, content type and cache
/// headers. Pass-through I/O only; no state.
pub async fn proxy_media(
    State(state): State<MomentsState>,
    Path(filename): Path<String>,
) -> Response {
    let Some(base_url) = state.config.photostock_base_url.as_deref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Media service is not configured",
        )
            .into_response();
    };

    let image_name = match resolve_stock_name(&filename) {
        Ok((_, image_name)) => image_name,
        Err(CoreError::Validation(rule)) => {
            return AppError::BadRequest(format!("Invalid filename: {rule}")).into_response();
        }
        Err(other) => return AppError::Core(other).into_response(),
    };

    // The basename grammar is [A-Za-z0-9_-]+, so it embeds into the
    // URL path without any encoding.
    let url = format!("{base_url}/images/{image_name}");

    match state.http.get(&url).send().await {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);

            let mut headers = HeaderMap::new();
            if let Some(content_type) = upstream.headers().get(header::CONTENT_TYPE) {
                headers.insert(header::CONTENT_TYPE, content_type.clone());
            }
            if let Some(cache_control) = upstream.headers().get(header::CACHE_CONTROL) {
                headers.insert(header::CACHE_CONTROL, cache_control.clone());
            }

            (status, headers, Body::from_stream(upstream.bytes_stream())).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, filename, "failed to proxy image via photostock");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Media service is unavailable",
            )
                .into_response()
        }
    }
}
