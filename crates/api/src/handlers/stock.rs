//! Handlers for the photostock service.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use keepsake_cloud::ObjectStoreError;
use keepsake_core::stock::{find_matching_keys, validate_stock_image_name};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::parse_bool_param;
use crate::state::StockState;

const CACHE_CONTROL_VALUE: &str = "public, max-age=3600";

#[derive(Debug, Deserialize)]
pub struct DisplayParams {
    pub display: Option<String>,
}

/// GET /images/{image}?display=
///
/// Resolve a base name (no extension) to the single matching object in
/// the bucket and serve its bytes. Several stored variants of one name
/// are a conflict, not a silent pick.
pub async fn get_image(
    State(state): State<StockState>,
    Path(image): Path<String>,
    Query(params): Query<DisplayParams>,
) -> AppResult<Response> {
    let image_name = validate_stock_image_name(&image)?;
    let display_inline =
        parse_bool_param(params.display.as_deref(), true, "display").map_err(AppError::BadRequest)?;

    let prefix = format!("{image_name}.");
    let keys = state
        .store
        .list_keys(Some(&prefix))
        .await
        .map_err(|_| AppError::Unavailable("Image storage is unavailable".into()))?;

    let matches = find_matching_keys(&image_name, &keys);
    let key = match matches.as_slice() {
        [] => return Err(AppError::NotFound("Image not found".into())),
        [only] => only.clone(),
        variants => {
            return Err(AppError::Conflict(format!(
                "Multiple files found for '{image_name}': {}",
                variants.join(", ")
            )));
        }
    };

    let object = state.store.fetch(&key).await.map_err(|err| match err {
        ObjectStoreError::NotFound(_) => AppError::NotFound("Image not found".into()),
        ObjectStoreError::Unavailable => {
            AppError::Unavailable("Image storage is unavailable".into())
        }
    })?;

    let disposition = if display_inline { "inline" } else { "attachment" };
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&object.content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) =
        HeaderValue::from_str(&format!("{disposition}; filename=\"{}\"", object.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_VALUE),
    );

    Ok((headers, object.bytes).into_response())
}
