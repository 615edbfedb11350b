//! Handlers for the carousel service.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};
use keepsake_cloud::ObjectStoreError;
use keepsake_core::carousel::{build_unique_image_index, choose_image};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::parse_bool_param;
use crate::state::CarouselState;
use crate::views;

const VIEW_DEFAULT_REFRESH_SECONDS: u64 = 10;
const MAX_REFRESH_SECONDS: u64 = 3600;

#[derive(Debug, Deserialize)]
pub struct CarouselParams {
    pub random: Option<String>,
    /// Legacy parameter; its presence is rejected outright.
    pub refresh: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CarouselViewParams {
    pub random: Option<String>,
    pub refresh: Option<String>,
}

/// GET /carousel?random=
///
/// Serve the next image: sequential rotation by default, uniform
/// random on request. The response is uncacheable so the client always
/// advances.
pub async fn carousel_image(
    State(state): State<CarouselState>,
    Query(params): Query<CarouselParams>,
) -> AppResult<Response> {
    if params.refresh.is_some() {
        return Err(AppError::BadRequest(
            "Query parameter 'refresh' is no longer supported".into(),
        ));
    }
    let use_random =
        parse_bool_param(params.random.as_deref(), false, "random").map_err(AppError::BadRequest)?;

    let keys = state.store.list_keys(None).await.map_err(|_| {
        AppError::Unavailable("Image storage is unavailable".into())
    })?;
    let index = build_unique_image_index(&keys);

    let Some((image_name, key)) = choose_image(&index, use_random, &state.rotation) else {
        return Err(AppError::NotFound("No images available for carousel".into()));
    };
    let image_name = image_name.to_string();
    let key = key.to_string();

    tracing::info!(
        image = %image_name,
        key = %key,
        mode = if use_random { "random" } else { "sequence" },
        "Selected carousel image"
    );

    let object = state.store.fetch(&key).await.map_err(|err| match err {
        ObjectStoreError::NotFound(_) => {
            AppError::NotFound("No images available for carousel".into())
        }
        ObjectStoreError::Unavailable => {
            AppError::Unavailable("Image storage is unavailable".into())
        }
    })?;

    let mut headers = HeaderMap::new();
    insert_header(&mut headers, header::CONTENT_TYPE, &object.content_type);
    insert_header(
        &mut headers,
        header::CONTENT_DISPOSITION,
        &format!("inline; filename=\"{}\"", object.filename),
    );
    insert_header(&mut headers, header::CACHE_CONTROL, "no-store, max-age=0");
    insert_header(&mut headers, header::PRAGMA, "no-cache");
    headers.insert(
        "x-carousel-mode",
        HeaderValue::from_static(if use_random { "random" } else { "sequence" }),
    );
    insert_header(&mut headers, "x-carousel-image", &image_name);

    Ok((headers, object.bytes).into_response())
}

/// GET /carousel/view?random=&refresh=
///
/// HTML page reloading the carousel image on an interval.
pub async fn carousel_view(
    Query(params): Query<CarouselViewParams>,
) -> AppResult<Response> {
    let use_random =
        parse_bool_param(params.random.as_deref(), false, "random").map_err(AppError::BadRequest)?;
    let refresh_seconds =
        parse_refresh_seconds(params.refresh.as_deref()).map_err(AppError::BadRequest)?;

    let mut headers = HeaderMap::new();
    insert_header(&mut headers, header::CACHE_CONTROL, "no-store, max-age=0");
    insert_header(&mut headers, header::PRAGMA, "no-cache");

    Ok((
        headers,
        Html(views::carousel::carousel_view_page(use_random, refresh_seconds)),
    )
        .into_response())
}

fn parse_refresh_seconds(value: Option<&str>) -> Result<u64, String> {
    let Some(raw) = value else {
        return Ok(VIEW_DEFAULT_REFRESH_SECONDS);
    };

    let parsed: u64 = raw
        .trim()
        .parse()
        .map_err(|_| "Invalid 'refresh' value. Use integer seconds between 1 and 3600".to_string())?;
    if !(1..=MAX_REFRESH_SECONDS).contains(&parsed) {
        return Err("Invalid 'refresh' value. Must be between 1 and 3600".to_string());
    }
    Ok(parsed)
}

fn insert_header<K>(headers: &mut HeaderMap, name: K, value: &str)
where
    K: axum::http::header::IntoHeaderName,
{
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_defaults_and_bounds() {
        assert_eq!(parse_refresh_seconds(None), Ok(10));
        assert_eq!(parse_refresh_seconds(Some("30")), Ok(30));
        assert!(parse_refresh_seconds(Some("0")).is_err());
        assert!(parse_refresh_seconds(Some("3601")).is_err());
        assert!(parse_refresh_seconds(Some("soon")).is_err());
        assert!(parse_refresh_seconds(Some("")).is_err());
    }
}
