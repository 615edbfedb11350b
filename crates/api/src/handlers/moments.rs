//! Handlers for the moments API and its HTML card views.
//!
//! Every handler follows the same pipeline: validate the input, build
//! the store operation, serialize through the tolerant normalizer,
//! respond. Validation failures name the violated rule.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use bson::Document;
use chrono::Utc;
use keepsake_core::cursor::{Cursor, SortOrder};
use keepsake_core::error::CoreError;
use keepsake_core::images::validate_image_filename;
use keepsake_core::types::{MomentId, Timestamp};
use keepsake_db::models::moment::{Moment, MomentPatch, NewMoment, Visibility, document_id};
use keepsake_db::repositories::MomentRepo;
use keepsake_db::{health_check, query};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};
use crate::query::{parse_bool_param, parse_offset_datetime};
use crate::state::MomentsState;
use crate::views;

pub const TITLE_MAX_LENGTH: usize = 200;
pub const TEXT_MAX_LENGTH: usize = 5000;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Payload and query parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateMomentPayload {
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
    pub date: String,
    pub images: Vec<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Patch payload distinguishing absent fields from explicit nulls: the
/// outer `Option` is presence, the inner one nullability.
#[derive(Debug, Default, Deserialize)]
pub struct PatchMomentPayload {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub images: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub visibility: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Option<Vec<String>>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PatchMomentPayload {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.is_none()
            && self.date.is_none()
            && self.images.is_none()
            && self.visibility.is_none()
            && self.tags.is_none()
    }
}

/// Query parameters for the listing endpoint. Dates arrive as strings
/// so failures map to the error envelope instead of a bare rejection.
#[derive(Debug, Deserialize)]
pub struct ListMomentsParams {
    pub limit: Option<i64>,
    pub order: Option<String>,
    pub cursor: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    pub random: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentPage {
    pub moments: Vec<Moment>,
    pub next_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn parse_payload<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|err| AppError::BadRequest(format!("Request validation failed: {err}")))
}

fn parse_moment_id(raw: &str) -> Result<MomentId, AppError> {
    MomentId::parse_str(raw).map_err(|_| AppError::InvalidId("moment"))
}

fn validate_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("'title' must not be empty".into()));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(AppError::BadRequest(format!(
            "'title' must be at most {TITLE_MAX_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_text(raw: &str) -> Result<String, AppError> {
    if raw.chars().count() > TEXT_MAX_LENGTH {
        return Err(AppError::BadRequest(format!(
            "'text' must be at most {TEXT_MAX_LENGTH} characters"
        )));
    }
    Ok(raw.to_string())
}

fn validate_images(raw: &[String]) -> Result<Vec<String>, AppError> {
    if raw.is_empty() {
        return Err(AppError::BadRequest(
            "'images' must be a non-empty array".into(),
        ));
    }
    raw.iter()
        .map(|name| {
            validate_image_filename(name).map_err(|err| match err {
                CoreError::Validation(rule) => {
                    AppError::BadRequest(format!("Invalid image filename: {rule}"))
                }
                other => AppError::Core(other),
            })
        })
        .collect()
}

fn validate_tags(raw: &[String]) -> Result<Vec<String>, AppError> {
    raw.iter()
        .map(|tag| {
            let tag = tag.trim();
            if tag.is_empty() {
                Err(AppError::BadRequest(
                    "'tags' must not contain empty values".into(),
                ))
            } else {
                Ok(tag.to_string())
            }
        })
        .collect()
}

fn validate_visibility(raw: &str) -> Result<Visibility, AppError> {
    Visibility::parse(raw).ok_or_else(|| {
        AppError::BadRequest("Invalid 'visibility' value. Use one of: draft, public".into())
    })
}

fn validate_date(raw: &str) -> Result<Timestamp, AppError> {
    parse_offset_datetime(raw, "date").map_err(AppError::BadRequest)
}

fn serialize_moment(document: &Document) -> AppResult<Moment> {
    Moment::from_document(document)
        .map_err(|err| AppError::Internal(format!("stored moment is missing a field: {err}")))
}

// ---------------------------------------------------------------------------
// JSON API handlers
// ---------------------------------------------------------------------------

/// GET /health
///
/// Liveness plus a MongoDB ping.
pub async fn health(State(state): State<MomentsState>) -> Response {
    match health_check(&state.db).await {
        Ok(()) => Json(json!({ "status": "ok", "mongo": "up" })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "MongoDB ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "mongo": "down" })),
            )
                .into_response()
        }
    }
}

/// POST /api/v1/cards
///
/// Create a moment, re-fetch it, and return the serialized form.
pub async fn create_moment(
    State(state): State<MomentsState>,
    Json(value): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let payload: CreateMomentPayload = parse_payload(value)?;

    let input = NewMoment {
        title: validate_title(&payload.title)?,
        text: payload.text.as_deref().map(validate_text).transpose()?,
        date: validate_date(&payload.date)?,
        images: validate_images(&payload.images)?,
        visibility: payload
            .visibility
            .as_deref()
            .map(validate_visibility)
            .transpose()?
            .unwrap_or(Visibility::Public),
        tags: validate_tags(&payload.tags.unwrap_or_default())?,
    };

    let id = MomentRepo::create(&state.moments, &input, Utc::now()).await?;
    let stored = MomentRepo::find_by_id(&state.moments, id)
        .await?
        .ok_or_else(|| AppError::Internal("failed to load created moment".into()))?;

    tracing::info!(moment_id = %id.to_hex(), "Moment created");

    Ok((StatusCode::CREATED, Json(serialize_moment(&stored)?)))
}

/// GET /api/v1/cards?limit=&order=&cursor=&from=&to=&visibility=
///
/// Cursor-paginated listing: fetch one row beyond the page size to
/// detect further pages, and encode the next cursor from the last row
/// actually delivered.
pub async fn list_moments(
    State(state): State<MomentsState>,
    Query(params): Query<ListMomentsParams>,
) -> AppResult<Json<MomentPage>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "'limit' must be between 1 and {MAX_LIMIT}"
        )));
    }

    let order = match params.order.as_deref() {
        None => SortOrder::Desc,
        Some(raw) => SortOrder::parse(raw)
            .ok_or_else(|| AppError::BadRequest("Invalid 'order' value. Use one of: asc, desc".into()))?,
    };

    let from_date = params
        .from
        .as_deref()
        .map(|raw| parse_offset_datetime(raw, "from"))
        .transpose()
        .map_err(AppError::BadRequest)?;
    let to_date = params
        .to
        .as_deref()
        .map(|raw| parse_offset_datetime(raw, "to"))
        .transpose()
        .map_err(AppError::BadRequest)?;
    if let (Some(from), Some(to)) = (from_date, to_date) {
        if from > to {
            return Err(AppError::BadRequest(
                "'from' must be less than or equal to 'to'".into(),
            ));
        }
    }

    let visibility = params
        .visibility
        .as_deref()
        .map(validate_visibility)
        .transpose()?;

    let base_filter = query::build_base_filter(from_date, to_date, visibility);
    let cursor_filter = match params.cursor.as_deref().filter(|raw| !raw.is_empty()) {
        None => None,
        Some(raw) => {
            let cursor = Cursor::decode(raw)?;
            Some(query::build_cursor_filter(&cursor, order)?)
        }
    };
    let filter = query::merge_filters(base_filter, cursor_filter);

    let documents = MomentRepo::list(
        &state.moments,
        filter,
        query::sort_document(order),
        limit + 1,
    )
    .await?;

    let has_more = documents.len() as i64 > limit;
    let page = &documents[..documents.len().min(limit as usize)];

    let next_cursor = match (has_more, page.last()) {
        (true, Some(last)) => {
            let date = last
                .get("date")
                .and_then(bson::Bson::as_datetime)
                .ok_or_else(|| AppError::Internal("stored moment has a bad date".into()))?
                .to_chrono();
            let id = document_id(last)
                .ok_or_else(|| AppError::Internal("stored moment has a bad id".into()))?;
            Some(Cursor { date, id, order }.encode())
        }
        _ => None,
    };

    let moments = page.iter().map(serialize_moment).collect::<AppResult<Vec<_>>>()?;

    Ok(Json(MomentPage {
        moments,
        next_cursor,
    }))
}

/// GET /api/v1/cards/{id}
pub async fn get_moment(
    State(state): State<MomentsState>,
    Path(id): Path<String>,
) -> AppResult<Json<Moment>> {
    let id = parse_moment_id(&id)?;
    let stored = MomentRepo::find_by_id(&state.moments, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Moment not found".into()))?;
    Ok(Json(serialize_moment(&stored)?))
}

/// PATCH /api/v1/cards/{id}
///
/// Partial update. An empty patch and an explicit-null `images` are
/// rejected; an explicit-null `tags` collapses to an empty list; other
/// explicit nulls are applied as given.
pub async fn update_moment(
    State(state): State<MomentsState>,
    Path(id): Path<String>,
    Json(value): Json<Value>,
) -> AppResult<Json<Moment>> {
    let id = parse_moment_id(&id)?;
    let payload: PatchMomentPayload = parse_payload(value)?;

    if payload.is_empty() {
        return Err(AppError::BadRequest(
            "At least one field is required for patch".into(),
        ));
    }

    let patch = MomentPatch {
        title: match payload.title {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(validate_title(&raw)?)),
        },
        text: match payload.text {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(validate_text(&raw)?)),
        },
        date: match payload.date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(validate_date(&raw)?)),
        },
        images: match payload.images {
            None => None,
            Some(None) => {
                return Err(AppError::BadRequest(
                    "'images' must be a non-empty array".into(),
                ));
            }
            Some(Some(raw)) => Some(validate_images(&raw)?),
        },
        visibility: match payload.visibility {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(validate_visibility(&raw)?)),
        },
        tags: match payload.tags {
            None => None,
            Some(None) => Some(Vec::new()),
            Some(Some(raw)) => Some(validate_tags(&raw)?),
        },
    };

    let updated = MomentRepo::update(&state.moments, id, &patch, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("Moment not found".into()))?;

    tracing::info!(moment_id = %id.to_hex(), "Moment updated");

    Ok(Json(serialize_moment(&updated)?))
}

/// DELETE /api/v1/cards/{id}
pub async fn delete_moment(
    State(state): State<MomentsState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_moment_id(&id)?;
    let deleted = MomentRepo::delete(&state.moments, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Moment not found".into()));
    }

    tracing::info!(moment_id = %id.to_hex(), "Moment deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// HTML view handlers
// ---------------------------------------------------------------------------

fn message_response(
    state: &MomentsState,
    status: StatusCode,
    title: &str,
    message: &str,
) -> Response {
    let page = views::moments::message_page(title, message, state.config.photostock_timeout_ms);
    (status, Html(page)).into_response()
}

fn card_response(state: &MomentsState, document: &Document) -> Response {
    match serialize_moment(document) {
        Ok(moment) => Html(views::moments::moment_card_page(
            &moment,
            state.config.photostock_timeout_ms,
        ))
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize moment for view");
            message_response(
                state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "Failed to load moment",
            )
        }
    }
}

/// GET /cards/view?random=
///
/// HTML card page for the latest (or a random) moment. Responds with
/// message pages, not the JSON envelope.
pub async fn view_moment(
    State(state): State<MomentsState>,
    Query(params): Query<ViewParams>,
) -> Response {
    let use_random = match parse_bool_param(params.random.as_deref(), false, "random") {
        Ok(value) => value,
        Err(message) => {
            return message_response(&state, StatusCode::BAD_REQUEST, "Bad request", &message);
        }
    };

    let fetched = if use_random {
        MomentRepo::sample_one(&state.moments).await
    } else {
        MomentRepo::latest_one(&state.moments).await
    };

    match fetched {
        Err(err) => {
            tracing::error!(error = %err, "failed to load moment for view");
            message_response(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "Failed to load moment",
            )
        }
        Ok(None) => message_response(&state, StatusCode::OK, "No moments yet", "No moments yet"),
        Ok(Some(document)) => card_response(&state, &document),
    }
}

/// GET /cards/view/{id}
///
/// HTML card page for one moment. A malformed id renders the not-found
/// page rather than a validation error.
pub async fn view_moment_by_id(
    State(state): State<MomentsState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = MomentId::parse_str(&id) else {
        return message_response(
            &state,
            StatusCode::NOT_FOUND,
            "Moment not found",
            "Moment not found",
        );
    };

    match MomentRepo::find_by_id(&state.moments, id).await {
        Err(err) => {
            tracing::error!(error = %err, moment_id = %id.to_hex(), "failed to load moment for view");
            message_response(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "Failed to load moment",
            )
        }
        Ok(None) => message_response(
            &state,
            StatusCode::NOT_FOUND,
            "Moment not found",
            "Moment not found",
        ),
        Ok(Some(document)) => card_response(&state, &document),
    }
}
