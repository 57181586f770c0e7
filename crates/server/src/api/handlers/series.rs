use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use super::parse_series_id;
use crate::api::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{AddSeriesRequest, SeriesRecord, UpdateWatchedRequest};
use crate::state::AppState;

/// Get the caller's raw collection in stored order
#[utoipa::path(
    get,
    path = "/api/series",
    tag = "series",
    responses(
        (status = 200, description = "Stored collection", body = Vec<SeriesRecord>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_series(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Json<Vec<SeriesRecord>> {
    Json(state.series.load(&identity.key).await)
}

/// Add a series by IMDb id or title
#[utoipa::path(
    post,
    path = "/api/series",
    tag = "series",
    request_body = AddSeriesRequest,
    responses(
        (status = 201, description = "Series added", body = SeriesRecord),
        (status = 400, description = "Empty identifier"),
        (status = 401, description = "Not logged in"),
        (status = 409, description = "Series already tracked"),
        (status = 422, description = "No matching series"),
        (status = 502, description = "Metadata service unavailable")
    )
)]
pub async fn add_series(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<AddSeriesRequest>, AppError>,
) -> AppResult<(StatusCode, Json<SeriesRecord>)> {
    let identifier = payload.identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::validation("Identifier must not be empty"));
    }

    let candidate = state.metadata.lookup(identifier).await?;
    let record = state.series.add(&identity.key, candidate).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Set the number of watched episodes
#[utoipa::path(
    patch,
    path = "/api/series/{id}",
    tag = "series",
    params(("id" = String, Path, description = "Series id")),
    request_body = UpdateWatchedRequest,
    responses(
        (status = 204, description = "Updated, or no series with this id"),
        (status = 400, description = "Invalid id, or a count that is not a non-negative integer"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn update_series(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateWatchedRequest>, AppError>,
) -> AppResult<StatusCode> {
    let id = parse_series_id(&id)?;
    let episodes_watched = u32::try_from(payload.episodes_watched).map_err(|_| {
        AppError::validation(format!(
            "Invalid number of watched episodes: {}",
            payload.episodes_watched
        ))
    })?;

    state
        .series
        .update_watched(&identity.key, id, episodes_watched)
        .await;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a series
#[utoipa::path(
    delete,
    path = "/api/series/{id}",
    tag = "series",
    params(("id" = String, Path, description = "Series id")),
    responses(
        (status = 204, description = "Deleted, or no series with this id"),
        (status = 400, description = "Invalid id"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn delete_series(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_series_id(&id)?;
    state.series.delete(&identity.key, id).await;
    Ok(StatusCode::NO_CONTENT)
}
