use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::api::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{LibraryQuery, LibraryView};
use crate::services;
use crate::state::AppState;

/// Get the caller's sorted collection with statistics
#[utoipa::path(
    get,
    path = "/api/library",
    tag = "library",
    params(LibraryQuery),
    responses(
        (status = 200, description = "Sorted collection", body = LibraryView),
        (status = 400, description = "Invalid sort parameters"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_library(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Query(query), _): WithRejection<Query<LibraryQuery>, AppError>,
) -> AppResult<Json<LibraryView>> {
    let sort = query.sort.unwrap_or_default();
    let order = query.order.unwrap_or_default();

    let mut series = state.series.load(&identity.key).await;
    services::sort(&mut series, sort, order);
    let stats = services::stats(&series);
    let metadata_available = state.metadata.health_check().await;

    Ok(Json(LibraryView {
        series,
        stats,
        sort,
        order,
        metadata_available,
    }))
}
