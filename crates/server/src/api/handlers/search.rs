use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use omdb::OmdbError;

use crate::api::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{SearchParams, SearchResponse};
use crate::services::SearchOutcome;
use crate::state::AppState;

const NO_RESULTS: &str = "no results found";
const ONLY_OTHER_TYPES: &str = "no series found (only movies or other types)";

/// Search series on the metadata service
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching series", body = SearchResponse),
        (status = 400, description = "Missing or empty query"),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Metadata service unavailable")
    )
)]
pub async fn search_series(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, AppError>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(AppError::validation("Search query must not be empty"));
    }

    let outcome = match state.metadata.search(&query).await {
        Ok(outcome) => outcome,
        Err(OmdbError::NotFound) => SearchOutcome::default(),
        Err(e) => return Err(e.into()),
    };

    let message = match (outcome.hits.is_empty(), outcome.dropped) {
        (false, _) => None,
        (true, 0) => Some(NO_RESULTS.to_string()),
        (true, _) => Some(ONLY_OTHER_TYPES.to_string()),
    };

    Ok(Json(SearchResponse {
        query,
        results: outcome.hits,
        message,
    }))
}
