use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::api::AdminUser;
use crate::error::{AppError, AppResult};
use crate::models::{RenameUserRequest, UserRecord};
use crate::state::AppState;

/// List the user catalog
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "All users ordered by key", body = Vec<UserRecord>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Json<Vec<UserRecord>> {
    Json(state.users.list())
}

/// Rename a non-admin user
#[utoipa::path(
    patch,
    path = "/api/admin/users/{key}",
    tag = "admin",
    params(("key" = String, Path, description = "User key")),
    request_body = RenameUserRequest,
    responses(
        (status = 200, description = "User renamed", body = UserRecord),
        (status = 400, description = "Empty display name or malformed body"),
        (status = 403, description = "Not an administrator, or target is an administrator"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn rename_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(key): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<RenameUserRequest>, AppError>,
) -> AppResult<Json<UserRecord>> {
    let user = state.users.rename(&key, &payload.display_name).await?;
    tracing::info!("{} renamed {}", admin.key, user.key);
    Ok(Json(user))
}

/// Delete all tracked series of a non-admin user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{key}/series",
    tag = "admin",
    params(("key" = String, Path, description = "User key")),
    responses(
        (status = 204, description = "Series data deleted"),
        (status = 403, description = "Not an administrator, or target is an administrator"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn delete_user_series(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    state
        .users
        .revoke_by_deleting_data(&key, &state.series)
        .await?;
    tracing::info!("{} deleted the series data of {}", admin.key, key);
    Ok(StatusCode::NO_CONTENT)
}
