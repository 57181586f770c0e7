use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{CookieJar, WithRejection};

use crate::api::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{Identity, LoginRequest};
use crate::services::{removal_cookie, session_cookie};
use crate::state::AppState;

/// Log in as one of the catalog users
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, identity cookie set", body = Identity),
        (status = 400, description = "Unknown user")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<Identity>)> {
    let key = payload.user.trim();
    let user = state
        .users
        .get(key)
        .ok_or_else(|| AppError::validation(format!("Unknown user '{}'", key)))?;

    tracing::info!("{} logged in", user.key);
    let jar = jar.add(session_cookie(&user.key));
    Ok((jar, Json(user.into())))
}

/// Log out by clearing the identity cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Identity cookie cleared")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(removal_cookie()), StatusCode::NO_CONTENT)
}

/// Get the current identity
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current identity", body = Identity),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}
