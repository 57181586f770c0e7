use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::models::Identity;
use crate::services::{Session, SESSION_COOKIE};
use crate::state::AppState;

/// The logged-in caller. Rejects with 401 when the identity cookie is
/// missing or names no known user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie_value = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

        Session::resolve(&state.users, cookie_value.as_deref())
            .identity()
            .map(CurrentUser)
            .ok_or(AppError::NotAuthenticated)
    }
}

/// A logged-in administrator. Rejects with 403 for everyone else.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        if !identity.is_admin {
            tracing::warn!("{} tried to access an admin endpoint", identity.key);
            return Err(AppError::not_authorized("Administrator privileges required"));
        }
        Ok(AdminUser(identity))
    }
}
