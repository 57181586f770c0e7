use axum_extra::extract::cookie::{Cookie, SameSite};

use super::users::UserStore;
use crate::models::Identity;

/// Name of the cookie holding the catalog key of the logged-in user.
pub const SESSION_COOKIE: &str = "user";

/// Outcome of resolving a request's identity cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Authenticated(Identity),
    Unauthenticated,
}

impl Session {
    /// Absent or unrecognized cookie values are unauthenticated.
    pub fn resolve(users: &UserStore, cookie_value: Option<&str>) -> Self {
        cookie_value
            .and_then(|key| users.get(key.trim()))
            .map(|user| Session::Authenticated(user.into()))
            .unwrap_or(Session::Unauthenticated)
    }

    pub fn identity(self) -> Option<Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Unauthenticated => None,
        }
    }
}

pub fn session_cookie(key: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, key.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
