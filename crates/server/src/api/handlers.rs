mod admin;
mod auth;
mod export;
mod health;
mod library;
mod search;
mod series;

use crate::error::{AppError, AppResult};

pub use admin::{delete_user_series, list_users, rename_user};
pub use auth::{login, logout, me};
pub use export::export_pdf;
pub use health::health;
pub use library::get_library;
pub use search::search_series;
pub use series::{add_series, delete_series, list_series, update_series};

// Re-export utoipa path structs for OpenAPI routing
#[doc(hidden)]
pub use admin::{__path_delete_user_series, __path_list_users, __path_rename_user};
#[doc(hidden)]
pub use auth::{__path_login, __path_logout, __path_me};
#[doc(hidden)]
pub use export::__path_export_pdf;
#[doc(hidden)]
pub use health::__path_health;
#[doc(hidden)]
pub use library::__path_get_library;
#[doc(hidden)]
pub use search::__path_search_series;
#[doc(hidden)]
pub use series::{__path_add_series, __path_delete_series, __path_list_series, __path_update_series};

/// Parse a series id taken from the URL path.
fn parse_series_id(raw: &str) -> AppResult<u32> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid series id '{}'", raw)))
}
