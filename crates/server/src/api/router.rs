use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{openapi::ApiDoc, state::AppState};

use super::handlers;

pub fn create_router(state: AppState) -> (Router, utoipa::openapi::OpenApi) {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // Auth
        .routes(routes!(handlers::login))
        .routes(routes!(handlers::logout))
        .routes(routes!(handlers::me))
        // Library
        .routes(routes!(handlers::get_library))
        .routes(routes!(handlers::list_series, handlers::add_series))
        .routes(routes!(handlers::update_series, handlers::delete_series))
        .routes(routes!(handlers::search_series))
        .routes(routes!(handlers::export_pdf))
        .routes(routes!(handlers::health))
        // Admin
        .routes(routes!(handlers::list_users))
        .routes(routes!(handlers::rename_user))
        .routes(routes!(handlers::delete_user_series))
        .with_state(state)
        .split_for_parts();

    (router, api)
}
