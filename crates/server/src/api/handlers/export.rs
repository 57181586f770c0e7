use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::api::CurrentUser;
use crate::error::AppResult;
use crate::state::AppState;

/// Download the caller's collection as a PDF
#[utoipa::path(
    get,
    path = "/api/export/pdf",
    tag = "export",
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf", body = Vec<u8>),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Rendering failed")
    )
)]
pub async fn export_pdf(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Response> {
    let series = state.series.load(&identity.key).await;
    let count = series.len();
    let pdf = state.exporter.export(series).await?;

    tracing::info!("Exported {} series of {} as PDF", count, identity.key);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=mylist.pdf"),
        ],
        pdf,
    )
        .into_response())
}
