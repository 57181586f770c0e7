use utoipa::OpenApi;

use crate::models::{
    AddSeriesRequest, HealthResponse, Identity, LibraryView, LoginRequest, RenameUserRequest,
    SearchResponse, SearchResult, SeriesRecord, SeriesStats, SortField, SortOrder, Theme,
    UpdateWatchedRequest, UserRecord,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Series Tracker API",
        version = "1.0.0"
    ),
    tags(
        (name = "auth", description = "Identity cookie endpoints"),
        (name = "library", description = "Sorted collection with statistics"),
        (name = "series", description = "Series management endpoints"),
        (name = "search", description = "Series search endpoints"),
        (name = "export", description = "Document export endpoints"),
        (name = "health", description = "Metadata service health"),
        (name = "admin", description = "User catalog administration")
    ),
    components(schemas(
        SeriesRecord,
        SeriesStats,
        SortField,
        SortOrder,
        LibraryView,
        AddSeriesRequest,
        UpdateWatchedRequest,
        SearchResult,
        SearchResponse,
        HealthResponse,
        Identity,
        UserRecord,
        Theme,
        LoginRequest,
        RenameUserRequest
    ))
)]
pub struct ApiDoc;
