use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::normalize_cover_url;

/// Query parameters for series search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text query
    pub q: String,
}

/// A series found by the metadata provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SearchResult {
    pub title: String,
    pub year: String,
    pub external_id: String,
    pub cover_url: Option<String>,
}

impl From<omdb::SearchHit> for SearchResult {
    fn from(hit: omdb::SearchHit) -> Self {
        let cover_url = normalize_cover_url(hit.poster_url());
        Self {
            title: hit.title,
            year: hit.year,
            external_id: hit.imdb_id,
            cover_url,
        }
    }
}

/// Search results plus a hint when nothing usable was found
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reachability of the metadata service
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub metadata_available: bool,
    pub provider: String,
}
