use serde::{Deserialize, Serialize};

use crate::OmdbError;

/// Placeholder OMDb uses for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Single-title lookup result (`?i=` / `?t=`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Season count as reported by OMDb, `"N/A"` when unknown
    #[serde(rename = "totalSeasons", default)]
    pub total_seasons: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl Title {
    /// Parsed season count, `None` when absent or not numeric.
    pub fn seasons(&self) -> Option<u32> {
        self.total_seasons
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
    }

    /// Poster URL with OMDb's `"N/A"` placeholder filtered out.
    pub fn poster_url(&self) -> Option<&str> {
        available(self.poster.as_deref())
    }
}

/// One entry of a search response (`?s=`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// `series`, `movie` or `episode`
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl SearchHit {
    pub fn is_series(&self) -> bool {
        self.kind.eq_ignore_ascii_case("series")
    }

    pub fn poster_url(&self) -> Option<&str> {
        available(self.poster.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Search", default)]
    pub results: Vec<SearchHit>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
}

/// The `Response` / `Error` envelope every OMDb body carries.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseStatus {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl ResponseStatus {
    pub(crate) fn into_result(self) -> crate::Result<()> {
        if self.response.eq_ignore_ascii_case("false") {
            return Err(OmdbError::from_api_message(self.error));
        }
        Ok(())
    }
}

fn available(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}
