use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Watch status of a tracked series.
///
/// New entries start as `Watching`; any other value read from disk is kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeriesStatus {
    #[default]
    Watching,
    Other(String),
}

impl SeriesStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SeriesStatus::Watching => "Watching",
            SeriesStatus::Other(s) => s,
        }
    }
}

impl From<String> for SeriesStatus {
    fn from(s: String) -> Self {
        if s == "Watching" {
            SeriesStatus::Watching
        } else {
            SeriesStatus::Other(s)
        }
    }
}

impl From<SeriesStatus> for String {
    fn from(status: SeriesStatus) -> Self {
        match status {
            SeriesStatus::Watching => "Watching".to_string(),
            SeriesStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for SeriesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A series tracked by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeriesRecord {
    /// Unique within the owning user's collection
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub year: String,
    /// IMDb id used by OMDb (e.g. `tt0944947`)
    #[serde(rename = "imdb_id")]
    pub external_id: String,
    #[serde(default)]
    pub episodes_watched: u32,
    #[serde(default)]
    pub total_episodes: u32,
    #[serde(default)]
    #[schema(value_type = String, example = "Watching")]
    pub status: SeriesStatus,
    /// Percentage watched, derived from the episode counts on every load
    #[serde(default)]
    pub progress: u8,
    #[serde(
        default,
        deserialize_with = "deserialize_cover_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_url: Option<String>,
}

impl SeriesRecord {
    pub fn from_candidate(id: u32, candidate: SeriesCandidate) -> Self {
        let mut record = Self {
            id,
            title: candidate.title,
            year: candidate.year,
            external_id: candidate.external_id,
            episodes_watched: 0,
            total_episodes: candidate.total_episodes,
            status: SeriesStatus::Watching,
            progress: 0,
            cover_url: candidate.cover_url,
        };
        record.refresh_progress();
        record
    }

    /// `floor(watched * 100 / total)`, `0` without a total, capped at 100.
    pub fn compute_progress(episodes_watched: u32, total_episodes: u32) -> u8 {
        if total_episodes == 0 {
            return 0;
        }
        let percent = u64::from(episodes_watched) * 100 / u64::from(total_episodes);
        percent.min(100) as u8
    }

    pub fn refresh_progress(&mut self) {
        self.progress = Self::compute_progress(self.episodes_watched, self.total_episodes);
    }

    pub fn is_completed(&self) -> bool {
        Self::compute_progress(self.episodes_watched, self.total_episodes) == 100
    }

    pub fn has_cover(&self) -> bool {
        self.cover_url.is_some()
    }
}

/// Metadata for a series about to be added, as resolved by a metadata provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeriesCandidate {
    pub title: String,
    pub year: String,
    pub external_id: String,
    pub total_episodes: u32,
    pub cover_url: Option<String>,
}

/// Aggregate numbers shown above a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct SeriesStats {
    /// Number of tracked series
    pub total: usize,
    /// Series whose progress is 100%
    pub completed: usize,
    /// Sum of watched episodes over all series
    pub episodes_watched: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Title,
    Progress,
    Watched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query parameters for the library view
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LibraryQuery {
    /// Sort field: title (default), progress or watched
    pub sort: Option<SortField>,
    /// Sort direction: asc (default) or desc
    pub order: Option<SortOrder>,
}

/// Sorted collection with its statistics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryView {
    pub series: Vec<SeriesRecord>,
    pub stats: SeriesStats,
    pub sort: SortField,
    pub order: SortOrder,
    /// Whether the metadata service answered the health check
    pub metadata_available: bool,
}

/// Request body for adding a series
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddSeriesRequest {
    /// IMDb id (`tt…`) or a series title
    pub identifier: String,
}

/// Request body for updating the watched-episode count
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateWatchedRequest {
    /// New number of watched episodes, must not be negative
    pub episodes_watched: i64,
}

/// Treat missing, empty and OMDb's `"N/A"` cover values alike.
pub fn normalize_cover_url(url: Option<&str>) -> Option<String> {
    url.map(str::trim)
        .filter(|u| !u.is_empty() && *u != omdb::models::NOT_AVAILABLE)
        .map(str::to_string)
}

fn deserialize_cover_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(normalize_cover_url(value.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_half() {
        assert_eq!(SeriesRecord::compute_progress(5, 10), 50);
    }

    #[test]
    fn test_progress_without_total() {
        assert_eq!(SeriesRecord::compute_progress(0, 0), 0);
        assert_eq!(SeriesRecord::compute_progress(7, 0), 0);
    }

    #[test]
    fn test_progress_rounds_down_and_caps() {
        assert_eq!(SeriesRecord::compute_progress(1, 3), 33);
        assert_eq!(SeriesRecord::compute_progress(2, 3), 66);
        assert_eq!(SeriesRecord::compute_progress(10, 10), 100);
        assert_eq!(SeriesRecord::compute_progress(15, 10), 100);
    }

    #[test]
    fn test_record_reads_legacy_file_format() {
        let json = r#"{
            "id": 3,
            "title": "Dark",
            "year": "2017–2020",
            "imdb_id": "tt5753856",
            "episodes_watched": 13,
            "total_episodes": 26,
            "status": "Watching",
            "progress": 0,
            "cover_url": "N/A",
            "rating": 9
        }"#;
        let mut record: SeriesRecord = serde_json::from_str(json).unwrap();
        record.refresh_progress();

        assert_eq!(record.external_id, "tt5753856");
        assert_eq!(record.status, SeriesStatus::Watching);
        assert_eq!(record.progress, 50);
        assert_eq!(record.cover_url, None);
    }

    #[test]
    fn test_status_keeps_free_text() {
        let status: SeriesStatus = serde_json::from_str(r#""On hold""#).unwrap();
        assert_eq!(status, SeriesStatus::Other("On hold".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""On hold""#);
        assert_eq!(
            serde_json::to_string(&SeriesStatus::Watching).unwrap(),
            r#""Watching""#
        );
    }

    #[test]
    fn test_normalize_cover_url() {
        assert_eq!(normalize_cover_url(None), None);
        assert_eq!(normalize_cover_url(Some("")), None);
        assert_eq!(normalize_cover_url(Some("N/A")), None);
        assert_eq!(
            normalize_cover_url(Some(" https://example.com/a.jpg ")),
            Some("https://example.com/a.jpg".to_string())
        );
    }
}
