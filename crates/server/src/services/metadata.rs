//! Metadata provider seam between the HTTP handlers and OMDb.

use std::sync::Arc;

use async_trait::async_trait;
use omdb::{OmdbClient, OmdbError};

use crate::models::{normalize_cover_url, SearchResult, SeriesCandidate};

/// Series hits of a search plus how many non-series hits were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub hits: Vec<SearchResult>,
    pub dropped: usize,
}

/// Source of series metadata.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolve an IMDb id or a title to a single series.
    async fn lookup(&self, identifier: &str) -> Result<SeriesCandidate, OmdbError>;

    /// Search series by free text.
    async fn search(&self, query: &str) -> Result<SearchOutcome, OmdbError>;

    /// Whether the upstream currently answers. Never fails.
    async fn health_check(&self) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// OMDb-backed provider.
pub struct OmdbProvider {
    client: Arc<OmdbClient>,
    episodes_per_season: u32,
}

impl OmdbProvider {
    pub fn new(client: Arc<OmdbClient>, episodes_per_season: u32) -> Self {
        Self {
            client,
            episodes_per_season,
        }
    }

    /// OMDb reports seasons, not episodes; the total is estimated from a
    /// fixed number of episodes per season.
    fn candidate(&self, title: omdb::Title) -> SeriesCandidate {
        let total_episodes = title
            .seasons()
            .map(|seasons| seasons.saturating_mul(self.episodes_per_season))
            .unwrap_or(0);
        let cover_url = normalize_cover_url(title.poster_url());

        SeriesCandidate {
            title: title.title,
            year: normalize_year(title.year),
            external_id: title.imdb_id,
            total_episodes,
            cover_url,
        }
    }
}

#[async_trait]
impl MetadataProvider for OmdbProvider {
    async fn lookup(&self, identifier: &str) -> Result<SeriesCandidate, OmdbError> {
        let title = self.client.lookup(identifier).await?;
        Ok(self.candidate(title))
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome, OmdbError> {
        let response = self.client.search(query).await?;
        Ok(split_series(response.results))
    }

    async fn health_check(&self) -> bool {
        self.client.health_check().await
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

fn normalize_year(year: String) -> String {
    if year.trim() == omdb::models::NOT_AVAILABLE {
        String::new()
    } else {
        year
    }
}

fn split_series(hits: Vec<omdb::SearchHit>) -> SearchOutcome {
    let total = hits.len();
    let hits: Vec<SearchResult> = hits
        .into_iter()
        .filter(|hit| hit.is_series())
        .map(SearchResult::from)
        .collect();

    SearchOutcome {
        dropped: total - hits.len(),
        hits,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;

    /// In-memory provider for handler and service tests.
    #[derive(Default)]
    pub struct StaticProvider {
        pub titles: HashMap<String, SeriesCandidate>,
        pub search_results: Vec<SearchResult>,
        pub dropped: usize,
        pub available: bool,
        pub lookups: Mutex<Vec<String>>,
    }

    impl StaticProvider {
        pub fn with_title(mut self, identifier: &str, candidate: SeriesCandidate) -> Self {
            self.titles.insert(identifier.to_string(), candidate);
            self
        }
    }

    #[async_trait]
    impl MetadataProvider for StaticProvider {
        async fn lookup(&self, identifier: &str) -> Result<SeriesCandidate, OmdbError> {
            self.lookups.lock().push(identifier.to_string());
            self.titles
                .get(identifier)
                .cloned()
                .ok_or(OmdbError::NotFound)
        }

        async fn search(&self, _query: &str) -> Result<SearchOutcome, OmdbError> {
            Ok(SearchOutcome {
                hits: self.search_results.clone(),
                dropped: self.dropped,
            })
        }

        async fn health_check(&self) -> bool {
            self.available
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }
}
