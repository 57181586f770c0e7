use std::collections::HashMap;

use super::metadata::MetadataProvider;
use super::series::SeriesStore;
use super::users::UserStore;

/// Counts of a cover backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub users: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Look up covers for every tracked series that has none and persist them.
///
/// Runs once at startup when enabled. A failed lookup only skips that series.
pub async fn backfill_covers(
    users: &UserStore,
    series: &SeriesStore,
    metadata: &dyn MetadataProvider,
) -> BackfillReport {
    tracing::info!("CoverBackfill: Starting cover backfill");
    let mut report = BackfillReport::default();

    for user in users.keys() {
        let missing: Vec<(u32, String)> = series
            .load(&user)
            .await
            .into_iter()
            .filter(|s| !s.has_cover())
            .map(|s| (s.id, s.external_id))
            .collect();

        if missing.is_empty() {
            continue;
        }
        report.users += 1;

        let mut covers = HashMap::new();
        for (id, external_id) in missing {
            match metadata.lookup(&external_id).await {
                Ok(candidate) => match candidate.cover_url {
                    Some(url) => {
                        covers.insert(id, url);
                    }
                    None => {
                        tracing::debug!("CoverBackfill: No cover available for {}", external_id);
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        "CoverBackfill: Failed to look up {} for {}: {}",
                        external_id,
                        user,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        report.updated += series.apply_covers(&user, &covers).await;
    }

    tracing::info!(
        "CoverBackfill: Completed for {} users: {} updated, {} failed",
        report.users,
        report.updated,
        report.failed
    );
    report
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::SeriesCandidate;
    use crate::services::metadata::testing::StaticProvider;
    use crate::services::JsonStorage;

    fn candidate(external_id: &str, cover_url: Option<&str>) -> SeriesCandidate {
        SeriesCandidate {
            title: format!("Series {external_id}"),
            year: "2020".to_string(),
            external_id: external_id.to_string(),
            total_episodes: 10,
            cover_url: cover_url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_backfill_fills_missing_covers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(JsonStorage::new(dir.path()));
        let users = UserStore::load(storage.clone()).await;
        let series = SeriesStore::new(storage);

        series.add("user_a", candidate("tt1", None)).await.unwrap();
        series
            .add("user_a", candidate("tt2", Some("http://img/2.jpg")))
            .await
            .unwrap();
        series.add("user_b", candidate("tt3", None)).await.unwrap();

        let provider = StaticProvider::default()
            .with_title("tt1", candidate("tt1", Some("http://img/1.jpg")));

        let report = backfill_covers(&users, &series, &provider).await;
        assert_eq!(
            report,
            BackfillReport {
                users: 2,
                updated: 1,
                failed: 1,
            }
        );

        let a = series.load("user_a").await;
        assert_eq!(a[0].cover_url.as_deref(), Some("http://img/1.jpg"));
        assert_eq!(a[1].cover_url.as_deref(), Some("http://img/2.jpg"));
        assert!(series.load("user_b").await[0].cover_url.is_none());

        // Series that already had a cover were not looked up.
        let lookups = provider.lookups.lock().clone();
        assert_eq!(lookups, vec!["tt1".to_string(), "tt3".to_string()]);
    }

    #[tokio::test]
    async fn test_backfill_without_series() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(JsonStorage::new(dir.path()));
        let users = UserStore::load(storage.clone()).await;
        let series = SeriesStore::new(storage);

        let report = backfill_covers(&users, &series, &StaticProvider::default()).await;
        assert_eq!(report, BackfillReport::default());
    }
}
