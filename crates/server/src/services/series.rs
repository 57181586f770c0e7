use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::storage::{JsonStorage, StorageError, WriteGuard};
use crate::models::{SeriesCandidate, SeriesRecord, SeriesStats, SortField, SortOrder};

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("'{title}' ({external_id}) is already in the library")]
    Duplicate { external_id: String, title: String },
}

/// Per-user series collections, one JSON document per user.
///
/// Reads fail soft to an empty collection. Write failures are logged and
/// swallowed so a request never fails because of local persistence.
pub struct SeriesStore {
    storage: Arc<JsonStorage>,
}

impl SeriesStore {
    pub fn new(storage: Arc<JsonStorage>) -> Self {
        Self { storage }
    }

    /// Load a user's collection with freshly derived progress values.
    pub async fn load(&self, user: &str) -> Vec<SeriesRecord> {
        match self.read(user).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!("Failed to load series for {}: {}", user, e);
                Vec::new()
            }
        }
    }

    /// Load inside a locked read-modify-write cycle. An unparsable file is
    /// moved aside first so the following save cannot overwrite it.
    async fn load_for_update(&self, guard: &WriteGuard<'_>, user: &str) -> Vec<SeriesRecord> {
        match self.read(user).await {
            Ok(series) => series,
            Err(e @ StorageError::Parse { .. }) => {
                let path = self.storage.document_path(user);
                match self.storage.quarantine(guard, &path).await {
                    Ok(moved) => tracing::warn!(
                        "Unreadable series file of {} moved to {}: {}",
                        user,
                        moved.display(),
                        e
                    ),
                    Err(move_err) => tracing::error!(
                        "Unreadable series file of {} could not be moved aside: {}",
                        user,
                        move_err
                    ),
                }
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to load series for {}: {}", user, e);
                Vec::new()
            }
        }
    }

    async fn read(&self, user: &str) -> Result<Vec<SeriesRecord>, StorageError> {
        let path = self.storage.document_path(user);
        let mut series: Vec<SeriesRecord> = self.storage.read(&path).await?.unwrap_or_default();
        for record in &mut series {
            record.refresh_progress();
        }
        Ok(series)
    }

    /// Replace a user's collection on disk.
    pub async fn save(&self, user: &str, series: &[SeriesRecord]) {
        let guard = self.storage.lock().await;
        self.save_locked(&guard, user, series).await;
    }

    async fn save_locked(&self, guard: &WriteGuard<'_>, user: &str, series: &[SeriesRecord]) {
        let path = self.storage.document_path(user);
        if let Err(e) = self.storage.write(guard, &path, series).await {
            tracing::error!("Failed to save series for {}: {}", user, e);
        } else {
            tracing::debug!("Saved {} series for {}", series.len(), user);
        }
    }

    /// Append a new series unless its external id is already tracked.
    pub async fn add(
        &self,
        user: &str,
        candidate: SeriesCandidate,
    ) -> Result<SeriesRecord, SeriesError> {
        let guard = self.storage.lock().await;
        let mut series = self.load_for_update(&guard, user).await;

        if let Some(existing) = series
            .iter()
            .find(|s| s.external_id == candidate.external_id)
        {
            return Err(SeriesError::Duplicate {
                external_id: existing.external_id.clone(),
                title: existing.title.clone(),
            });
        }

        let record = SeriesRecord::from_candidate(next_id(&series), candidate);
        series.push(record.clone());
        self.save_locked(&guard, user, &series).await;

        tracing::info!("{} added '{}' ({})", user, record.title, record.external_id);
        Ok(record)
    }

    /// Overwrite the watched-episode count. Returns `false` (and writes
    /// nothing) when no series has this id.
    pub async fn update_watched(&self, user: &str, id: u32, episodes_watched: u32) -> bool {
        let guard = self.storage.lock().await;
        let mut series = self.load_for_update(&guard, user).await;

        let Some(record) = series.iter_mut().find(|s| s.id == id) else {
            tracing::debug!("update_watched: {} has no series {}", user, id);
            return false;
        };
        record.episodes_watched = episodes_watched;
        record.refresh_progress();

        self.save_locked(&guard, user, &series).await;
        true
    }

    /// Remove a series. Returns `false` (and writes nothing) when absent.
    pub async fn delete(&self, user: &str, id: u32) -> bool {
        let guard = self.storage.lock().await;
        let mut series = self.load_for_update(&guard, user).await;

        let before = series.len();
        series.retain(|s| s.id != id);
        if series.len() == before {
            return false;
        }

        self.save_locked(&guard, user, &series).await;
        true
    }

    /// Delete a user's whole collection file.
    pub async fn delete_all(&self, user: &str) -> bool {
        let guard = self.storage.lock().await;
        let path = self.storage.document_path(user);
        match self.storage.remove(&guard, &path).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::error!("Failed to delete series data of {}: {}", user, e);
                false
            }
        }
    }

    /// Fill in cover URLs for records that have none, keyed by series id.
    /// Saves once if anything changed and returns the number of records updated.
    pub async fn apply_covers(&self, user: &str, covers: &HashMap<u32, String>) -> usize {
        if covers.is_empty() {
            return 0;
        }

        let guard = self.storage.lock().await;
        let mut series = self.load_for_update(&guard, user).await;

        let mut updated = 0;
        for record in series.iter_mut().filter(|s| !s.has_cover()) {
            if let Some(url) = covers.get(&record.id) {
                record.cover_url = Some(url.clone());
                updated += 1;
            }
        }

        if updated > 0 {
            self.save_locked(&guard, user, &series).await;
        }
        updated
    }
}

/// `max(existing ids) + 1`, starting at 1.
pub fn next_id(series: &[SeriesRecord]) -> u32 {
    series.iter().map(|s| s.id).max().unwrap_or(0) + 1
}

pub fn stats(series: &[SeriesRecord]) -> SeriesStats {
    SeriesStats {
        total: series.len(),
        completed: series.iter().filter(|s| s.is_completed()).count(),
        episodes_watched: series.iter().map(|s| u64::from(s.episodes_watched)).sum(),
    }
}

/// Sort in place. Ties on progress/watched break by ascending title in
/// both directions; title sorting is stable without a tie-break.
pub fn sort(series: &mut [SeriesRecord], field: SortField, order: SortOrder) {
    let directed = |ordering: Ordering| match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    };

    match field {
        SortField::Title => series.sort_by(|a, b| directed(a.title.cmp(&b.title))),
        SortField::Progress => series.sort_by(|a, b| {
            directed(a.progress.cmp(&b.progress)).then_with(|| a.title.cmp(&b.title))
        }),
        SortField::Watched => series.sort_by(|a, b| {
            directed(a.episodes_watched.cmp(&b.episodes_watched))
                .then_with(|| a.title.cmp(&b.title))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeriesStatus;

    fn candidate(external_id: &str, title: &str, total_episodes: u32) -> SeriesCandidate {
        SeriesCandidate {
            title: title.to_string(),
            year: "2020".to_string(),
            external_id: external_id.to_string(),
            total_episodes,
            cover_url: None,
        }
    }

    fn record(id: u32, title: &str, watched: u32, total: u32) -> SeriesRecord {
        let mut record = SeriesRecord::from_candidate(id, candidate(&format!("tt{id}"), title, total));
        record.episodes_watched = watched;
        record.refresh_progress();
        record
    }

    fn store() -> (tempfile::TempDir, SeriesStore) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(JsonStorage::new(dir.path()));
        (dir, SeriesStore::new(storage))
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let (_dir, store) = store();
        assert!(store.load("user_a").await.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_empty() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("user_a.json"), "[{\"id\": ").unwrap();
        assert!(store.load("user_a").await.is_empty());
    }

    #[tokio::test]
    async fn test_add_moves_corrupt_file_aside() {
        let (dir, store) = store();
        let path = dir.path().join("user_a.json");
        std::fs::write(&path, "[{\"id\": ").unwrap();

        let added = store.add("user_a", candidate("tt1", "Dark", 10)).await.unwrap();
        assert_eq!(added.id, 1);

        let corrupt = dir.path().join("user_a.json.corrupt");
        assert_eq!(std::fs::read_to_string(corrupt).unwrap(), "[{\"id\": ");
        assert_eq!(store.load("user_a").await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_keep_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SeriesStore::new(Arc::new(JsonStorage::new(dir.path()))));

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .add("user_a", candidate(&format!("tt{i}"), &format!("Series {i}"), 10))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=32).collect::<Vec<u32>>());

        let on_disk = store.load("user_a").await;
        assert_eq!(on_disk.len(), 32);
        // Stored order follows insertion, so ids strictly increase.
        assert!(on_disk.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_add_assigns_increasing_ids() {
        let (_dir, store) = store();

        let mut ids = Vec::new();
        for (i, title) in ["Dark", "Lost", "Fargo", "Severance"].iter().enumerate() {
            let added = store
                .add("user_a", candidate(&format!("tt{}", 100 + i), title, 10))
                .await
                .unwrap();
            assert_eq!(added.status, SeriesStatus::Watching);
            assert_eq!(added.episodes_watched, 0);
            ids.push(added.id);
        }

        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(store.load("user_a").await.len(), 4);
    }

    #[tokio::test]
    async fn test_add_after_delete_uses_max_plus_one() {
        let (_dir, store) = store();
        store.add("user_a", candidate("tt1", "A", 10)).await.unwrap();
        store.add("user_a", candidate("tt2", "B", 10)).await.unwrap();
        store.add("user_a", candidate("tt3", "C", 10)).await.unwrap();
        assert!(store.delete("user_a", 1).await);

        let added = store.add("user_a", candidate("tt4", "D", 10)).await.unwrap();
        assert_eq!(added.id, 4);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_rejected() {
        let (dir, store) = store();
        store.add("user_a", candidate("tt0944947", "Game of Thrones", 80)).await.unwrap();
        let before = std::fs::read(dir.path().join("user_a.json")).unwrap();

        let result = store
            .add("user_a", candidate("tt0944947", "Game of Thrones", 80))
            .await;

        assert!(matches!(result, Err(SeriesError::Duplicate { .. })));
        let after = std::fs::read(dir.path().join("user_a.json")).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_collections_are_per_user() {
        let (_dir, store) = store();
        store.add("user_a", candidate("tt1", "Dark", 10)).await.unwrap();
        let added = store.add("user_b", candidate("tt1", "Dark", 10)).await.unwrap();

        assert_eq!(added.id, 1);
        assert_eq!(store.load("user_a").await.len(), 1);
        assert_eq!(store.load("user_b").await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_watched() {
        let (_dir, store) = store();
        let added = store.add("user_a", candidate("tt1", "Dark", 10)).await.unwrap();

        assert!(store.update_watched("user_a", added.id, 5).await);

        let series = store.load("user_a").await;
        assert_eq!(series[0].episodes_watched, 5);
        assert_eq!(series[0].progress, 50);
    }

    #[tokio::test]
    async fn test_update_watched_absent_id_leaves_file_untouched() {
        let (dir, store) = store();
        store.add("user_a", candidate("tt1", "Dark", 10)).await.unwrap();
        let path = dir.path().join("user_a.json");
        let before = std::fs::read(&path).unwrap();

        assert!(!store.update_watched("user_a", 42, 3).await);

        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);

        let series = store.load("user_a").await;
        store.save("user_a", &series).await;
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store();
        let a = store.add("user_a", candidate("tt1", "Dark", 10)).await.unwrap();
        store.add("user_a", candidate("tt2", "Lost", 10)).await.unwrap();

        assert!(store.delete("user_a", a.id).await);
        let after_first = store.load("user_a").await;

        assert!(!store.delete("user_a", a.id).await);
        assert_eq!(store.load("user_a").await, after_first);
        assert_eq!(after_first.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let (dir, store) = store();
        store.add("user_b", candidate("tt1", "Dark", 10)).await.unwrap();

        assert!(store.delete_all("user_b").await);
        assert!(!dir.path().join("user_b.json").exists());
        assert!(!store.delete_all("user_b").await);
    }

    #[tokio::test]
    async fn test_apply_covers_only_fills_missing() {
        let (_dir, store) = store();
        store.add("user_a", candidate("tt1", "Dark", 10)).await.unwrap();
        let mut with_cover = candidate("tt2", "Lost", 10);
        with_cover.cover_url = Some("https://example.com/lost.jpg".to_string());
        store.add("user_a", with_cover).await.unwrap();

        let covers = HashMap::from([
            (1, "https://example.com/dark.jpg".to_string()),
            (2, "https://example.com/other.jpg".to_string()),
        ]);
        assert_eq!(store.apply_covers("user_a", &covers).await, 1);

        let series = store.load("user_a").await;
        assert_eq!(series[0].cover_url.as_deref(), Some("https://example.com/dark.jpg"));
        assert_eq!(series[1].cover_url.as_deref(), Some("https://example.com/lost.jpg"));
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]), 1);
        assert_eq!(next_id(&[record(7, "A", 0, 0), record(3, "B", 0, 0)]), 8);
    }

    #[test]
    fn test_stats() {
        let series = vec![
            record(1, "A", 10, 10),
            record(2, "B", 5, 10),
            record(3, "C", 20, 20),
            record(4, "D", 0, 10),
        ];
        let stats = stats(&series);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.episodes_watched, 35);
    }

    #[test]
    fn test_sort_progress_desc_breaks_ties_by_title() {
        let mut series = vec![
            record(1, "B", 5, 10),
            record(2, "A", 5, 10),
            record(3, "C", 9, 10),
        ];
        sort(&mut series, SortField::Progress, SortOrder::Desc);
        let titles: Vec<_> = series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_progress_asc_breaks_ties_by_title() {
        let mut series = vec![
            record(1, "C", 9, 10),
            record(2, "B", 5, 10),
            record(3, "A", 5, 10),
        ];
        sort(&mut series, SortField::Progress, SortOrder::Asc);
        let titles: Vec<_> = series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_watched() {
        let mut series = vec![
            record(1, "B", 3, 10),
            record(2, "A", 3, 10),
            record(3, "C", 1, 10),
        ];
        sort(&mut series, SortField::Watched, SortOrder::Desc);
        let titles: Vec<_> = series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);

        sort(&mut series, SortField::Watched, SortOrder::Asc);
        let titles: Vec<_> = series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_title() {
        let mut series = vec![record(1, "Lost", 0, 0), record(2, "Dark", 0, 0), record(3, "Fargo", 0, 0)];
        sort(&mut series, SortField::Title, SortOrder::Asc);
        let titles: Vec<_> = series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Dark", "Fargo", "Lost"]);

        sort(&mut series, SortField::Title, SortOrder::Desc);
        let titles: Vec<_> = series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Lost", "Fargo", "Dark"]);
    }
}
