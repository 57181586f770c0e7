use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::series::SeriesStore;
use super::storage::JsonStorage;
use crate::models::{Theme, UserRecord};

const USERS_DOCUMENT: &str = "users";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Unknown user '{0}'")]
    NotFound(String),
    #[error("User '{0}' is an administrator and cannot be modified")]
    Protected(String),
    #[error("Display name must not be empty")]
    EmptyName,
}

/// The fixed catalog every process starts from. `user_a` is the owner.
pub fn default_catalog() -> BTreeMap<String, UserRecord> {
    [
        UserRecord::new("user_a", "Nutzer A", Theme::Dark, true),
        UserRecord::new("user_b", "Nutzer B", Theme::Light, false),
        UserRecord::new("user_c", "Nutzer C", Theme::Light, false),
        UserRecord::new("user_d", "Nutzer D", Theme::Light, false),
    ]
    .into_iter()
    .map(|user| (user.key.clone(), user))
    .collect()
}

/// Process-wide user catalog persisted as a single JSON document.
///
/// The key set never changes at runtime; only display names of
/// non-admin users can be edited.
pub struct UserStore {
    storage: Arc<JsonStorage>,
    users: RwLock<BTreeMap<String, UserRecord>>,
}

impl UserStore {
    /// Load the catalog, seeding the file with the defaults when it does not exist.
    pub async fn load(storage: Arc<JsonStorage>) -> Self {
        let path = storage.document_path(USERS_DOCUMENT);
        let mut users = default_catalog();

        match storage.read::<BTreeMap<String, UserRecord>>(&path).await {
            Ok(Some(persisted)) => {
                merge_persisted(&mut users, persisted);
                tracing::info!("Loaded user catalog from {}", path.display());
            }
            Ok(None) => {
                let store = Self {
                    storage,
                    users: RwLock::new(users),
                };
                store.save().await;
                tracing::info!("Created default user catalog at {}", path.display());
                return store;
            }
            Err(e) => tracing::warn!("Failed to load user catalog, using defaults: {}", e),
        }

        Self {
            storage,
            users: RwLock::new(users),
        }
    }

    fn path(&self) -> PathBuf {
        self.storage.document_path(USERS_DOCUMENT)
    }

    /// Persist the full current catalog.
    pub async fn save(&self) {
        let guard = self.storage.lock().await;
        // Snapshot under the write lock so the last writer persists the latest state.
        let snapshot = self.users.read().clone();
        if let Err(e) = self.storage.write(&guard, &self.path(), &snapshot).await {
            tracing::error!("Failed to save user catalog: {}", e);
        }
    }

    pub fn get(&self, key: &str) -> Option<UserRecord> {
        self.users.read().get(key).cloned()
    }

    /// All users ordered by key.
    pub fn list(&self) -> Vec<UserRecord> {
        self.users.read().values().cloned().collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.users.read().keys().cloned().collect()
    }

    /// Change a non-admin user's display name. The caller must have checked
    /// that the acting identity is an admin.
    pub async fn rename(&self, key: &str, display_name: &str) -> Result<UserRecord, UserError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(UserError::EmptyName);
        }

        let updated = {
            let mut users = self.users.write();
            let user = users
                .get_mut(key)
                .ok_or_else(|| UserError::NotFound(key.to_string()))?;
            if user.is_admin {
                return Err(UserError::Protected(key.to_string()));
            }
            user.display_name = display_name.to_string();
            user.clone()
        };

        self.save().await;
        tracing::info!("Renamed {} to '{}'", key, updated.display_name);
        Ok(updated)
    }

    /// Delete a non-admin user's tracked series. The key itself stays in the
    /// catalog. Returns whether a data file existed.
    pub async fn revoke_by_deleting_data(
        &self,
        key: &str,
        series: &SeriesStore,
    ) -> Result<bool, UserError> {
        let user = self
            .get(key)
            .ok_or_else(|| UserError::NotFound(key.to_string()))?;
        if user.is_admin {
            return Err(UserError::Protected(key.to_string()));
        }

        let removed = series.delete_all(key).await;
        tracing::info!("Deleted series data of {} (file existed: {})", key, removed);
        Ok(removed)
    }
}

/// Overlay persisted values onto the defaults. Unknown keys are ignored and
/// the admin flag always comes from the defaults.
fn merge_persisted(users: &mut BTreeMap<String, UserRecord>, persisted: BTreeMap<String, UserRecord>) {
    for (key, value) in persisted {
        match users.get_mut(&key) {
            Some(user) => {
                user.display_name = value.display_name;
                user.theme = value.theme;
                user.lang = value.lang;
            }
            None => tracing::debug!("Ignoring unknown user '{}' in catalog file", key),
        }
    }
}
