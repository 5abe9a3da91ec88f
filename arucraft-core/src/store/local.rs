use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{CacheStore, LocalStorage, Persistence, Store, StoreError};
use crate::api::PanelClient;
use crate::models::{ServerInfo, ServerProfile};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct LocalState {
    #[serde(default)]
    is_sidebar_collapsed: bool,
    #[serde(default)]
    server_profiles: HashMap<String, ServerProfile>,
}

/// Store persisted to the per-user data directory
///
/// Holds the sidebar preference and the server profile cache so both
/// survive restarts. Every mutation is written through immediately.
#[derive(Debug, Clone)]
pub struct LocalStore {
    state: LocalState,
    storage: Option<LocalStorage>,
}

impl Store for LocalStore {
    const NAME: &'static str = "local";
    const PERSISTENCE: Persistence = Persistence::Local;
}

impl LocalStore {
    /// Store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            state: LocalState::default(),
            storage: None,
        }
    }

    /// Load the store from `storage`; unreadable data starts over empty
    pub fn open(storage: LocalStorage) -> Self {
        let state = match storage.load::<LocalState>(Self::NAME) {
            Ok(Some(state)) => state,
            Ok(None) => LocalState::default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable local store");
                LocalState::default()
            }
        };
        Self {
            state,
            storage: Some(storage),
        }
    }

    pub fn is_sidebar_collapsed(&self) -> bool {
        self.state.is_sidebar_collapsed
    }

    pub fn toggle_sidebar_collapsed(&mut self) -> Result<(), StoreError> {
        self.state.is_sidebar_collapsed = !self.state.is_sidebar_collapsed;
        self.persist()
    }

    pub fn server_profiles(&self) -> &HashMap<String, ServerProfile> {
        &self.state.server_profiles
    }

    pub fn profile(&self, server_id: &str) -> Option<&ServerProfile> {
        self.state.server_profiles.get(server_id)
    }

    /// Forget everything, on disk too
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.state = LocalState::default();
        if let Some(storage) = &self.storage {
            storage.remove(Self::NAME)?;
        }
        Ok(())
    }

    /// Make sure every listed server has a fresh profile
    ///
    /// Stale profiles are evicted, and everything missing is fetched in one
    /// batched request. Servers that still have no profile afterwards are
    /// added to `cache.hidden_servers` and left out of the result; the
    /// others are returned in input order.
    pub async fn check_server_profiles(
        &mut self,
        cache: &mut CacheStore,
        client: &PanelClient,
        servers: &[ServerInfo],
    ) -> Result<Vec<ServerInfo>, StoreError> {
        let mut missing: Vec<String> = Vec::new();
        let mut evicted = false;

        for info in servers {
            if let Some(profile) = self.state.server_profiles.get(&info.id) {
                if profile.is_fresh_for(info) {
                    continue;
                }
                debug!(
                    server = %info.id,
                    edit_time = profile.edit_time,
                    profile_time = info.profile_time,
                    "Evicting stale server profile"
                );
                self.state.server_profiles.remove(&info.id);
                evicted = true;
            }
            if !missing.contains(&info.id) {
                missing.push(info.id.clone());
            }
        }

        if evicted {
            self.persist()?;
        }

        if !missing.is_empty() {
            info!(count = missing.len(), "Fetching server profiles");
            let response = client.fetch_server_profiles(&missing).await?;
            if let Some(profiles) = response.data {
                for profile in profiles {
                    self.state
                        .server_profiles
                        .insert(profile.server_id.clone(), profile);
                }
            }
            self.persist()?;
        }

        let mut visible = Vec::with_capacity(servers.len());
        for info in servers {
            if self.state.server_profiles.contains_key(&info.id) {
                cache.hidden_servers.remove(&info.id);
                visible.push(info.clone());
            } else {
                debug!(server = %info.id, "No profile, hiding server");
                cache.hidden_servers.insert(info.id.clone());
            }
        }
        Ok(visible)
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.storage {
            Some(storage) => storage.save(Self::NAME, &self.state),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_toggle_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open(LocalStorage::new(dir.path()));
        assert!(!store.is_sidebar_collapsed());

        store.toggle_sidebar_collapsed().unwrap();
        assert!(store.is_sidebar_collapsed());

        let reopened = LocalStore::open(LocalStorage::new(dir.path()));
        assert!(reopened.is_sidebar_collapsed());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.json"), "[1,2").unwrap();

        let store = LocalStore::open(LocalStorage::new(dir.path()));
        assert!(store.server_profiles().is_empty());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open(LocalStorage::new(dir.path()));
        store.toggle_sidebar_collapsed().unwrap();
        assert!(dir.path().join("local.json").exists());

        store.clear().unwrap();
        assert!(!store.is_sidebar_collapsed());
        assert!(!dir.path().join("local.json").exists());
    }
}
