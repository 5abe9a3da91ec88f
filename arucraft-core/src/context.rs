//! Everything a front end needs, owned in one place
//!
//! A front end builds one [`PanelContext`] at startup and passes it around
//! instead of reaching for global stores.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::PanelClient;
use crate::config::{ConfigError, PanelConfig};
use crate::guard::{GuardDecision, Route, check_route_permission};
use crate::models::ServerInfo;
use crate::notify::NotificationQueue;
use crate::session::Session;
use crate::store::{CacheStore, CookieJar, LocalStorage, LocalStore, Store, StoreError, UiStore};

const COOKIE_FILE: &str = "cookies.json";

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct PanelContext {
    pub config: PanelConfig,
    pub session: Session,
    pub notifications: NotificationQueue,
    pub client: PanelClient,
    pub cache: CacheStore,
    pub local: LocalStore,
    pub ui: UiStore,
}

impl PanelContext {
    /// Build a context whose persisted stores live in the configured data
    /// directory
    pub fn open(config: PanelConfig) -> Result<Self, ContextError> {
        let data_dir = config.data_dir()?;
        Self::open_in(config, data_dir)
    }

    pub fn open_in(config: PanelConfig, data_dir: PathBuf) -> Result<Self, ContextError> {
        info!(data_dir = %data_dir.display(), "Opening panel stores");
        let local = LocalStore::open(LocalStorage::new(&data_dir));
        let ui = UiStore::new(CookieJar::open(data_dir.join(COOKIE_FILE))?);
        for (name, persistence) in [
            (CacheStore::NAME, CacheStore::PERSISTENCE),
            (LocalStore::NAME, LocalStore::PERSISTENCE),
            (UiStore::NAME, UiStore::PERSISTENCE),
        ] {
            debug!(store = name, ?persistence, "Store ready");
        }
        Ok(Self::assemble(config, local, ui))
    }

    /// Context that keeps nothing on disk
    pub fn in_memory(config: PanelConfig) -> Self {
        Self::assemble(config, LocalStore::in_memory(), UiStore::new(CookieJar::in_memory()))
    }

    fn assemble(config: PanelConfig, local: LocalStore, ui: UiStore) -> Self {
        let session = match &config.session.token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(),
        };
        let notifications = NotificationQueue::new();
        let client = PanelClient::new(
            &config.api.base_url,
            session.clone(),
            Arc::new(notifications.clone()),
        );

        Self {
            config,
            session,
            notifications,
            client,
            cache: CacheStore::new(),
            local,
            ui,
        }
    }

    /// Run the permission guard for a navigation
    pub fn guard(&self, to: &Route, from: &Route) -> GuardDecision {
        let user = self.session.user();
        check_route_permission(to, from, user.as_ref())
    }

    /// Servers to list, refetching the list when it is stale or `force` is
    /// set, and the profiles of whatever came back
    pub async fn refresh_servers(&mut self, force: bool) -> Result<Vec<ServerInfo>, StoreError> {
        let now = Utc::now();
        if !force
            && !self
                .cache
                .server_list_expired(now, self.config.api.server_list_ttl_secs)
        {
            return Ok(self.cache.visible_servers());
        }

        let response = self
            .client
            .fetch_server_list(&self.config.api.server_list_path)
            .await?;
        let Some(servers) = response.into_data() else {
            return Ok(self.cache.visible_servers());
        };

        // Cache the list only once every listed server was checked
        let checked = self
            .local
            .check_server_profiles(&mut self.cache, &self.client, &servers)
            .await;
        match checked {
            Ok(visible) => {
                self.cache.apply_server_list(servers, now);
                Ok(visible)
            }
            Err(e) => {
                self.cache.invalidate_server_list();
                Err(e)
            }
        }
    }

    /// Load the logged-in player and their preferences
    ///
    /// Does nothing without a token. A 401 from the backend ends the
    /// session before the profile is requested.
    pub async fn refresh_player(&mut self) -> Result<(), StoreError> {
        if !self.session.is_authenticated() {
            return Ok(());
        }

        let me = self
            .client
            .fetch_current_user(&self.config.api.current_user_path)
            .await?;
        if let Some(user) = me.into_data() {
            self.session.set_user(user);
        }
        if !self.session.is_authenticated() {
            self.cache.player_profile = None;
            return Ok(());
        }

        let profile = self
            .client
            .fetch_player_profile(&self.config.api.player_profile_path)
            .await?;
        if let Some(profile) = profile.into_data() {
            self.cache.player_profile = Some(profile);
        }
        Ok(())
    }

    /// Load the known Minecraft releases and snapshots
    pub async fn refresh_minecraft_versions(&mut self) -> Result<(), StoreError> {
        let manifest = self
            .client
            .fetch_minecraft_versions(&self.config.external.minecraft_meta_base)
            .await?;
        self.cache.apply_version_manifest(&manifest);
        Ok(())
    }
}
