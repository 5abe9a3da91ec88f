use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{Persistence, Store};
use crate::models::{MinecraftVersionManifest, MinecraftVersionType, PlayerProfile, ServerInfo};

/// Session-scoped application data
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    pub server_list: Vec<ServerInfo>,
    /// Servers left out of listings because no profile could be obtained
    pub hidden_servers: HashSet<String>,
    /// Unix seconds of the last server list fetch, 0 before the first
    pub last_fetch_server_list_ts: i64,
    pub is_server_list_loaded: bool,
    pub mc_release_list: Vec<String>,
    pub mc_snapshot_list: Vec<String>,
    pub player_profile: Option<PlayerProfile>,
}

impl Store for CacheStore {
    const NAME: &'static str = "appData";
    const PERSISTENCE: Persistence = Persistence::Memory;
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly fetched server list
    pub fn apply_server_list(&mut self, servers: Vec<ServerInfo>, now: DateTime<Utc>) {
        self.server_list = servers;
        self.last_fetch_server_list_ts = now.timestamp();
        self.is_server_list_loaded = true;
    }

    /// Force the next refresh to refetch the list
    pub fn invalidate_server_list(&mut self) {
        self.is_server_list_loaded = false;
    }

    /// Whether the cached list is older than `ttl_secs`
    pub fn server_list_expired(&self, now: DateTime<Utc>, ttl_secs: i64) -> bool {
        !self.is_server_list_loaded || now.timestamp() - self.last_fetch_server_list_ts >= ttl_secs
    }

    /// Cached servers that are not hidden
    pub fn visible_servers(&self) -> Vec<ServerInfo> {
        self.server_list
            .iter()
            .filter(|s| !self.hidden_servers.contains(&s.id))
            .cloned()
            .collect()
    }

    pub fn is_hidden(&self, server_id: &str) -> bool {
        self.hidden_servers.contains(server_id)
    }

    /// Split a version manifest into release and snapshot ids, newest first
    pub fn apply_version_manifest(&mut self, manifest: &MinecraftVersionManifest) {
        let ids_of = |kind: MinecraftVersionType| -> Vec<String> {
            manifest
                .versions
                .iter()
                .filter(|v| v.version_type == kind)
                .map(|v| v.id.clone())
                .collect()
        };
        self.mc_release_list = ids_of(MinecraftVersionType::Release);
        self.mc_snapshot_list = ids_of(MinecraftVersionType::Snapshot);
    }
}
