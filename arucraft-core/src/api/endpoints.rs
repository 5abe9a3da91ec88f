//! Typed wrappers around the endpoints the stores need

use super::{ApiError, PanelClient, RequestOptions};
use crate::models::{
    ApiResponse, AuthedPlayerInfo, HttpMethod, MinecraftVersionManifest, PlayerProfile,
    ServerInfo, ServerProfile,
};

/// Profile batch endpoint
pub const SERVER_PROFILES_PATH: &str = "/servers";

/// Mojang launcher metadata
pub const VERSION_MANIFEST_PATH: &str = "/mc/game/version_manifest_v2.json";

impl PanelClient {
    /// Fetch the profiles of several servers in one request
    pub async fn fetch_server_profiles(
        &self,
        ids: &[String],
    ) -> Result<ApiResponse<Vec<ServerProfile>>, ApiError> {
        self.request(
            HttpMethod::Get,
            SERVER_PROFILES_PATH,
            RequestOptions::new().query_all("ids", ids),
        )
        .await
    }

    /// Fetch the live server list from `path`
    pub async fn fetch_server_list(
        &self,
        path: &str,
    ) -> Result<ApiResponse<Vec<ServerInfo>>, ApiError> {
        self.request(HttpMethod::Get, path, RequestOptions::new()).await
    }

    /// Fetch the player the session token belongs to
    pub async fn fetch_current_user(
        &self,
        path: &str,
    ) -> Result<ApiResponse<AuthedPlayerInfo>, ApiError> {
        self.request(HttpMethod::Get, path, RequestOptions::new()).await
    }

    pub async fn fetch_player_profile(
        &self,
        path: &str,
    ) -> Result<ApiResponse<PlayerProfile>, ApiError> {
        self.request(HttpMethod::Get, path, RequestOptions::new()).await
    }

    /// Fetch the Minecraft version manifest from `meta_base`
    pub async fn fetch_minecraft_versions(
        &self,
        meta_base: &str,
    ) -> Result<MinecraftVersionManifest, ApiError> {
        self.external(
            meta_base,
            HttpMethod::Get,
            VERSION_MANIFEST_PATH,
            None,
            None,
            RequestOptions::new(),
        )
        .await
    }
}
