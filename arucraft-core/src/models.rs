//! Payload types exchanged with the panel API
//!
//! Every internal endpoint answers with an [`ApiResponse`] envelope. The
//! envelope `code` is an application status and is independent of the HTTP
//! status the transport reported.

use serde::{Deserialize, Serialize};

use crate::permission::AccountPermission;

/// Envelope `code` meaning success
pub const SUCCESS_CODE: i64 = 200;

/// Uniform response envelope of the panel API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Stand-in for a 2xx reply without a body
    pub fn empty() -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: String::new(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Payload of a successful envelope
    pub fn into_data(self) -> Option<T> {
        if self.is_success() { self.data } else { None }
    }
}

/// Login result handed to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthedPlayerInfo,
}

/// Where a player's avatar comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AvatarInfo {
    McSkin,
    Qq { qq_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub uuid: String,
    pub avatar: AvatarInfo,
}

/// Player info of the logged in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthedPlayerInfo {
    #[serde(flatten)]
    pub player: PlayerInfo,
    pub permission: AccountPermission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    Active,
    Starting,
    Stopping,
    Stopped,
    Unresponsive,
}

impl ServerStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "运行中",
            Self::Starting => "启动中",
            Self::Stopping => "停止中",
            Self::Stopped => "已停止",
            Self::Unresponsive => "无响应",
        }
    }
}

/// Live state of one Minecraft server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub id: String,
    /// Bumped by the backend whenever the server profile is edited
    pub profile_time: i64,
    pub status: ServerStatus,
    pub max_players: u32,
    pub player_count: u32,
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
}

/// Display metadata of a server, cached client side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfile {
    pub server_id: String,
    pub edit_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh_cn_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_ww_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mc_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
}

impl ServerProfile {
    /// A cached profile stays valid while it is not older than the
    /// `profile_time` the server currently reports.
    pub fn is_fresh_for(&self, info: &ServerInfo) -> bool {
        self.edit_time >= info.profile_time
    }

    /// Best display name, preferring the Chinese one
    pub fn display_name(&self) -> Option<&str> {
        [&self.zh_cn_name, &self.en_ww_name]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .find(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSocialAccounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qq: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarSource {
    #[default]
    McSkin,
    Qq,
}

/// Per-account preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub online_qq_suffix: String,
    pub offline_qq_suffix: String,
    #[serde(default)]
    pub social_accounts: PlayerSocialAccounts,
    #[serde(default)]
    pub avatar_source: AvatarSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPlayHistory {
    pub player: PlayerInfo,
    pub online_date: String,
    /// Seconds
    pub total_time: u64,
}

/// Mojang `version_manifest_v2.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinecraftVersionManifest {
    pub latest: LatestMinecraftVersions,
    pub versions: Vec<MinecraftVersionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestMinecraftVersions {
    pub release: String,
    pub snapshot: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinecraftVersionType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinecraftVersionInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: MinecraftVersionType,
    pub url: String,
    pub time: String,
    #[serde(rename = "releaseTime")]
    pub release_time: String,
}

/// HTTP verbs accepted by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Head,
    Patch,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Connect => reqwest::Method::CONNECT,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Trace => reqwest::Method::TRACE,
        }
    }
}
