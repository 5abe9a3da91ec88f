//! arucraft-core: client layer of the aruCraftR Minecraft server panel
//!
//! This crate provides:
//! - Payload types of the panel API
//! - A request dispatcher that turns API problems into toasts and logs the
//!   user out when the session expires
//! - Volatile, locally persisted and cookie-backed stores
//! - The route permission guard

pub mod api;
pub mod avatar;
pub mod config;
pub mod context;
pub mod guard;
pub mod models;
pub mod notify;
pub mod permission;
pub mod session;
pub mod store;

pub use api::{ApiError, ApiIssue, PanelClient, RequestOptions};
pub use config::PanelConfig;
pub use context::PanelContext;
pub use guard::{GuardDecision, Route, check_route_permission};
pub use models::{ApiResponse, ServerInfo, ServerProfile};
pub use notify::{Notification, NotificationColor, NotificationQueue, Notifier};
pub use permission::AccountPermission;
pub use session::Session;

/// Directory name used under the platform config, data and cache dirs
pub const APP_DIR: &str = "arucraft-panel";
