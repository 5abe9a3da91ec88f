//! Route permission guard
//!
//! Runs before every navigation. Routes without a `permission` are public;
//! otherwise the user's level must be at least the required one.

use tracing::debug;

use crate::models::AuthedPlayerInfo;
use crate::permission::AccountPermission;

/// Route the user is redirected to when blocked without a usable origin
pub const HOME_PATH: &str = "/";

/// Message carried by an aborted navigation
pub const INSUFFICIENT_PERMISSION: &str = "权限不足";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub permission: Option<AccountPermission>,
}

/// A resolved route location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Route name, absent for the initial load
    pub name: Option<String>,
    pub full_path: String,
    pub meta: RouteMeta,
}

impl Route {
    pub fn new(name: &str, full_path: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            full_path: full_path.to_string(),
            meta: RouteMeta::default(),
        }
    }

    /// Location before the first navigation
    pub fn start() -> Self {
        Self {
            name: None,
            full_path: HOME_PATH.to_string(),
            meta: RouteMeta::default(),
        }
    }

    pub fn requires(mut self, permission: AccountPermission) -> Self {
        self.meta.permission = Some(permission);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
    Abort(String),
}

/// Decide whether `user` may navigate from `from` to `to`
pub fn check_route_permission(
    to: &Route,
    from: &Route,
    user: Option<&AuthedPlayerInfo>,
) -> GuardDecision {
    let Some(required) = to.meta.permission else {
        return GuardDecision::Allow;
    };

    let current = user.map(|u| u.permission).unwrap_or_default();
    if current >= required {
        return GuardDecision::Allow;
    }

    debug!(
        to = %to.full_path,
        ?required,
        ?current,
        "Navigation blocked by permission guard"
    );
    if to.full_path == from.full_path || from.name.is_none() {
        GuardDecision::Redirect(HOME_PATH.to_string())
    } else {
        GuardDecision::Abort(INSUFFICIENT_PERMISSION.to_string())
    }
}
