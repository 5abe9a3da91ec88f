//! Login session shared between the dispatcher, the guard and the front end
//!
//! The session is plain data behind a lock:
//! - `token` is attached as a bearer credential to panel requests
//! - `user` carries the permission level the route guard compares against
//! - `logout()` clears both; the dispatcher calls it when the backend
//!   reports the session as expired

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::models::AuthedPlayerInfo;
use crate::permission::AccountPermission;

#[derive(Debug, Clone, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<AuthedPlayerInfo>,
    logouts: u64,
}

/// Cheaply cloneable handle to the current session
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session resumed from a saved token, user unknown until fetched
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.write(|s| s.token = Some(token.into()));
        session
    }

    /// Attach the player the token belongs to
    pub fn set_user(&self, user: AuthedPlayerInfo) {
        info!(user = %user.player.name, permission = user.permission.label(), "Session user loaded");
        self.write(|s| s.user = Some(user));
    }

    /// Drop token and user
    pub fn logout(&self) {
        info!("Session cleared");
        self.write(|s| {
            s.token = None;
            s.user = None;
            s.logouts += 1;
        });
    }

    /// Token if one is present and non-empty
    pub fn token(&self) -> Option<String> {
        self.read(|s| s.token.clone().filter(|t| !t.is_empty()))
    }

    pub fn user(&self) -> Option<AuthedPlayerInfo> {
        self.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Permission of the current user, lowest tier when anonymous
    pub fn permission(&self) -> AccountPermission {
        self.read(|s| s.user.as_ref().map(|u| u.permission).unwrap_or_default())
    }

    /// How many times the session was torn down
    pub fn logout_count(&self) -> u64 {
        self.read(|s| s.logouts)
    }

    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut SessionState)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvatarInfo, PlayerInfo};

    fn admin() -> AuthedPlayerInfo {
        AuthedPlayerInfo {
            player: PlayerInfo {
                name: "Steve".to_string(),
                uuid: "8667ba71b85a4004af54457a9734eed7".to_string(),
                avatar: AvatarInfo::McSkin,
            },
            permission: AccountPermission::Admin,
        }
    }

    #[test]
    fn test_anonymous_session() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.permission(), AccountPermission::User);
    }

    #[test]
    fn test_user_and_logout() {
        let session = Session::with_token("token-1");
        session.set_user(admin());
        assert_eq!(session.token().as_deref(), Some("token-1"));
        assert_eq!(session.permission(), AccountPermission::Admin);

        let clone = session.clone();
        clone.logout();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
        assert_eq!(session.logout_count(), 1);
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let session = Session::with_token("");
        assert!(session.token().is_none());
    }
}
