use chrono::Duration;

use super::{CookieJar, Persistence, Store, StoreError};

/// Cookie holding the sidebar state
pub const SIDEBAR_COOKIE: &str = "sidebar_status";

/// One year
pub const SIDEBAR_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365;

/// UI preferences backed by the cookie jar
#[derive(Debug, Clone)]
pub struct UiStore {
    jar: CookieJar,
}

impl Store for UiStore {
    const NAME: &'static str = "app";
    const PERSISTENCE: Persistence = Persistence::Cookie;
}

impl UiStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// Expanded unless the cookie says otherwise
    pub fn is_sidebar_collapsed(&self) -> bool {
        self.jar.get::<bool>(SIDEBAR_COOKIE).unwrap_or(false)
    }

    /// Write the cookie, renewing its lifetime
    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) -> Result<(), StoreError> {
        self.jar.set(
            SIDEBAR_COOKIE,
            &collapsed,
            Duration::seconds(SIDEBAR_COOKIE_MAX_AGE_SECS),
        )
    }

    pub fn toggle_sidebar_collapsed(&mut self) -> Result<(), StoreError> {
        let collapsed = self.is_sidebar_collapsed();
        self.set_sidebar_collapsed(!collapsed)
    }
}
