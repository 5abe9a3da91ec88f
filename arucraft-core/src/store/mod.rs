//! Client-side stores
//!
//! Each store declares how its state survives a restart:
//! - [`CacheStore`]: memory only, rebuilt every session
//! - [`LocalStore`]: JSON file in the data directory, written on every change
//! - [`UiStore`]: a cookie with a one year lifetime

mod cache;
mod local;
mod storage;
mod ui;

use thiserror::Error;

use crate::api::ApiError;

pub use cache::CacheStore;
pub use local::LocalStore;
pub use storage::{CookieJar, LocalStorage};
pub use ui::{SIDEBAR_COOKIE, SIDEBAR_COOKIE_MAX_AGE_SECS, UiStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where a store keeps its state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Lost when the process exits
    Memory,
    /// Per-user key/value storage on disk
    Local,
    /// Cookie jar entry with an expiry
    Cookie,
}

/// Identity and persistence policy of a store
pub trait Store {
    /// Storage key
    const NAME: &'static str;
    const PERSISTENCE: Persistence;
}
