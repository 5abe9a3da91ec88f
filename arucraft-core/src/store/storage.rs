//! Durable backends for the persisted stores

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::StoreError;

/// Key/value storage with one JSON file per key
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read `key`; `None` when nothing was stored yet
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path_for(key), content)?;
        debug!(key, "Persisted store");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// Cookie jar persisted as a single JSON file
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: Option<PathBuf>,
    cookies: HashMap<String, StoredCookie>,
}

impl CookieJar {
    /// Jar that forgets everything on exit
    pub fn in_memory() -> Self {
        Self {
            path: None,
            cookies: HashMap::new(),
        }
    }

    /// Open the jar stored at `path`, starting empty if the file is missing
    /// or unreadable as JSON
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cookies = if path.exists() {
            match serde_json::from_str(&std::fs::read_to_string(&path)?) {
                Ok(cookies) => cookies,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding corrupt cookie jar");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        Ok(Self {
            path: Some(path),
            cookies,
        })
    }

    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get_at(name, Utc::now())
    }

    /// Value of `name` as seen at `now`; expired or malformed cookies read
    /// as absent
    pub fn get_at<T: DeserializeOwned>(&self, name: &str, now: DateTime<Utc>) -> Option<T> {
        self.cookies
            .get(name)
            .filter(|c| c.expires_at > now)
            .and_then(|c| serde_json::from_value(c.value.clone()).ok())
    }

    pub fn set<T: Serialize>(&mut self, name: &str, value: &T, max_age: Duration) -> Result<(), StoreError> {
        self.set_at(name, value, max_age, Utc::now())
    }

    pub fn set_at<T: Serialize>(
        &mut self,
        name: &str,
        value: &T,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.cookies.insert(
            name.to_string(),
            StoredCookie {
                value: serde_json::to_value(value)?,
                expires_at: now + max_age,
            },
        );
        self.flush(now)
    }

    /// Write the jar, dropping cookies that expired by `now`
    fn flush(&mut self, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.cookies.retain(|_, c| c.expires_at > now);
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_string_pretty(&self.cookies)?)?;
        }
        Ok(())
    }
}
