//! Persisted session state: the access/refresh credential pair.
//!
//! The session is the one piece of shared mutable state in the client.
//! All writes go through [`SessionStore::save`] and [`SessionStore::clear`]
//! and replace the whole session; no caller merges partial fields from a
//! stale read.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name inside the store directory
const SESSION_FILE: &str = "session.json";

/// Application name used for the default store directory
const APP_NAME: &str = "hirehub";

/// The credential pair plus the time it was last saved.
///
/// If `access` is present it was issued together with or after the current
/// `refresh` credential. An absent `refresh` credential means no silent
/// recovery is possible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived credential attached to each request.
    /// Older deployments persisted this under the legacy `token` key.
    #[serde(default, alias = "token", alias = "access_token")]
    pub access: Option<String>,
    /// Longer-lived credential used only to obtain a new access credential.
    #[serde(default, alias = "refresh_token")]
    pub refresh: Option<String>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }

    fn trimmed(mut self) -> Self {
        self.access = normalized(self.access.as_deref());
        self.refresh = normalized(self.refresh.as_deref());
        self
    }
}

/// File-backed credential store.
///
/// Keeps an in-memory copy of the session and mirrors every change to a
/// JSON file so the session survives process restarts.
pub struct SessionStore {
    path: PathBuf,
    current: Mutex<Session>,
}

impl SessionStore {
    /// Open a store rooted at `dir`, loading any session persisted there.
    /// An unparseable session file is ignored rather than surfaced; the
    /// caller simply starts unauthenticated.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let path = dir.into().join(SESSION_FILE);
        let mut session = Session::default();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            match serde_json::from_str::<Session>(&contents) {
                Ok(loaded) => session = loaded.trimmed(),
                Err(e) => debug!(error = %e, "Ignoring unparseable session file"),
            }
        }
        Ok(Self {
            path,
            current: Mutex::new(session),
        })
    }

    /// Default store directory under the platform data dir.
    pub fn default_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Write whichever credentials are provided, never clearing the other,
    /// and stamp the save time.
    pub fn save(&self, access: Option<&str>, refresh: Option<&str>) -> Result<()> {
        let snapshot = {
            let mut current = self.current.lock().expect("session lock poisoned");
            if let Some(access) = normalized(access) {
                current.access = Some(access);
            }
            if let Some(refresh) = normalized(refresh) {
                current.refresh = Some(refresh);
            }
            current.saved_at = Some(Utc::now());
            current.clone()
        };
        self.persist(&snapshot)
    }

    /// Current session snapshot.
    pub fn load(&self) -> Session {
        self.current.lock().expect("session lock poisoned").clone()
    }

    /// Erase both credentials and the timestamp, removing the persisted file.
    pub fn clear(&self) -> Result<()> {
        *self.current.lock().expect("session lock poisoned") = Session::default();
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
