//! Client configuration.
//!
//! Covers the API root, the ordered candidate refresh endpoints, the expiry
//! buffer, the request timeout, and the authorization scheme override.
//! Configuration is stored at `~/.config/hirehub/client.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::auth::token::{AuthScheme, DEFAULT_EXPIRY_BUFFER_SECS};

/// Application name used for the config directory path
const APP_NAME: &str = "hirehub";

/// Config file name
const CONFIG_FILE: &str = "client.json";

/// HTTP request timeout in seconds.
/// Also bounds a hung refresh so it cannot stall every waiting caller.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Refresh route conventions seen across deployments, most common first.
const REFRESH_PATHS: &[&str] = &[
    "/accounts/api/token/refresh/",
    "/api/token/refresh/",
    "/accounts/token/refresh/",
    "/auth/token/refresh/",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root without a trailing slash; may be empty for same-origin use.
    pub api_root: String,
    /// Ordered candidate refresh endpoints.
    #[serde(default)]
    pub refresh_endpoints: Vec<String>,
    #[serde(default = "default_buffer")]
    pub expiry_buffer_secs: i64,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

fn default_buffer() -> i64 {
    DEFAULT_EXPIRY_BUFFER_SECS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl ApiConfig {
    /// Config for the given API root, with the conventional refresh
    /// endpoint candidates derived from it.
    pub fn new(api_root: &str) -> Self {
        let root = api_root.trim_end_matches('/');
        Self {
            api_root: root.to_string(),
            refresh_endpoints: REFRESH_PATHS
                .iter()
                .map(|path| format!("{}{}", root, path))
                .collect(),
            expiry_buffer_secs: DEFAULT_EXPIRY_BUFFER_SECS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_scheme: AuthScheme::default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
