use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime};
use serde_json::Value;

use crate::{config, raiplay::RaiPlayClient, types::CachedConfig, utils, warning};

pub const CONFIG_CACHE_FILE_NAME: &str = "raiplay_config_cache.json";

/// The remote config changes rarely; it is re-downloaded once a day.
pub const CONFIG_CACHE_MAX_AGE_HOURS: i64 = 24;

/// Local cache of the RaiPlay app configuration.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        config::cache_dir().join(CONFIG_CACHE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_cached(&self) -> Result<CachedConfig, String> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }

    pub async fn persist(&self, cached: &CachedConfig) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(cached).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// A cache entry is fresh for one day after `_cached_at`.
    ///
    /// Missing or unreadable timestamps count as stale.
    pub fn is_fresh(cached: &CachedConfig, now: NaiveDateTime) -> bool {
        match utils::parse_iso_timestamp(&cached.cached_at) {
            Some(at) => now - at < Duration::hours(CONFIG_CACHE_MAX_AGE_HOURS),
            None => false,
        }
    }

    /// Returns the remote config, from the cache when it is fresh.
    ///
    /// With `force` the cache is ignored. Download failures are reported as
    /// warnings and yield `None`; a failed cache write only warns.
    pub async fn fetch(&self, client: &RaiPlayClient, force: bool) -> Option<Value> {
        if !force {
            if let Ok(cached) = self.load_cached().await {
                if Self::is_fresh(&cached, Local::now().naive_local()) {
                    return Some(cached.config);
                }
            }
        }

        let remote = match client.fetch_remote_config().await {
            Ok(remote) => remote,
            Err(e) => {
                warning!("Failed to fetch config: {}", e);
                return None;
            }
        };

        let cached = CachedConfig {
            cached_at: utils::iso_now(),
            source: client.config_url(),
            config: remote,
        };
        if let Err(e) = self.persist(&cached).await {
            warning!("Failed to cache config: {}", e);
        }

        Some(cached.config)
    }
}
