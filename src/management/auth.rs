use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    config, jwt,
    management::ConfigManager,
    raiplay::{RaiPlayClient, auth},
    success,
    types::Tokens,
    warning,
};

pub const TOKEN_FILE_NAME: &str = "raiplay_tokens.json";

/// Owns the persisted login state and keeps the JWT fresh.
pub struct TokenManager {
    path: PathBuf,
    tokens: Tokens,
}

impl TokenManager {
    pub fn new(path: PathBuf, tokens: Tokens) -> Self {
        TokenManager { path, tokens }
    }

    pub fn default_path() -> PathBuf {
        config::cache_dir().join(TOKEN_FILE_NAME)
    }

    /// Loads the token file at the default location.
    pub async fn load() -> Result<Option<Self>, String> {
        Self::try_load(&Self::default_path()).await
    }

    /// Loads the token file at `path`; `Ok(None)` when it does not exist.
    pub async fn try_load(path: &Path) -> Result<Option<Self>, String> {
        if !path.exists() {
            return Ok(None);
        }

        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let tokens: Tokens = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Some(Self {
            path: path.to_path_buf(),
            tokens,
        }))
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.tokens).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn jwt(&self) -> Option<&str> {
        self.tokens.jwt_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.jwt().and_then(jwt::token_expiry)
    }

    pub fn is_expired(&self) -> bool {
        self.jwt()
            .map(|t| jwt::is_token_expired(t, jwt::refresh_buffer(), Utc::now()))
            .unwrap_or(false)
    }

    /// Refreshes the JWT in memory. The caller decides when to persist.
    ///
    /// # Errors
    ///
    /// Fails when the config is missing or has no domain API key, when no
    /// refresh token is stored, or when the server rejects the refresh.
    pub async fn refresh(
        &mut self,
        client: &RaiPlayClient,
        remote_config: Option<&Value>,
    ) -> Result<(), String> {
        let Some(remote_config) = remote_config else {
            return Err("Could not fetch RaiPlay config".to_string());
        };

        let domain_api_key = auth::domain_api_key(remote_config).ok_or_else(|| {
            "raiPlayDomainApiKey not found in config. \
             Config structure may have changed. Try `troverai auth config --refresh`"
                .to_string()
        })?;
        let refresh_url = auth::refresh_url(Some(remote_config));

        let refreshed = client
            .refresh(&refresh_url, &self.tokens, &domain_api_key)
            .await
            .map_err(|e| e.to_string())?;
        self.tokens = refreshed;
        Ok(())
    }

    /// Returns a JWT that is not about to expire.
    ///
    /// An expired token is refreshed and saved when `auto_refresh` is set.
    ///
    /// # Errors
    ///
    /// No stored JWT, an expired JWT without `auto_refresh`, or a failed
    /// refresh.
    pub async fn get_valid_token(
        &mut self,
        client: &RaiPlayClient,
        config_mgr: &ConfigManager,
        auto_refresh: bool,
    ) -> Result<String, String> {
        if self.jwt().is_none() {
            return Err("No token stored. Run `troverai auth login` first.".to_string());
        }

        if self.is_expired() {
            if !auto_refresh {
                return Err("Token expired. Run `troverai auth refresh`.".to_string());
            }

            warning!("Token expired, refreshing...");
            let remote_config = config_mgr.fetch(client, false).await;
            if let Err(e) = self.refresh(client, remote_config.as_ref()).await {
                return Err(format!(
                    "{}\nToken refresh failed. Please login again with `troverai auth login`",
                    e
                ));
            }

            if let Err(e) = self.persist().await {
                warning!("Failed to save refreshed token: {}", e);
            }
            success!("Token refreshed successfully");
        }

        self.jwt()
            .map(str::to_string)
            .ok_or_else(|| "Refresh response did not contain a token".to_string())
    }
}
