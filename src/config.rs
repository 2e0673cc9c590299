//! Configuration management for TroveRAI.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory
//! 4. Application defaults (where applicable)

use std::{
    env,
    path::{Path, PathBuf},
};

/// Default base URL of the RaiPlay website and its JSON endpoints.
pub const DEFAULT_RAIPLAY_BASE_URL: &str = "https://www.raiplay.it";

/// Default name of the local catalog dump.
pub const DEFAULT_CATALOG_FILE: &str = "rai.json";

/// Loads environment variables from `.env` files.
///
/// The `.env` of the current directory is read first, followed by the one in
/// the platform-specific local data directory under `troverai/.env`. Neither
/// file is required. `dotenv` never overrides variables that are already set,
/// so the first source to define a variable wins.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/troverai/.env`
/// - macOS: `~/Library/Application Support/troverai/.env`
/// - Windows: `%LOCALAPPDATA%/troverai/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or if an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let cwd_env = PathBuf::from(".env");
    if cwd_env.is_file() {
        dotenv::from_path(&cwd_env).map_err(|e| e.to_string())?;
    }

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Returns the directory where tokens and caches are stored.
///
/// `TROVERAI_DATA_DIR` overrides the default `<data_local_dir>/troverai`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = non_empty_var("TROVERAI_DATA_DIR") {
        return PathBuf::from(dir);
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("troverai");
    path
}

/// Returns the cache directory below [`data_dir`].
pub fn cache_dir() -> PathBuf {
    data_dir().join("cache")
}

/// Returns the RaiPlay base URL, `RAIPLAY_BASE_URL` if set.
pub fn raiplay_base_url() -> String {
    non_empty_var("RAIPLAY_BASE_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_RAIPLAY_BASE_URL.to_string())
}

/// Returns the RaiPlay account e-mail from `RAIPLAY_USERNAME`.
pub fn raiplay_username() -> Option<String> {
    non_empty_var("RAIPLAY_USERNAME").map(|v| strip_quotes(&v))
}

/// Returns the RaiPlay account password from `RAIPLAY_PASSWORD`.
pub fn raiplay_password() -> Option<String> {
    non_empty_var("RAIPLAY_PASSWORD").map(|v| strip_quotes(&v))
}

/// Returns the catalog file to explore.
///
/// An explicit path wins over `RAIPLAY_CATALOG`, which wins over `rai.json`
/// in the current directory.
pub fn catalog_file(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    non_empty_var("RAIPLAY_CATALOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Strips one layer of matching single or double quotes around a value.
pub fn strip_quotes(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}
