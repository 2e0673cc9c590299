use chrono::{DateTime, Local, Utc};
use serde_json::Value;

use super::{client, spinner};
use crate::{
    config, error, info, jwt,
    management::{ConfigManager, TokenManager},
    raiplay::auth as raiplay_auth,
    success,
};

const NOT_FOUND: &str = "NOT FOUND";

fn format_local(expiry: DateTime<Utc>) -> String {
    expiry
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

async fn load_tokens_or_exit() -> TokenManager {
    match TokenManager::load().await {
        Ok(Some(manager)) => manager,
        Ok(None) => error!("Not logged in. Run `troverai auth login` first."),
        Err(e) => error!("Cannot read token file: {}", e),
    }
}

/// Logs in with the credentials from the environment and saves the tokens.
pub async fn login() {
    let (Some(username), Some(password)) = (config::raiplay_username(), config::raiplay_password())
    else {
        error!("RAIPLAY_USERNAME and RAIPLAY_PASSWORD must be set in .env");
    };

    info!("Logging in as {}...", username);

    let client = client();
    let config_mgr = ConfigManager::new(ConfigManager::default_path());
    let Some(remote_config) = config_mgr.fetch(&client, false).await else {
        error!("Could not fetch RaiPlay config");
    };

    let Some(domain_api_key) = raiplay_auth::domain_api_key(&remote_config) else {
        error!(
            "raiPlayDomainApiKey not found in config. Try `troverai auth config --refresh`"
        );
    };

    let pb = spinner("Authenticating...");
    let result = client.login(&username, &password, &domain_api_key).await;
    pb.finish_and_clear();

    let tokens = match result {
        Ok(tokens) => tokens,
        Err(e) => error!("Login failed: {}", e),
    };

    success!(
        "Logged in as {} {}",
        tokens.first_name.as_deref().unwrap_or("?"),
        tokens.last_name.as_deref().unwrap_or("?")
    );

    let manager = TokenManager::new(TokenManager::default_path(), tokens);
    if let Some(expiry) = manager.expiry() {
        info!("Token expires: {}", format_local(expiry));
    }

    match manager.persist().await {
        Ok(_) => success!("Tokens saved to {}", manager.path().display()),
        Err(e) => error!("Failed to save tokens: {}", e),
    }
}

/// Prints who is logged in and when the token expires.
pub async fn status() {
    let manager = match TokenManager::load().await {
        Ok(Some(manager)) => manager,
        Ok(None) => {
            println!("Not logged in. Run `troverai auth login` to authenticate.");
            return;
        }
        Err(e) => error!("Cannot read token file: {}", e),
    };

    let tokens = manager.tokens();
    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "?".to_string());

    println!(
        "Logged in as: {} {}",
        or_unknown(&tokens.first_name),
        or_unknown(&tokens.last_name)
    );
    println!("Email: {}", or_unknown(&tokens.email));
    println!("UID: {}", or_unknown(&tokens.uid));
    println!("Login time: {}", or_unknown(&tokens.login_time));

    if manager.jwt().is_some() {
        match manager.expiry() {
            Some(expiry) if expiry > Utc::now() => {
                let (hours, minutes) = jwt::remaining_hours_minutes(expiry - Utc::now());
                println!(
                    "Token expires: {} ({}h {}m remaining)",
                    format_local(expiry),
                    hours,
                    minutes
                );
            }
            Some(expiry) => println!("Token expired: {} (EXPIRED)", format_local(expiry)),
            None => println!("Token expiry: Unknown"),
        }
    }

    if let Some(last_refresh) = tokens.last_refresh.as_deref() {
        println!("Last refresh: {}", last_refresh);
    }

    println!("Token file: {}", manager.path().display());
}

/// Prints the JWT, refreshing it first when it is about to expire.
pub async fn token(export: bool) {
    let mut manager = load_tokens_or_exit().await;
    let client = client();
    let config_mgr = ConfigManager::new(ConfigManager::default_path());

    let jwt = match manager.get_valid_token(&client, &config_mgr, true).await {
        Ok(jwt) => jwt,
        Err(e) => error!("{}", e),
    };

    if export {
        println!("export RAIPLAY_TOKEN='{}'", jwt);
    } else {
        println!("{}", jwt);
    }
}

/// Forces a token refresh and saves the result.
pub async fn refresh() {
    let mut manager = load_tokens_or_exit().await;
    let client = client();
    let config_mgr = ConfigManager::new(ConfigManager::default_path());

    info!("Refreshing token...");
    let remote_config = config_mgr.fetch(&client, false).await;

    if let Err(e) = manager.refresh(&client, remote_config.as_ref()).await {
        error!(
            "{}\nToken refresh failed. Please login again with `troverai auth login`",
            e
        );
    }

    success!("Token refreshed successfully!");
    if let Some(expiry) = manager.expiry() {
        info!("New token expires: {}", format_local(expiry));
    }

    match manager.persist().await {
        Ok(_) => success!("Tokens saved to {}", manager.path().display()),
        Err(e) => error!("Failed to save tokens: {}", e),
    }
}

/// Calls the authenticated on-air endpoint to check the stored token.
pub async fn test_auth() {
    let mut manager = load_tokens_or_exit().await;
    let client = client();
    let config_mgr = ConfigManager::new(ConfigManager::default_path());

    let jwt = match manager.get_valid_token(&client, &config_mgr, true).await {
        Ok(jwt) => jwt,
        Err(e) => error!("{}", e),
    };

    info!("Testing authentication...");
    let on_air = match client.fetch_on_air(&jwt).await {
        Ok(on_air) => on_air,
        Err(e) => error!("{}", e),
    };

    success!(
        "Found {} channels currently on air.",
        on_air.dirette.len()
    );

    let rai_1 = on_air
        .dirette
        .iter()
        .find(|c| c.channel.as_deref() == Some("Rai 1"));
    if let Some(channel) = rai_1 {
        let name = channel
            .current_item
            .as_ref()
            .map(|item| item.display_name())
            .unwrap_or("Unknown");
        println!("\nRai 1 now playing: {}", name);
    }
}

fn lookup(value: Option<&Value>, key: &str) -> String {
    match value.and_then(|v| v.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => NOT_FOUND.to_string(),
    }
}

/// Prints the authentication-related parts of the RaiPlay app config.
pub async fn show_config(force_refresh: bool) {
    let client = client();
    let config_mgr = ConfigManager::new(ConfigManager::default_path());

    let Some(remote_config) = config_mgr.fetch(&client, force_refresh).await else {
        error!("Could not fetch config");
    };

    println!("RaiPlay Configuration:");
    println!("  Source: {}", client.config_url());

    if let Ok(cached) = config_mgr.load_cached().await {
        println!("  Cached at: {}", cached.cached_at);
        println!("  Cache file: {}", config_mgr.path().display());
    }

    let user_services = remote_config.get("userServices");
    let raiplay_services = user_services.and_then(|u| u.get("raiPlayServicesNew"));
    let gigya = user_services.and_then(|u| u.get("gigya"));
    let sso = user_services.and_then(|u| u.get("raiSsoServicesNew"));

    let gigya_key: String = lookup(gigya, "raiPlayApiKey").chars().take(50).collect();

    println!();
    println!("Authentication Keys:");
    println!(
        "  Domain API Key: {}",
        lookup(raiplay_services, "raiPlayDomainApiKey")
    );
    println!("  Gigya API Key: {}...", gigya_key);
    println!("  Data Server: {}", lookup(gigya, "dataServer"));

    let sso_base = lookup(sso, "raiSsoBaseUrl");
    let refresh_path = lookup(sso, "raiSsoRefreshToken");

    println!();
    println!("SSO Endpoints:");
    println!("  Base URL: {}", sso_base);
    println!("  Login: {}", lookup(raiplay_services, "raiPlayLogin"));
    println!("  Logout: {}", lookup(sso, "raiSsoLogOut"));
    println!("  Refresh Token: {}", refresh_path);
    if sso_base != NOT_FOUND && refresh_path != NOT_FOUND {
        println!("  Refresh URL: {}{}", sso_base, refresh_path);
    }
}
