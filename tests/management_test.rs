use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Local, Utc};
use serde_json::json;
use troverai::management::{
    CONFIG_CACHE_FILE_NAME, ConfigManager, TOKEN_FILE_NAME, TokenManager,
};
use troverai::raiplay::{RaiPlayClient, auth::CONFIG_PATH};
use troverai::types::{CachedConfig, Tokens};
use troverai::utils::iso_timestamp;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper function to build an unsigned token expiring at `exp`
fn create_test_token(exp: i64) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp))
    )
}

fn tokens_with_jwt(jwt: &str) -> Tokens {
    Tokens {
        jwt_token: Some(jwt.to_string()),
        refresh_token: Some("rt1".to_string()),
        first_name: Some("Mario".to_string()),
        ..Default::default()
    }
}

fn sso_config(server: &MockServer) -> serde_json::Value {
    json!({
        "userServices": {
            "raiPlayServicesNew": {"raiPlayDomainApiKey": "key-1"},
            "raiSsoServicesNew": {
                "raiSsoBaseUrl": server.uri(),
                "raiSsoRefreshToken": "/raisso/user/token/refresh"
            }
        }
    })
}

fn cached(config: serde_json::Value, age: Duration) -> CachedConfig {
    CachedConfig {
        cached_at: iso_timestamp(Local::now().naive_local() - age),
        source: "test".to_string(),
        config,
    }
}

#[tokio::test]
async fn test_token_persist_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cache").join(TOKEN_FILE_NAME);
    let tokens = tokens_with_jwt("jwt-1");

    TokenManager::new(file.clone(), tokens.clone())
        .persist()
        .await
        .unwrap();

    let loaded = TokenManager::try_load(&file).await.unwrap().unwrap();
    assert_eq!(loaded.tokens(), &tokens);
    assert_eq!(loaded.path(), file.as_path());
    assert_eq!(loaded.jwt(), Some("jwt-1"));

    // `last_refresh` is omitted until the first refresh
    let raw = std::fs::read_to_string(&file).unwrap();
    assert!(raw.contains("\"jwt_token\": \"jwt-1\""));
    assert!(!raw.contains("last_refresh"));
}

#[tokio::test]
async fn test_token_try_load_missing_and_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(TOKEN_FILE_NAME);

    assert!(TokenManager::try_load(&file).await.unwrap().is_none());

    std::fs::write(&file, "{ not json").unwrap();
    assert!(TokenManager::try_load(&file).await.is_err());
}

#[test]
fn test_token_expiry_state() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(TOKEN_FILE_NAME);

    let valid = create_test_token((Utc::now() + Duration::hours(2)).timestamp());
    let manager = TokenManager::new(file.clone(), tokens_with_jwt(&valid));
    assert!(!manager.is_expired());
    assert!(manager.expiry().is_some());

    // Inside the five minute buffer
    let expiring = create_test_token((Utc::now() + Duration::minutes(2)).timestamp());
    let manager = TokenManager::new(file.clone(), tokens_with_jwt(&expiring));
    assert!(manager.is_expired());

    let opaque = TokenManager::new(file.clone(), tokens_with_jwt("opaque"));
    assert!(!opaque.is_expired());
    assert!(opaque.expiry().is_none());

    let empty = TokenManager::new(file, Tokens::default());
    assert!(empty.jwt().is_none());
    assert!(!empty.is_expired());
}

#[tokio::test]
async fn test_get_valid_token_without_refresh_needed() {
    let server = MockServer::start().await;
    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config_mgr = ConfigManager::new(dir.path().join(CONFIG_CACHE_FILE_NAME));

    let valid = create_test_token((Utc::now() + Duration::hours(2)).timestamp());
    let mut manager = TokenManager::new(dir.path().join(TOKEN_FILE_NAME), tokens_with_jwt(&valid));

    let jwt = manager
        .get_valid_token(&client, &config_mgr, true)
        .await
        .unwrap();
    assert_eq!(jwt, valid);
}

#[tokio::test]
async fn test_get_valid_token_errors() {
    let server = MockServer::start().await;
    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config_mgr = ConfigManager::new(dir.path().join(CONFIG_CACHE_FILE_NAME));

    let mut empty = TokenManager::new(dir.path().join(TOKEN_FILE_NAME), Tokens::default());
    assert!(empty.get_valid_token(&client, &config_mgr, true).await.is_err());

    let expired = create_test_token((Utc::now() - Duration::hours(1)).timestamp());
    let mut manager = TokenManager::new(
        dir.path().join(TOKEN_FILE_NAME),
        tokens_with_jwt(&expired),
    );
    let err = manager
        .get_valid_token(&client, &config_mgr, false)
        .await
        .unwrap_err();
    assert!(err.contains("expired"));
}

#[tokio::test]
async fn test_get_valid_token_refreshes_expired_token() {
    let server = MockServer::start().await;
    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let config_mgr = ConfigManager::new(dir.path().join(CONFIG_CACHE_FILE_NAME));
    config_mgr
        .persist(&cached(sso_config(&server), Duration::hours(1)))
        .await
        .unwrap();

    let expired = create_test_token((Utc::now() - Duration::hours(1)).timestamp());
    let fresh = create_test_token((Utc::now() + Duration::hours(2)).timestamp());

    Mock::given(method("POST"))
        .and(path("/raisso/user/token/refresh"))
        .and(header("Authorization", format!("Bearer {}", expired).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "OK",
            "authorization": fresh,
            "refreshToken": "rt2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token_file = dir.path().join(TOKEN_FILE_NAME);
    let mut manager = TokenManager::new(token_file.clone(), tokens_with_jwt(&expired));

    let jwt = manager
        .get_valid_token(&client, &config_mgr, true)
        .await
        .unwrap();
    assert_eq!(jwt, fresh);

    // The refreshed state is written back to disk
    let saved = TokenManager::try_load(&token_file).await.unwrap().unwrap();
    assert_eq!(saved.jwt(), Some(fresh.as_str()));
    assert_eq!(saved.tokens().refresh_token.as_deref(), Some("rt2"));
    assert!(saved.tokens().last_refresh.is_some());
    assert_eq!(saved.tokens().first_name.as_deref(), Some("Mario"));
}

#[tokio::test]
async fn test_refresh_without_config_fails() {
    let server = MockServer::start().await;
    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut manager = TokenManager::new(dir.path().join(TOKEN_FILE_NAME), tokens_with_jwt("jwt"));

    let err = manager.refresh(&client, None).await.unwrap_err();
    assert_eq!(err, "Could not fetch RaiPlay config");

    let err = manager.refresh(&client, Some(&json!({}))).await.unwrap_err();
    assert!(err.contains("raiPlayDomainApiKey not found"));
}

#[test]
fn test_config_cache_freshness() {
    let now = Local::now().naive_local();

    let fresh = cached(json!({}), Duration::hours(23));
    assert!(ConfigManager::is_fresh(&fresh, now));

    let stale = cached(json!({}), Duration::hours(25));
    assert!(!ConfigManager::is_fresh(&stale, now));

    let unknown = CachedConfig {
        cached_at: "unknown".to_string(),
        source: String::new(),
        config: json!({}),
    };
    assert!(!ConfigManager::is_fresh(&unknown, now));
}

#[tokio::test]
async fn test_config_fetch_uses_fresh_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONFIG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "server"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config_mgr = ConfigManager::new(dir.path().join(CONFIG_CACHE_FILE_NAME));
    config_mgr
        .persist(&cached(json!({"from": "cache"}), Duration::hours(1)))
        .await
        .unwrap();

    let config = config_mgr.fetch(&client, false).await.unwrap();
    assert_eq!(config["from"], "cache");
}

#[tokio::test]
async fn test_config_fetch_refreshes_stale_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONFIG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "server"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config_mgr = ConfigManager::new(dir.path().join("cache").join(CONFIG_CACHE_FILE_NAME));
    config_mgr
        .persist(&cached(json!({"from": "cache"}), Duration::hours(30)))
        .await
        .unwrap();

    let config = config_mgr.fetch(&client, false).await.unwrap();
    assert_eq!(config["from"], "server");

    let saved = config_mgr.load_cached().await.unwrap();
    assert_eq!(saved.config["from"], "server");
    assert_eq!(saved.source, format!("{}{}", server.uri(), CONFIG_PATH));
    assert!(ConfigManager::is_fresh(&saved, Local::now().naive_local()));
}

#[tokio::test]
async fn test_config_fetch_force_bypasses_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONFIG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "server"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config_mgr = ConfigManager::new(dir.path().join(CONFIG_CACHE_FILE_NAME));
    config_mgr
        .persist(&cached(json!({"from": "cache"}), Duration::hours(1)))
        .await
        .unwrap();

    let config = config_mgr.fetch(&client, true).await.unwrap();
    assert_eq!(config["from"], "server");
}

#[tokio::test]
async fn test_config_fetch_failure_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONFIG_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = RaiPlayClient::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config_mgr = ConfigManager::new(dir.path().join(CONFIG_CACHE_FILE_NAME));

    assert!(config_mgr.fetch(&client, false).await.is_none());
    assert!(config_mgr.load_cached().await.is_err());
}
