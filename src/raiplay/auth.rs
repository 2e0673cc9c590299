use std::time::Duration;

use serde_json::Value;

use super::{ApiError, RaiPlayClient, ensure_ok};
use crate::{jwt, types::Tokens, utils};

/// Refresh endpoint used when the remote config is unavailable.
pub const DEFAULT_REFRESH_URL: &str = "https://www.rai.it/raisso/user/token/refresh";
pub const DEFAULT_SSO_BASE_URL: &str = "https://www.rai.it";
pub const DEFAULT_SSO_REFRESH_PATH: &str = "/raisso/user/token/refresh";

pub const CONFIG_PATH: &str = "/mobile/prod/config/RaiPlay_Config.json";
pub const LOGIN_PATH: &str = "/raisso/login/domain/app/social";

/// Known locations of the domain API key, newest layout first.
const DOMAIN_API_KEY_PATHS: [&[&str]; 3] = [
    &["userServices", "raiPlayServicesNew", "raiPlayDomainApiKey"],
    &["userServices", "raiPlayServices", "raiPlayDomainApiKey"],
    &["gigya", "raiPlayDomainApiKey"],
];

impl RaiPlayClient {
    pub fn config_url(&self) -> String {
        self.url(CONFIG_PATH)
    }

    /// Downloads the RaiPlay app configuration (10 second timeout).
    pub async fn fetch_remote_config(&self) -> Result<Value, ApiError> {
        let url = self.config_url();
        let response = self
            .http()
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        let response = ensure_ok(response, &url, false).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Logs in with e-mail and password.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` with the response body on a non-200 answer
    /// - `ApiError::Rejected` when the body does not report `"response": "OK"`
    ///   or lacks the `raisso` user block
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        domain_api_key: &str,
    ) -> Result<Tokens, ApiError> {
        let url = self.url(LOGIN_PATH);
        let response = self
            .http()
            .post(&url)
            .form(&[
                ("email", email),
                ("password", password),
                ("domainApiKey", domain_api_key),
            ])
            .send()
            .await?;

        let response = ensure_ok(response, &url, true).await?;
        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;

        if data.get("response").and_then(Value::as_str) != Some("OK") {
            return Err(ApiError::Rejected(format!("Login rejected: {}", data)));
        }

        let Some(user) = data.get("raisso").filter(|u| u.is_object()) else {
            return Err(ApiError::Rejected(format!(
                "Login response without user data: {}",
                data
            )));
        };

        Ok(Tokens {
            jwt_token: string_field(&data, "authorization"),
            refresh_token: string_field(&data, "refreshToken"),
            ua: string_field(&data, "ua"),
            uid: string_field(user, "uid"),
            email: string_field(user, "email"),
            first_name: string_field(user, "firstName"),
            last_name: string_field(user, "lastName"),
            login_time: Some(utils::iso_now()),
            last_refresh: None,
        })
    }

    /// Exchanges the refresh token for a new JWT.
    ///
    /// The endpoint answers either with JSON (`authorization` and optionally a
    /// rotated `refreshToken`) or with the bare JWT as plain text.
    pub async fn refresh(
        &self,
        refresh_url: &str,
        tokens: &Tokens,
        domain_api_key: &str,
    ) -> Result<Tokens, ApiError> {
        let Some(refresh_token) = tokens.refresh_token.as_deref().filter(|t| !t.is_empty())
        else {
            return Err(ApiError::Rejected(
                "No refresh token available".to_string(),
            ));
        };

        let mut request = self.http().post(refresh_url).form(&[
            ("refreshToken", refresh_token),
            ("domainApiKey", domain_api_key),
        ]);
        if let Some(jwt) = tokens.jwt_token.as_deref() {
            request = request.bearer_auth(jwt);
        }

        let response = ensure_ok(request.send().await?, refresh_url, true).await?;
        let body = response.text().await?;

        let mut refreshed = tokens.clone();
        match serde_json::from_str::<Value>(&body) {
            Ok(data) => {
                let authorization = string_field(&data, "authorization");
                let accepted = data.get("response").and_then(Value::as_str) == Some("OK");
                if !accepted && authorization.is_none() {
                    return Err(ApiError::Rejected(format!(
                        "Error refreshing token: {}",
                        data
                    )));
                }

                if let Some(jwt) = authorization {
                    refreshed.jwt_token = Some(jwt);
                }
                if let Some(rt) = string_field(&data, "refreshToken") {
                    refreshed.refresh_token = Some(rt);
                }
            }
            Err(_) => {
                let token = body.trim();
                if !jwt::looks_like_jwt(token) {
                    let preview: String = body.chars().take(100).collect();
                    return Err(ApiError::Rejected(format!(
                        "Invalid refresh response: {}",
                        preview
                    )));
                }
                refreshed.jwt_token = Some(token.to_string());
            }
        }

        refreshed.last_refresh = Some(utils::iso_now());
        Ok(refreshed)
    }
}

/// Looks up the domain API key in the remote config.
pub fn domain_api_key(config: &Value) -> Option<String> {
    DOMAIN_API_KEY_PATHS.iter().find_map(|path| {
        path.iter()
            .try_fold(config, |value, key| value.get(*key))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

/// Builds the refresh endpoint from the SSO section of the remote config.
pub fn refresh_url(config: Option<&Value>) -> String {
    let Some(config) = config else {
        return DEFAULT_REFRESH_URL.to_string();
    };

    let sso = config
        .get("userServices")
        .and_then(|u| u.get("raiSsoServicesNew"));
    let base = sso
        .and_then(|s| s.get("raiSsoBaseUrl"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_SSO_BASE_URL);
    let path = sso
        .and_then(|s| s.get("raiSsoRefreshToken"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_SSO_REFRESH_PATH);

    format!("{}{}", base, path)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
