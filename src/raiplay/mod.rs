//! # RaiPlay Integration Module
//!
//! HTTP client for the public RaiPlay JSON endpoints used by TroveRAI.
//!
//! ## Endpoints
//!
//! ### Schedules
//! - `GET /palinsesto/app/{channel}/{dd-mm-yyyy}.json` - one channel, one day
//! - `GET /guidatv.json` - channel guide
//! - `GET /dl/palinsesti/oraInOnda.json` - what is on air now (authenticated)
//!
//! ### Authentication
//! - `GET /mobile/prod/config/RaiPlay_Config.json` - remote app config holding
//!   the domain API key and SSO endpoints
//! - `POST /raisso/login/domain/app/social` - e-mail/password login
//! - `POST {raiSsoBaseUrl}{raiSsoRefreshToken}` - JWT refresh
//!
//! Every request carries a desktop browser User-Agent; some endpoints reject
//! the default one. The base URL is configurable so tests can point the
//! client at a mock server.

pub mod auth;
pub mod schedule;

use std::fmt;

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::config;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Errors returned by [`RaiPlayClient`].
#[derive(Debug)]
pub enum ApiError {
    Http(reqwest::Error),
    Status {
        status: u16,
        url: String,
        body: String,
    },
    Decode(serde_json::Error),
    Rejected(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "request failed: {}", e),
            ApiError::Status { status, url, body } if body.is_empty() => {
                write!(f, "HTTP {} for {}", status, url)
            }
            ApiError::Status { status, url, body } => {
                write!(f, "HTTP {} for {}\nServer response: {}", status, url, body)
            }
            ApiError::Decode(e) => write!(f, "Invalid JSON response: {}", e),
            ApiError::Rejected(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err)
    }
}

#[derive(Debug, Clone)]
pub struct RaiPlayClient {
    http: Client,
    base_url: String,
}

impl RaiPlayClient {
    /// Client for the configured base URL (see [`config::raiplay_base_url`]).
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(&config::raiplay_base_url())
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Sends a GET and decodes a 200 response body into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.http.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = ensure_ok(request.send().await?, url, false).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turns a non-200 response into [`ApiError::Status`].
///
/// With `with_body` the error carries the response body (at most 200
/// characters), which helps when login or refresh is rejected.
pub(crate) async fn ensure_ok(
    response: Response,
    url: &str,
    with_body: bool,
) -> Result<Response, ApiError> {
    let status = response.status();
    if status.as_u16() == 200 {
        return Ok(response);
    }

    let body = if with_body {
        let text = response.text().await.unwrap_or_default();
        text.chars().take(200).collect()
    } else {
        String::new()
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}
