// SPDX-License-Identifier: MIT

//! Kordis authentication: login handshake and on-disk token cache.
//!
//! The login endpoint answers a Basic-authenticated request with a
//! redirect whose URL fragment carries the access token and its
//! lifetime. Tokens are cached in a JSON file and reused until expiry.

use std::io::ErrorKind;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use reqwest::{header, redirect, StatusCode};

use crate::error::AppError;
use crate::models::TokenRecord;

const DEFAULT_AUTH_BASE_URL: &str = "https://authentication.kordis.fr";

/// OAuth client id registered for the Skolae mobile app.
const OAUTH_CLIENT_ID: &str = "skolae-app";

/// Low-level login client.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client against the production login endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_AUTH_BASE_URL.to_string())
    }

    /// Create a client against an alternative base URL (tests).
    pub fn with_base_url(base_url: String) -> Self {
        // The token arrives in a redirect; the client must not follow it.
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("failed to build HTTP client");

        Self { http, base_url }
    }

    /// Perform the login handshake.
    ///
    /// Returns the access token and its lifetime in seconds.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, i64), AppError> {
        let credentials = BASE64.encode(format!("{username}:{password}"));
        let url = format!(
            "{}/oauth/authorize?response_type=token&client_id={OAUTH_CLIENT_ID}",
            self.base_url
        );

        let response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, format!("Basic {credentials}"))
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("login request failed: {e}")))?;

        if response.status() != StatusCode::FOUND {
            return Err(AppError::Auth(format!(
                "unexpected login status {}",
                response.status()
            )));
        }

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Parse("login redirect carries no location header".into()))?;

        parse_token_fragment(location)
    }
}

impl Default for AuthClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `access_token` and `expires_in` from a redirect target's URL
/// fragment.
fn parse_token_fragment(location: &str) -> Result<(String, i64), AppError> {
    let fragment = location
        .split_once('#')
        .map(|(_, fragment)| fragment)
        .ok_or_else(|| AppError::Parse(format!("no fragment in redirect target {location}")))?;

    let mut access_token = None;
    let mut expires_in = None;

    for pair in fragment.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "access_token" => {
                let decoded = urlencoding::decode(value)
                    .map_err(|e| AppError::Parse(format!("undecodable access_token: {e}")))?;
                access_token = Some(decoded.into_owned());
            }
            "expires_in" => {
                let parsed = value
                    .parse::<i64>()
                    .map_err(|_| AppError::Parse(format!("non-integer expires_in {value:?}")))?;
                expires_in = Some(parsed);
            }
            _ => {}
        }
    }

    match (access_token, expires_in) {
        (Some(token), Some(lifetime)) => Ok((token, lifetime)),
        _ => Err(AppError::Parse(
            "redirect fragment is missing access_token or expires_in".into(),
        )),
    }
}

/// File-backed store for the most recent [`TokenRecord`].
#[derive(Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the cached record, if any.
    ///
    /// A corrupt file is treated as a cache miss; the next successful
    /// login overwrites it.
    pub async fn load(&self) -> Result<Option<TokenRecord>, AppError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Discarding unreadable token cache"
                );
                Ok(None)
            }
        }
    }

    /// Persist `record`, overwriting any prior one.
    pub async fn save(&self, record: &TokenRecord) -> Result<(), AppError> {
        let json = serde_json::to_vec(record)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("token record serialization: {e}")))?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// High-level authentication service: cached token or fresh login.
pub struct AuthService {
    client: AuthClient,
    store: TokenStore,
    username: String,
    password: String,
}

impl AuthService {
    pub fn new(client: AuthClient, store: TokenStore, username: String, password: String) -> Self {
        Self {
            client,
            store,
            username,
            password,
        }
    }

    /// Return a usable access token.
    ///
    /// A cached record still valid for this username short-circuits the
    /// network entirely; otherwise a real login runs and its result is
    /// persisted before being returned.
    pub async fn obtain_token(&self) -> Result<String, AppError> {
        let now = Utc::now().timestamp();

        if let Some(record) = self.store.load().await? {
            if record.is_valid(&self.username, now) {
                tracing::debug!("Using cached access token");
                return Ok(record.access_token);
            }
        }

        let (access_token, expires_in) =
            self.client.login(&self.username, &self.password).await?;

        let record = TokenRecord {
            username: self.username.clone(),
            access_token: access_token.clone(),
            expires_in,
            timestamp: now,
        };
        self.store.save(&record).await?;

        tracing::info!(expires_in, "Logged in and cached a new access token");
        Ok(access_token)
    }
}
