//! OAuth2 client-credentials token cache.
//!
//! Cache states:
//!
//! - empty: no token has been issued yet
//! - valid: `now < expires_at - SAFETY_MARGIN_SECS`, served without a network call
//! - stale: inside the safety margin or past expiry, refreshed on next use
//!
//! A failed refresh leaves the previous cache contents untouched.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::tdx::clock::{Clock, SystemClock};
use crate::tdx::error::TdxError;

use super::ClientCredentials;

/// TDX token endpoint.
pub const DEFAULT_TOKEN_URL: &str =
    "https://tdx.transportdata.tw/auth/realms/TDXConnect/protocol/openid-connect/token";

/// Tokens are refreshed this many seconds before they expire.
pub const SAFETY_MARGIN_SECS: i64 = 60;

/// A bearer token and the instant it stops being valid (exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token can still be served at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .checked_sub_signed(TimeDelta::seconds(SAFETY_MARGIN_SECS))
            .is_some_and(|limit| now < limit)
    }
}

/// Token endpoint response. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Holds the single cached token for one provider.
///
/// Refreshes are serialised through `refresh`, so concurrent callers that
/// all observe a stale token issue one token request between them.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<AccessToken>>,
    refresh: Mutex<()>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token, if it is still fresh at `now`.
    pub async fn fresh(&self, now: DateTime<Utc>) -> Option<AccessToken> {
        let guard = self.slot.read().await;
        guard.as_ref().filter(|t| t.is_fresh(now)).cloned()
    }

    /// The cached token regardless of freshness.
    pub async fn peek(&self) -> Option<AccessToken> {
        self.slot.read().await.clone()
    }

    /// Replace the cached token.
    pub async fn store(&self, token: AccessToken) {
        let mut guard = self.slot.write().await;
        *guard = Some(token);
    }

    /// Drop the cached token; the next request fetches a new one.
    pub async fn clear(&self) {
        let mut guard = self.slot.write().await;
        *guard = None;
    }
}

/// Obtains bearer tokens via the client-credentials grant and caches them.
#[derive(Debug, Clone)]
pub struct OAuthTokenProvider {
    http: reqwest::Client,
    credentials: ClientCredentials,
    token_url: String,
    cache: Arc<TokenCache>,
    clock: Arc<dyn Clock>,
}

impl OAuthTokenProvider {
    /// Create a provider with an empty cache, talking to the TDX token endpoint.
    pub fn new(http: reqwest::Client, credentials: ClientCredentials) -> Self {
        Self {
            http,
            credentials,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            cache: Arc::new(TokenCache::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Set a custom token endpoint (for testing).
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Share an existing cache.
    pub fn with_cache(mut self, cache: Arc<TokenCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Return a valid access token, requesting a new one if the cache is
    /// empty or stale.
    pub async fn token(&self) -> Result<String, TdxError> {
        self.credentials.ensure_present()?;

        if let Some(cached) = self.cache.fresh(self.clock.now()).await {
            debug!("using cached TDX access token");
            return Ok(cached.token);
        }

        let _refresh = self.cache.refresh.lock().await;

        // Another caller may have refreshed while we waited.
        let now = self.clock.now();
        if let Some(cached) = self.cache.fresh(now).await {
            debug!("using TDX access token refreshed by a concurrent caller");
            return Ok(cached.token);
        }

        let issued = self.request_token(now).await?;
        self.cache.store(issued.clone()).await;

        Ok(issued.token)
    }

    /// `Authorization: Bearer <token>` for a data request.
    pub async fn auth_headers(&self) -> Result<HeaderMap, TdxError> {
        let token = self.token().await?;

        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| TdxError::InvalidHeader("access token"))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    async fn request_token(&self, now: DateTime<Utc>) -> Result<AccessToken, TdxError> {
        info!(url = %self.token_url, "requesting new TDX access token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "token request did not complete");
                TdxError::TokenAcquisition {
                    status: None,
                    body: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TdxError::TokenAcquisition {
                status: Some(status.as_u16()),
                body: e.to_string(),
            })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "token endpoint rejected the request");
            return Err(TdxError::TokenAcquisition {
                status: Some(status.as_u16()),
                body,
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| TdxError::TokenAcquisition {
                status: Some(status.as_u16()),
                body: format!("malformed token response: {e}"),
            })?;

        if parsed.expires_in <= 0 {
            warn!(expires_in = parsed.expires_in, "token endpoint returned a non-positive lifetime");
            return Err(TdxError::TokenAcquisition {
                status: Some(status.as_u16()),
                body: format!("malformed token response: expires_in {}", parsed.expires_in),
            });
        }

        let expires_at = TimeDelta::try_seconds(parsed.expires_in)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| TdxError::TokenAcquisition {
                status: Some(status.as_u16()),
                body: format!("expires_in out of range: {}", parsed.expires_in),
            })?;

        info!(expires_in = parsed.expires_in, "obtained new TDX access token");

        Ok(AccessToken {
            token: parsed.access_token,
            expires_at,
        })
    }
}
