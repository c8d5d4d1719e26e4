//! Credential management for TDX requests.
//!
//! Two interchangeable strategies produce the auth headers for a request:
//!
//! - [`OAuthTokenProvider`]: OAuth2 client-credentials exchange with a cached,
//!   time-limited bearer token
//! - [`HmacSigner`]: per-request HMAC-SHA1 signature over the `x-date` header
//!
//! A deployment picks one at construction time via [`Authenticator`].

mod hmac_signer;
mod oauth;

use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderMap;

use super::error::TdxError;

pub use hmac_signer::{HmacSigner, X_DATE, http_date, sign};
pub use oauth::{AccessToken, DEFAULT_TOKEN_URL, OAuthTokenProvider, SAFETY_MARGIN_SECS, TokenCache};

/// Client id and secret issued by TDX.
#[derive(Clone, Default)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Fails with [`TdxError::Configuration`] unless both halves are set.
    pub fn ensure_present(&self) -> Result<(), TdxError> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(TdxError::Configuration);
        }
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Which authentication strategy a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    OAuth,
    Hmac,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oauth" | "oauth2" => Ok(AuthMode::OAuth),
            "hmac" => Ok(AuthMode::Hmac),
            other => Err(format!("unknown auth mode '{other}' (expected oauth or hmac)")),
        }
    }
}

/// The configured authentication strategy.
#[derive(Debug, Clone)]
pub enum Authenticator {
    OAuth(OAuthTokenProvider),
    Hmac(HmacSigner),
}

impl Authenticator {
    /// Headers that authenticate one outbound data request.
    ///
    /// For OAuth this may hit the token endpoint; it always completes before
    /// the caller issues the data request.
    pub async fn auth_headers(&self) -> Result<HeaderMap, TdxError> {
        match self {
            Authenticator::OAuth(provider) => provider.auth_headers().await,
            Authenticator::Hmac(signer) => signer.auth_headers(),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            Authenticator::OAuth(_) => AuthMode::OAuth,
            Authenticator::Hmac(_) => AuthMode::Hmac,
        }
    }
}

impl From<OAuthTokenProvider> for Authenticator {
    fn from(provider: OAuthTokenProvider) -> Self {
        Authenticator::OAuth(provider)
    }
}

impl From<HmacSigner> for Authenticator {
    fn from(signer: HmacSigner) -> Self {
        Authenticator::Hmac(signer)
    }
}
