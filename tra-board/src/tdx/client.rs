//! TDX station data client.
//!
//! Fetches one station's timetable or live board and hands back the
//! upstream JSON exactly as received. Projection into display rows is the
//! caller's job (see [`crate::board`]).

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use tracing::{debug, warn};

use crate::domain::StationId;

use super::auth::{
    AuthMode, Authenticator, ClientCredentials, DEFAULT_TOKEN_URL, HmacSigner, OAuthTokenProvider,
};
use super::clock::{Clock, SystemClock};
use super::endpoint::{Board, DEFAULT_BASE_URL};
use super::error::TdxError;

/// Default request timeout, applied to token and data requests alike.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the TDX client.
#[derive(Debug, Clone)]
pub struct TdxConfig {
    /// Client id and secret
    pub credentials: ClientCredentials,
    /// Authentication strategy
    pub auth_mode: AuthMode,
    /// Data set to fetch
    pub board: Board,
    /// Base URL for data requests (defaults to production TDX)
    pub base_url: String,
    /// Token endpoint URL (OAuth only)
    pub token_url: String,
    /// Station used when the caller names none
    pub default_station: StationId,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TdxConfig {
    /// Create a new config with the given credentials.
    ///
    /// Defaults to OAuth, the general timetable and Taipei Main Station.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            credentials: ClientCredentials::new(client_id, client_secret),
            auth_mode: AuthMode::OAuth,
            board: Board::Timetable,
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            default_station: StationId::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_auth_mode(mut self, mode: AuthMode) -> Self {
        self.auth_mode = mode;
        self
    }

    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom token endpoint (for testing).
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_default_station(mut self, station: StationId) -> Self {
        self.default_station = station;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Authenticated client for TDX station data.
///
/// Cloning is cheap and clones share the credential cache.
#[derive(Debug, Clone)]
pub struct StationDataClient {
    http: reqwest::Client,
    auth: Authenticator,
    board: Board,
    base_url: String,
    default_station: StationId,
}

impl StationDataClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TdxConfig) -> Result<Self, TdxError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client whose credentials read time from `clock`.
    pub fn with_clock(config: TdxConfig, clock: Arc<dyn Clock>) -> Result<Self, TdxError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let auth = match config.auth_mode {
            AuthMode::OAuth => OAuthTokenProvider::new(http.clone(), config.credentials)
                .with_token_url(config.token_url)
                .with_clock(clock)
                .into(),
            AuthMode::Hmac => HmacSigner::with_clock(config.credentials, clock).into(),
        };

        Ok(Self {
            http,
            auth,
            board: config.board,
            base_url: config.base_url,
            default_station: config.default_station,
        })
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn default_station(&self) -> &StationId {
        &self.default_station
    }

    /// Fetch the configured board for `station` (or the default station).
    ///
    /// Credentials are obtained first; the data request is only sent once
    /// they are in hand. The parsed body is returned unmodified.
    pub async fn fetch_station_data(
        &self,
        station: Option<&StationId>,
    ) -> Result<serde_json::Value, TdxError> {
        let station = station.unwrap_or(&self.default_station);

        let headers = self.auth.auth_headers().await?;

        let url = self.board.url(&self.base_url, station);
        debug!(%station, board = %self.board, "fetching station data");

        let response = self
            .http
            .get(&url)
            .headers(headers)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%station, status = status.as_u16(), "station data request failed");
            return Err(TdxError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TdxError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
