//! TDX (Transport Data eXchange) client for Taiwan Railway station data.
//!
//! Two layers:
//!
//! - [`auth`]: obtains credentials for each request, either an OAuth2
//!   bearer token cached until shortly before expiry, or a fresh HMAC-SHA1
//!   signature over the request date
//! - [`StationDataClient`]: issues the authenticated GET for one station
//!   and returns the upstream JSON untouched
//!
//! Nothing here retries. Every failure propagates as a [`TdxError`].

pub mod auth;
mod client;
mod clock;
mod endpoint;
mod error;

#[cfg(test)]
mod client_tests;

pub use auth::{
    AccessToken, AuthMode, Authenticator, ClientCredentials, HmacSigner, OAuthTokenProvider,
    TokenCache, http_date, sign,
};
pub use client::{StationDataClient, TdxConfig};
pub use clock::{Clock, SystemClock};
pub use endpoint::{Board, DEFAULT_BASE_URL};
pub use error::TdxError;
